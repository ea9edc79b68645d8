use thiserror::Error;

/// Failures that abort an evaluation run.
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("invalid numeric input: {0}")]
    InvalidNumericInput(String),

    #[error("configuration key {0} is not set")]
    ConfigurationMissing(&'static str),

    #[error("state store failed: {0}")]
    Store(#[from] sqlx::Error),
}

/// Failures retrieving the forecast payload.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("forecast request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("code {code}: {body}")]
    Status { code: u16, body: String },

    #[error("malformed forecast payload: {0}")]
    Parse(#[from] serde_json::Error),
}
