use async_trait::async_trait;
use serde::Serialize;

use crate::models::{AlertRequest, RecordAlert};

const PUSHES_URL: &str = "https://api.pushbullet.com/v2/pushes";

const COLD_FRONT_GIF: &str = "https://i.giphy.com/media/huJmPXfeir5JlpPAx0/giphy.webp";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("push rejected with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("configuration error: {0}")]
    Config(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, request: &AlertRequest) -> Result<(), NotifyError>;

    fn channel_name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Push {
    #[serde(rename = "type")]
    pub push_type: &'static str,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl Push {
    pub fn for_request(request: &AlertRequest) -> Self {
        match request {
            AlertRequest::ColdFront => Push {
                push_type: "file",
                title: "🍂🍁 Cold Front! 🍂🍁".to_string(),
                body: "There's a cold front in the 5 day forecast! 🎉".to_string(),
                file_name: Some("giphy.webp".to_string()),
                file_type: Some("image/webp".to_string()),
                file_url: Some(COLD_FRONT_GIF.to_string()),
            },
            AlertRequest::Record(RecordAlert { kind, value }) => Push {
                push_type: "note",
                title: "❄️ New Cold Record ❄️".to_string(),
                body: format!("We're forecasted to get our first {kind} below {value:.0}°!"),
                file_name: None,
                file_type: None,
                file_url: None,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PushbulletNotifier {
    client: reqwest::Client,
    access_token: String,
    url: String,
}

impl PushbulletNotifier {
    pub fn new(client: reqwest::Client, access_token: String) -> Result<Self, NotifyError> {
        if access_token.trim().is_empty() {
            return Err(NotifyError::Config(
                "Pushbullet access token must not be empty".to_string(),
            ));
        }
        Ok(Self {
            client,
            access_token,
            url: PUSHES_URL.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for PushbulletNotifier {
    async fn send(&self, request: &AlertRequest) -> Result<(), NotifyError> {
        let push = Push::for_request(request);
        let response = self
            .client
            .post(&self.url)
            .header("Access-Token", &self.access_token)
            .json(&push)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(title = %push.title, "push delivered");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "pushbullet"
    }
}

/// Hand an alert to the notifier without letting a delivery failure
/// escape. Returns whether delivery succeeded.
pub async fn dispatch(notifier: &dyn Notifier, request: &AlertRequest) -> bool {
    match notifier.send(request).await {
        Ok(()) => {
            tracing::info!(channel = notifier.channel_name(), ?request, "alert sent");
            true
        }
        Err(err) => {
            tracing::warn!(
                channel = notifier.channel_name(),
                ?request,
                error = %err,
                "alert delivery failed"
            );
            false
        }
    }
}

#[cfg(test)]
pub use recording::RecordingNotifier;

#[cfg(test)]
mod recording {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{Notifier, NotifyError};
    use crate::models::AlertRequest;

    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        sent: Mutex<Vec<AlertRequest>>,
        fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn sent(&self) -> Vec<AlertRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, request: &AlertRequest) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(*request);
            if self.fail {
                return Err(NotifyError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(())
        }

        fn channel_name(&self) -> &str {
            "recording"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordKind;

    #[test]
    fn cold_front_push_is_a_file_push() {
        let push = Push::for_request(&AlertRequest::ColdFront);
        let json = serde_json::to_value(&push).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["file_type"], "image/webp");
        assert_eq!(json["file_url"], COLD_FRONT_GIF);
    }

    #[test]
    fn record_push_names_kind_and_value() {
        let push = Push::for_request(&AlertRequest::Record(RecordAlert {
            kind: RecordKind::High,
            value: 40.0,
        }));
        assert_eq!(push.push_type, "note");
        assert_eq!(push.body, "We're forecasted to get our first high below 40°!");

        let json = serde_json::to_value(&push).unwrap();
        assert!(json.get("file_url").is_none());
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = PushbulletNotifier::new(reqwest::Client::new(), "  ".to_string()).unwrap_err();
        assert!(matches!(err, NotifyError::Config(_)));
    }

    #[tokio::test]
    async fn dispatch_reports_failures_without_erroring() {
        let notifier = RecordingNotifier::failing();
        assert!(!dispatch(&notifier, &AlertRequest::ColdFront).await);
        assert_eq!(notifier.sent(), vec![AlertRequest::ColdFront]);

        let notifier = RecordingNotifier::default();
        assert!(dispatch(&notifier, &AlertRequest::ColdFront).await);
    }
}
