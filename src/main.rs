use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

mod aggregate;
mod check;
mod cold_front;
mod db;
mod error;
mod forecast;
mod models;
mod notify;
mod record;
mod store;

use crate::forecast::OpenWeatherClient;
use crate::notify::PushbulletNotifier;
use crate::store::StateStore;

#[derive(Parser)]
#[command(name = "cold-front-alert")]
#[command(about = "Cold front and record-low alerts from a five day forecast", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Insert default thresholds that are not yet set
    Seed,
    /// Print a stored property
    Get {
        #[arg(long)]
        key: String,
    },
    /// Store a property, e.g. to reset a record threshold
    Set {
        #[arg(long)]
        key: String,
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },
    /// Evaluate the forecast once and send any alerts
    Check {
        /// Override the forecast endpoint
        #[arg(long, env = "FORECAST_URL")]
        forecast_url: Option<String>,
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
    /// Show recent runs
    History {
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;
    let state = db::PgStateStore::new(pool.clone());

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let inserted = db::seed(&pool).await?;
            println!("Seeded {inserted} default properties.");
        }
        Commands::Get { key } => match state.get(&key).await? {
            Some(value) => println!("{key}={value}"),
            None => println!("{key} is not set."),
        },
        Commands::Set { key, value } => {
            let value = store::normalize_value(&key, &value)?;
            state.set(&key, &value).await?;
            println!("{key}={value}");
        }
        Commands::Check {
            forecast_url,
            timeout_secs,
        } => {
            let config = check::RunConfig::load(&state)
                .await
                .context("run configuration is incomplete")?;
            let api_key = store::require(&state, store::OPENWEATHERKEY).await?;
            let push_token = store::require(&state, store::PUSHBULLETKEY).await?;

            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()?;
            let mut source = OpenWeatherClient::new(client.clone(), api_key);
            if let Some(url) = forecast_url {
                source = source.with_base_url(url);
            }
            let notifier = PushbulletNotifier::new(client, push_token)?;

            let summary = check::run(&config, &state, &source, &notifier).await?;
            let run_id = db::record_run(&pool, &summary).await?;
            tracing::info!(%run_id, outcome = summary.outcome.as_str(), "run recorded");

            match summary.outcome {
                models::RunOutcome::Aborted => {
                    println!("Forecast unavailable; nothing evaluated.");
                }
                models::RunOutcome::Completed => {
                    println!(
                        "{}: {} days ({} full), cold front: {}, new records: {}, alerts sent: {}",
                        summary.city.as_deref().unwrap_or("unknown"),
                        summary.daily_mins.len(),
                        summary.daily_maxes.len(),
                        if summary.cold_front { "yes" } else { "no" },
                        summary.records.len(),
                        summary.alerts_sent
                    );
                    for record in &summary.records {
                        println!("- first {} below {:.0}", record.kind, record.value);
                    }
                }
            }
        }
        Commands::History { limit } => {
            let runs = db::fetch_runs(&pool, limit).await?;
            if runs.is_empty() {
                println!("No runs recorded yet.");
                return Ok(());
            }

            for run in runs {
                println!(
                    "- {} {} ({}) cold front {} lowest min {} lowest max {} alerts {}",
                    run.ran_at.format("%Y-%m-%d %H:%M"),
                    run.outcome,
                    run.city.as_deref().unwrap_or("-"),
                    run.cold_front,
                    format_optional(run.lowest_min),
                    format_optional(run.lowest_max),
                    run.alerts_sent
                );
            }
        }
    }

    Ok(())
}

fn format_optional(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.0}"))
        .unwrap_or_else(|| "-".to_string())
}
