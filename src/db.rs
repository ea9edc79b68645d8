use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::AlertError;
use crate::models::{RunRecord, RunSummary};
use crate::store::{self, StateStore};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Insert starting values for keys that have never been set. Existing
/// values, including lowered record thresholds, are left alone.
pub async fn seed(pool: &PgPool) -> anyhow::Result<usize> {
    let defaults = vec![
        (store::THRESHOLD, "10"),
        (store::RECORD_LOW_ROUNDED_UP, "40"),
        (store::RECORD_LOW_HIGH_ROUNDED_UP, "60"),
    ];

    let mut inserted = 0usize;
    for (key, value) in defaults {
        let result = sqlx::query(
            r#"
            INSERT INTO cold_front_alert.properties (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}

#[derive(Debug, Clone)]
pub struct PgStateStore {
    pool: PgPool,
}

impl PgStateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateStore for PgStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AlertError> {
        let row = sqlx::query("SELECT value FROM cold_front_alert.properties WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("value")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AlertError> {
        sqlx::query(
            r#"
            INSERT INTO cold_front_alert.properties (key, value, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

pub async fn record_run(pool: &PgPool, summary: &RunSummary) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO cold_front_alert.runs
        (id, city, outcome, cold_front, lowest_min, lowest_max, alerts_sent)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(summary.city.as_deref())
    .bind(summary.outcome.as_str())
    .bind(summary.cold_front)
    .bind(summary.lowest_min)
    .bind(summary.lowest_max)
    .bind(summary.alerts_sent as i32)
    .execute(pool)
    .await?;

    Ok(id)
}

pub async fn fetch_runs(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<RunRecord>> {
    let rows = sqlx::query(
        "SELECT ran_at, city, outcome, cold_front, lowest_min, lowest_max, alerts_sent \
         FROM cold_front_alert.runs \
         ORDER BY ran_at DESC \
         LIMIT $1",
    )
    .bind(limit.max(1))
    .fetch_all(pool)
    .await?;

    let mut runs = Vec::with_capacity(rows.len());
    for row in rows {
        runs.push(RunRecord {
            ran_at: row.get("ran_at"),
            city: row.get("city"),
            outcome: row.get("outcome"),
            cold_front: row.get("cold_front"),
            lowest_min: row.get("lowest_min"),
            lowest_max: row.get("lowest_max"),
            alerts_sent: row.get("alerts_sent"),
        });
    }

    Ok(runs)
}
