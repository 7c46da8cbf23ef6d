//! Durable sweep watermarks, one row per scheduled job.
//!
//! Replaces an in-memory page counter: each sweep resumes from the last
//! processed keyset position, so row mutation between ticks cannot skip or
//! duplicate items, and a finished backlog is recorded as `done` instead of
//! being inferred from the wall clock.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, Pool, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppResult;

/// State of one sweep job's current daily window
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweepState {
    pub job: String,
    pub window_date: NaiveDate,
    pub watermark_date: Option<NaiveDate>,
    pub watermark_id: Option<Uuid>,
    /// True once a tick fetched an empty batch for this window
    pub done: bool,
    pub processed: i64,
    pub failed: i64,
}

#[derive(Clone)]
pub struct SweepsRepository {
    pool: Pool<Postgres>,
}

impl SweepsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Load the job's state for `window_date`, resetting it when a new
    /// calendar day starts
    pub async fn ensure_window(&self, job: &str, window_date: NaiveDate) -> AppResult<SweepState> {
        let existing = sqlx::query_as::<_, SweepState>("SELECT * FROM sweep_state WHERE job = $1")
            .bind(job)
            .fetch_optional(&self.pool)
            .await?;

        match existing {
            Some(state) if state.window_date == window_date => Ok(state),
            Some(_) => {
                let state = sqlx::query_as::<_, SweepState>(
                    r#"
                    UPDATE sweep_state
                    SET window_date = $2, watermark_date = NULL, watermark_id = NULL,
                        done = FALSE, processed = 0, failed = 0
                    WHERE job = $1
                    RETURNING *
                    "#,
                )
                .bind(job)
                .bind(window_date)
                .fetch_one(&self.pool)
                .await?;
                Ok(state)
            }
            None => {
                let state = sqlx::query_as::<_, SweepState>(
                    r#"
                    INSERT INTO sweep_state (job, window_date)
                    VALUES ($1, $2)
                    RETURNING *
                    "#,
                )
                .bind(job)
                .bind(window_date)
                .fetch_one(&self.pool)
                .await?;
                Ok(state)
            }
        }
    }

    /// Move the watermark past a processed batch and add its outcome tallies
    pub async fn advance(
        &self,
        job: &str,
        watermark_date: Option<NaiveDate>,
        watermark_id: Uuid,
        processed: i64,
        failed: i64,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE sweep_state
            SET watermark_date = $2, watermark_id = $3,
                processed = processed + $4, failed = failed + $5
            WHERE job = $1
            "#,
        )
        .bind(job)
        .bind(watermark_date)
        .bind(watermark_id)
        .bind(processed)
        .bind(failed)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Record that the job's backlog for this window is exhausted
    pub async fn mark_done(&self, job: &str) -> AppResult<()> {
        sqlx::query("UPDATE sweep_state SET done = TRUE WHERE job = $1")
            .bind(job)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All sweep rows, for the admin status endpoint
    pub async fn all(&self) -> AppResult<Vec<SweepState>> {
        let states = sqlx::query_as::<_, SweepState>("SELECT * FROM sweep_state ORDER BY job")
            .fetch_all(&self.pool)
            .await?;
        Ok(states)
    }
}
