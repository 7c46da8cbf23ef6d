//! Daily fine-amount increase sweep.
//!
//! Adds the flat per-day rate to every PENDING fine whose expiration is
//! within the configured horizon, one keyset batch per tick.

use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use std::sync::Arc;
use tokio::time::interval;

use crate::{
    error::AppResult,
    jobs::{run_batch, SweepSchedule},
    repository::Repository,
    services::Services,
};

const JOB: &str = "fine-increase";

pub fn spawn(
    schedule: SweepSchedule,
    horizon_days: i64,
    page_size: i64,
    repository: Repository,
    services: Arc<Services>,
) {
    tokio::spawn(async move {
        tracing::info!(
            "Fine-increase sweep scheduled every {:?} between {} and {}",
            schedule.every,
            schedule.window.start,
            schedule.window.end
        );

        let mut ticker = interval(schedule.every);
        loop {
            ticker.tick().await;
            let now = Local::now();
            if !schedule.window.contains(now.time()) {
                continue;
            }
            if let Err(e) = tick(
                &repository,
                &services,
                horizon_days,
                page_size,
                now.date_naive(),
            )
            .await
            {
                tracing::warn!("Fine-increase sweep tick failed: {}", e);
            }
        }
    });
}

async fn tick(
    repository: &Repository,
    services: &Services,
    horizon_days: i64,
    page_size: i64,
    today: NaiveDate,
) -> AppResult<()> {
    let state = repository.sweeps.ensure_window(JOB, today).await?;
    if state.done {
        return Ok(());
    }

    let cutoff = today - ChronoDuration::days(horizon_days);
    let fines = repository
        .fines
        .pending_batch(cutoff, state.watermark_id, page_size)
        .await?;

    if fines.is_empty() {
        repository.sweeps.mark_done(JOB).await?;
        tracing::info!(
            processed = state.processed,
            failed = state.failed,
            "Fine-increase sweep finished for {}",
            today
        );
        return Ok(());
    }

    let rate = services.admin.fine_day_rate().await;
    let last = fines.last().map(|f| f.fine_id);

    let tally = run_batch(fines, |fine| async move {
        repository
            .fines
            .add_amount(fine.fine_id, rate)
            .await
            .map_err(|e| {
                tracing::error!(fine_id = %fine.fine_id, "Failed to increase fine amount: {}", e);
                e
            })
    })
    .await;

    if let Some(last) = last {
        repository
            .sweeps
            .advance(JOB, None, last, tally.processed, tally.failed)
            .await?;
    }

    tracing::info!(
        job = JOB,
        processed = tally.processed,
        failed = tally.failed,
        %rate,
        "Sweep tick complete"
    );
    Ok(())
}
