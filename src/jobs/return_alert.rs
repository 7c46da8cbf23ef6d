//! Return-reminder sweep.
//!
//! Warns guardians about unreturned loans due back in exactly N days
//! (default 3), one keyset batch per tick inside the daily window.

use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use std::sync::Arc;
use tokio::time::interval;

use crate::{
    error::AppResult,
    jobs::{run_batch, SweepSchedule},
    models::{enums::NotificationType, loan::Loan},
    repository::Repository,
    services::{directory::BearerToken, Services},
};

const JOB: &str = "return-alert";

pub fn spawn(
    schedule: SweepSchedule,
    days_before: i64,
    page_size: i64,
    repository: Repository,
    services: Arc<Services>,
) {
    tokio::spawn(async move {
        tracing::info!(
            "Return-alert sweep scheduled every {:?} between {} and {}",
            schedule.every,
            schedule.window.start,
            schedule.window.end
        );

        let mut ticker = interval(schedule.every);
        let mut window_token: Option<BearerToken> = None;
        loop {
            ticker.tick().await;
            let now = Local::now();
            if !schedule.window.contains(now.time()) {
                window_token = None;
                continue;
            }
            if let Err(e) = tick(
                &repository,
                &services,
                days_before,
                page_size,
                now.date_naive(),
                &mut window_token,
            )
            .await
            {
                tracing::warn!("Return-alert sweep tick failed: {}", e);
            }
        }
    });
}

async fn tick(
    repository: &Repository,
    services: &Services,
    days_before: i64,
    page_size: i64,
    today: NaiveDate,
    window_token: &mut Option<BearerToken>,
) -> AppResult<()> {
    let state = repository.sweeps.ensure_window(JOB, today).await?;
    if state.done {
        return Ok(());
    }

    let due_date = today + ChronoDuration::days(days_before);
    let loans = repository
        .loans
        .due_on_batch(due_date, state.watermark_id, page_size)
        .await?;

    if loans.is_empty() {
        repository.sweeps.mark_done(JOB).await?;
        tracing::info!(
            processed = state.processed,
            failed = state.failed,
            "Return-alert sweep finished for {}",
            today
        );
        return Ok(());
    }

    let token = match window_token.as_ref() {
        Some(token) => token.clone(),
        None => {
            let token = services.directory.fetch_token().await?;
            *window_token = Some(token.clone());
            token
        }
    };

    let last = loans.last().map(|l| l.loan_id);
    let token = &token;

    let tally = run_batch(loans, |loan| async move {
        send_alert(repository, services, token, &loan, today, days_before)
            .await
            .map_err(|e| {
                tracing::error!(loan_id = %loan.loan_id, "Exception sending an automated email: {}", e);
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
        "Sweep tick complete"
    );
    Ok(())
}

async fn send_alert(
    repository: &Repository,
    services: &Services,
    token: &BearerToken,
    loan: &Loan,
    today: NaiveDate,
    days_before: i64,
) -> AppResult<()> {
    let info = services.directory.user_info(token, &loan.user_id).await?;
    services
        .email
        .send_return_alert(
            &info.guardian_email,
            &info.guardian_name,
            &info.name,
            &loan.book_name,
            days_before,
        )
        .await?;
    repository
        .notifications
        .create(
            &loan.user_id,
            &info.guardian_email,
            today,
            NotificationType::Alert,
            &loan.book_name,
            None,
        )
        .await?;
    Ok(())
}
