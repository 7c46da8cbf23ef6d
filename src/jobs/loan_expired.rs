//! Overdue-loan notification sweep.
//!
//! Pages through unreturned loans past their due date, earliest-due first,
//! emails the guardian, persists a BOOK_LOAN_EXPIRED notification and flags
//! the loan so it is never picked up again. The bearer token is fetched on
//! the window's first batch and dropped when the window closes.

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tokio::time::interval;

use crate::{
    error::AppResult,
    jobs::{run_batch, SweepSchedule},
    models::{enums::NotificationType, loan::Loan},
    repository::Repository,
    services::{directory::BearerToken, Services},
};

const JOB: &str = "loan-expired";

pub fn spawn(
    schedule: SweepSchedule,
    page_size: i64,
    repository: Repository,
    services: Arc<Services>,
) {
    tokio::spawn(async move {
        tracing::info!(
            "Loan-expired sweep scheduled every {:?} between {} and {}",
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
                // Window closed: the scoped token dies with it
                window_token = None;
                continue;
            }
            if let Err(e) = tick(
                &repository,
                &services,
                page_size,
                now.date_naive(),
                &mut window_token,
            )
            .await
            {
                tracing::warn!("Loan-expired sweep tick failed: {}", e);
            }
        }
    });
}

async fn tick(
    repository: &Repository,
    services: &Services,
    page_size: i64,
    today: NaiveDate,
    window_token: &mut Option<BearerToken>,
) -> AppResult<()> {
    let state = repository.sweeps.ensure_window(JOB, today).await?;
    if state.done {
        return Ok(());
    }

    let watermark = state.watermark_date.zip(state.watermark_id);
    let loans = repository.loans.expired_batch(today, watermark, page_size).await?;

    if loans.is_empty() {
        repository.sweeps.mark_done(JOB).await?;
        tracing::info!(
            processed = state.processed,
            failed = state.failed,
            "Loan-expired sweep finished for {}",
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

    let last = loans.last().map(|l| (l.loan_expired, l.loan_id));
    let token = &token;

    let tally = run_batch(loans, |loan| async move {
        notify_expired(repository, services, token, &loan, today)
            .await
            .map_err(|e| {
                tracing::error!(loan_id = %loan.loan_id, "Exception sending an automated email: {}", e);
                e
            })
    })
    .await;

    if let Some((wm_date, wm_id)) = last {
        repository
            .sweeps
            .advance(JOB, Some(wm_date), wm_id, tally.processed, tally.failed)
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

async fn notify_expired(
    repository: &Repository,
    services: &Services,
    token: &BearerToken,
    loan: &Loan,
    today: NaiveDate,
) -> AppResult<()> {
    let info = services.directory.user_info(token, &loan.user_id).await?;
    services
        .email
        .send_loan_expired(
            &info.guardian_email,
            &info.guardian_name,
            &info.name,
            &loan.book_name,
            loan.loan_date,
        )
        .await?;
    repository
        .notifications
        .create(
            &loan.user_id,
            &info.guardian_email,
            today,
            NotificationType::BookLoanExpired,
            &loan.book_name,
            Some(loan.loan_id),
        )
        .await?;
    repository.loans.mark_expiry_notified(loan.loan_id).await?;
    Ok(())
}
