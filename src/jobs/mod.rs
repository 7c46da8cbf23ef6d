//! Scheduled sweep jobs.
//!
//! Each job is a spawned loop on a fixed tick interval; ticks outside the
//! job's daily wall-clock window are no-ops. Progress is a durable keyset
//! watermark in `sweep_state`, so a window resumes where the previous tick
//! stopped and an exhausted backlog finishes the day early. Per-item
//! failures are logged and counted, never fatal to the batch.

pub mod fine_increase;
pub mod loan_expired;
pub mod return_alert;

use chrono::NaiveTime;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::{JobsConfig, SweepScheduleConfig},
    error::{AppError, AppResult},
    repository::Repository,
    services::Services,
};

/// Daily wall-clock window. A tick at or past `end` is outside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SweepWindow {
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }
}

/// Tick cadence plus window for one job
#[derive(Debug, Clone, Copy)]
pub struct SweepSchedule {
    pub every: Duration,
    pub window: SweepWindow,
}

impl SweepSchedule {
    pub fn from_config(config: &SweepScheduleConfig) -> AppResult<Self> {
        Ok(Self {
            every: Duration::from_secs(config.every_minutes * 60),
            window: SweepWindow {
                start: parse_clock(&config.window_start)?,
                end: parse_clock(&config.window_end)?,
            },
        })
    }
}

fn parse_clock(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| AppError::Internal(format!("Invalid window time {:?}: {}", value, e)))
}

/// Outcome tally of one batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepTally {
    pub processed: i64,
    pub failed: i64,
}

/// Run the per-item step over a whole batch. A failing item is counted and
/// the loop continues; one bad row never aborts the rest of the batch. The
/// step closure owns its logging.
pub async fn run_batch<T, F, Fut>(items: Vec<T>, mut step: F) -> SweepTally
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    let mut tally = SweepTally::default();
    for item in items {
        match step(item).await {
            Ok(()) => tally.processed += 1,
            Err(_) => tally.failed += 1,
        }
    }
    tally
}

/// Spawn the three sweep loops
pub fn spawn_all(
    config: &JobsConfig,
    repository: Repository,
    services: Arc<Services>,
) -> AppResult<()> {
    fine_increase::spawn(
        SweepSchedule::from_config(&config.fine_increase)?,
        config.fine_increase.horizon_days.unwrap_or(20),
        config.page_size,
        repository.clone(),
        services.clone(),
    );
    loan_expired::spawn(
        SweepSchedule::from_config(&config.loan_expired)?,
        config.page_size,
        repository.clone(),
        services.clone(),
    );
    return_alert::spawn(
        SweepSchedule::from_config(&config.return_alert)?,
        config.return_alert.days_before.unwrap_or(3),
        config.page_size,
        repository,
        services,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str) -> SweepWindow {
        SweepWindow {
            start: parse_clock(start).unwrap(),
            end: parse_clock(end).unwrap(),
        }
    }

    #[test]
    fn window_is_half_open() {
        let w = window("08:00", "10:50");
        assert!(w.contains(parse_clock("08:00").unwrap()));
        assert!(w.contains(parse_clock("10:49").unwrap()));
        assert!(!w.contains(parse_clock("10:50").unwrap()));
        assert!(!w.contains(parse_clock("07:59").unwrap()));
        assert!(!w.contains(parse_clock("23:00").unwrap()));
    }

    #[test]
    fn bad_clock_string_is_rejected() {
        assert!(parse_clock("25:00").is_err());
        assert!(parse_clock("eight").is_err());
    }

    #[tokio::test]
    async fn batch_isolates_item_failures() {
        let attempted = std::cell::RefCell::new(Vec::new());
        let tally = run_batch(vec![1, 2, 3, 4], |n| {
            attempted.borrow_mut().push(n);
            async move {
                if n == 2 {
                    Err(AppError::Email("transport down".to_string()))
                } else {
                    Ok(())
                }
            }
        })
        .await;
        // The throwing item is counted but the rest of the batch still runs
        assert_eq!(
            tally,
            SweepTally {
                processed: 3,
                failed: 1
            }
        );
        assert_eq!(*attempted.borrow(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn batch_tallies_full_success() {
        let tally = run_batch(vec!["a", "b", "c"], |_| async { Ok(()) }).await;
        assert_eq!(
            tally,
            SweepTally {
                processed: 3,
                failed: 0
            }
        );
    }

    #[test]
    fn schedule_parses_config() {
        let schedule = SweepSchedule::from_config(&SweepScheduleConfig {
            every_minutes: 10,
            window_start: "11:00".to_string(),
            window_end: "13:50".to_string(),
            horizon_days: None,
            days_before: Some(3),
        })
        .unwrap();
        assert_eq!(schedule.every, Duration::from_secs(600));
        assert_eq!(schedule.window, window("11:00", "13:50"));
    }
}
