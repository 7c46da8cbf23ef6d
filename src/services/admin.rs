//! Admin service: pending-fine listings, fine day rate, sweep status

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        fine::FineOutput,
        page::{PageQuery, Paginated},
    },
    repository::{sweeps::SweepState, Repository},
};

const MIN_RATE: Decimal = Decimal::ZERO;

#[derive(Clone)]
pub struct AdminService {
    repository: Repository,
    /// Flat per-day increment applied by the fine-increase sweep.
    /// Operator-tunable at runtime; resets to the configured default on
    /// restart.
    fine_rate: Arc<RwLock<Decimal>>,
}

impl AdminService {
    pub fn new(repository: Repository, default_rate: Decimal) -> Self {
        Self {
            repository,
            fine_rate: Arc::new(RwLock::new(default_rate)),
        }
    }

    /// All PENDING fines, paginated
    pub async fn pending_fines(&self, query: PageQuery) -> AppResult<Paginated<FineOutput>> {
        let query = query.validated()?;
        let (rows, total) = self.repository.fines.find_pending(None, query).await?;
        let data = rows.into_iter().map(FineOutput::from).collect();
        Ok(Paginated::new(data, query, total))
    }

    /// PENDING fines expiring on a specific date, paginated
    pub async fn pending_fines_by_date(
        &self,
        date: NaiveDate,
        query: PageQuery,
    ) -> AppResult<Paginated<FineOutput>> {
        let query = query.validated()?;
        let (rows, total) = self.repository.fines.find_pending(Some(date), query).await?;
        let data = rows.into_iter().map(FineOutput::from).collect();
        Ok(Paginated::new(data, query, total))
    }

    /// Change the fine day rate; values outside [0, 10000] are rejected,
    /// boundaries accepted
    pub async fn set_fine_day_rate(&self, rate: Decimal) -> AppResult<()> {
        if rate < MIN_RATE || rate > Decimal::from(10_000) {
            return Err(AppError::Validation(format!(
                "Fine day rate {} outside [0, 10000]",
                rate
            )));
        }
        *self.fine_rate.write().await = rate;
        Ok(())
    }

    /// Current fine day rate
    pub async fn fine_day_rate(&self) -> Decimal {
        *self.fine_rate.read().await
    }

    /// Watermark and outcome tallies of every sweep job
    pub async fn sweep_status(&self) -> AppResult<Vec<SweepState>> {
        self.repository.sweeps.all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AdminService {
        // The rate cell does not touch the pool; a lazy pool keeps the
        // constructor usable without a database.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AdminService::new(Repository::new(pool), Decimal::from(800))
    }

    #[tokio::test]
    async fn rate_defaults_to_configured_value() {
        let admin = service();
        assert_eq!(admin.fine_day_rate().await, Decimal::from(800));
    }

    #[tokio::test]
    async fn rate_rejects_out_of_range() {
        let admin = service();
        assert!(admin.set_fine_day_rate(Decimal::from(-1)).await.is_err());
        assert!(admin.set_fine_day_rate(Decimal::from(10_001)).await.is_err());
        assert_eq!(admin.fine_day_rate().await, Decimal::from(800));
    }

    #[tokio::test]
    async fn rate_accepts_boundaries() {
        let admin = service();
        admin.set_fine_day_rate(Decimal::ZERO).await.unwrap();
        assert_eq!(admin.fine_day_rate().await, Decimal::ZERO);
        admin.set_fine_day_rate(Decimal::from(10_000)).await.unwrap();
        assert_eq!(admin.fine_day_rate().await, Decimal::from(10_000));
    }
}
