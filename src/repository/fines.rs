//! Fines repository for database operations

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{FineStatus, FineType},
        fine::{Fine, FineWithLoan},
        page::PageQuery,
    },
};

#[derive(Clone)]
pub struct FinesRepository {
    pool: Pool<Postgres>,
}

impl FinesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a new PENDING fine for a loan
    pub async fn create(
        &self,
        loan_id: Uuid,
        description: &str,
        amount: Decimal,
        expired_date: NaiveDate,
        fine_type: FineType,
    ) -> AppResult<Fine> {
        let fine = sqlx::query_as::<_, Fine>(
            r#"
            INSERT INTO fines (fine_id, loan_id, description, amount, expired_date, fine_status, fine_type)
            VALUES ($1, $2, $3, $4, $5, 'PENDING', $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(loan_id)
        .bind(description)
        .bind(amount)
        .bind(expired_date)
        .bind(fine_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(fine)
    }

    /// Close a fine. The status transition is the only change; a missing
    /// fine is a domain not-found.
    pub async fn close(&self, fine_id: Uuid) -> AppResult<()> {
        let affected = sqlx::query(
            "UPDATE fines SET fine_status = 'CLOSED' WHERE fine_id = $1",
        )
        .bind(fine_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::NotFound(format!("Fine with id {} not found", fine_id)));
        }
        Ok(())
    }

    /// Paginated fines of a user, newest expiration first
    pub async fn find_by_user(
        &self,
        user_id: &str,
        query: PageQuery,
    ) -> AppResult<(Vec<FineWithLoan>, i64)> {
        let fines = sqlx::query_as::<_, FineWithLoan>(
            r#"
            SELECT f.fine_id, f.description, f.amount, f.expired_date, f.fine_status,
                   f.fine_type, l.user_id, l.book_name
            FROM fines f
            JOIN loans l ON f.loan_id = l.loan_id
            WHERE l.user_id = $1
            ORDER BY f.expired_date DESC, f.fine_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(query.size)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM fines f JOIN loans l ON f.loan_id = l.loan_id WHERE l.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((fines, total))
    }

    /// Paginated PENDING fines, optionally filtered by expiration date
    pub async fn find_pending(
        &self,
        expired_date: Option<NaiveDate>,
        query: PageQuery,
    ) -> AppResult<(Vec<FineWithLoan>, i64)> {
        let fines = sqlx::query_as::<_, FineWithLoan>(
            r#"
            SELECT f.fine_id, f.description, f.amount, f.expired_date, f.fine_status,
                   f.fine_type, l.user_id, l.book_name
            FROM fines f
            JOIN loans l ON f.loan_id = l.loan_id
            WHERE f.fine_status = $1
              AND ($2::date IS NULL OR f.expired_date = $2)
            ORDER BY f.expired_date, f.fine_id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(FineStatus::Pending)
        .bind(expired_date)
        .bind(query.size)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM fines
            WHERE fine_status = $1 AND ($2::date IS NULL OR expired_date = $2)
            "#,
        )
        .bind(FineStatus::Pending)
        .bind(expired_date)
        .fetch_one(&self.pool)
        .await?;

        Ok((fines, total))
    }

    /// Number of PENDING fines attached to a user's loans
    pub async fn count_pending_by_user(&self, user_id: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM fines f
            JOIN loans l ON f.loan_id = l.loan_id
            WHERE l.user_id = $1 AND f.fine_status = $2
            "#,
        )
        .bind(user_id)
        .bind(FineStatus::Pending)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Next batch of PENDING fines inside the increment horizon, after the
    /// keyset watermark
    pub async fn pending_batch(
        &self,
        expired_after: NaiveDate,
        watermark_id: Option<Uuid>,
        limit: i64,
    ) -> AppResult<Vec<Fine>> {
        let fines = sqlx::query_as::<_, Fine>(
            r#"
            SELECT * FROM fines
            WHERE fine_status = $1
              AND expired_date > $2
              AND ($3::uuid IS NULL OR fine_id > $3)
            ORDER BY fine_id ASC
            LIMIT $4
            "#,
        )
        .bind(FineStatus::Pending)
        .bind(expired_after)
        .bind(watermark_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(fines)
    }

    /// Add the daily rate to one fine, in place. Only touches it while
    /// still PENDING.
    pub async fn add_amount(&self, fine_id: Uuid, rate: Decimal) -> AppResult<()> {
        sqlx::query(
            "UPDATE fines SET amount = amount + $2 WHERE fine_id = $1 AND fine_status = $3",
        )
        .bind(fine_id)
        .bind(rate)
        .bind(FineStatus::Pending)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
