//! Loans repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanInput},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a loan row derived from the loan-created payload
    pub async fn create(&self, input: &LoanInput, loan_date: NaiveDate) -> AppResult<Loan> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (loan_id, user_id, book_id, book_name, loan_date, loan_expired,
                               book_returned, expiry_notified)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, FALSE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.user_id)
        .bind(&input.book_id)
        .bind(&input.book_name)
        .bind(loan_date)
        .bind(input.loan_return)
        .fetch_one(&self.pool)
        .await?;

        Ok(loan)
    }

    /// Most recent loan for a (book, user) pair, returned or not
    pub async fn find_last_loan(&self, book_id: &str, user_id: &str) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            r#"
            SELECT * FROM loans
            WHERE book_id = $1 AND user_id = $2
            ORDER BY loan_date DESC, loan_id DESC
            LIMIT 1
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No loan found for book {} and user {}", book_id, user_id))
        })
    }

    /// Active (unreturned) loan for a book
    pub async fn find_active_by_book(&self, book_id: &str) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            r#"
            SELECT * FROM loans
            WHERE book_id = $1 AND NOT book_returned
            ORDER BY loan_date DESC, loan_id DESC
            LIMIT 1
            "#,
        )
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No active loan found for book {}", book_id)))
    }

    /// Mark a loan's book as returned
    pub async fn mark_returned(&self, loan_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE loans SET book_returned = TRUE WHERE loan_id = $1")
            .bind(loan_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Record that the expiration email for a loan went out
    pub async fn mark_expiry_notified(&self, loan_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE loans SET expiry_notified = TRUE WHERE loan_id = $1")
            .bind(loan_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Next batch of overdue, not-yet-notified loans after the keyset watermark.
    /// Sorted by expiration ascending so the earliest-due go first.
    pub async fn expired_batch(
        &self,
        today: NaiveDate,
        watermark: Option<(NaiveDate, Uuid)>,
        limit: i64,
    ) -> AppResult<Vec<Loan>> {
        let (wm_date, wm_id) = match watermark {
            Some((d, id)) => (Some(d), Some(id)),
            None => (None, None),
        };

        let loans = sqlx::query_as::<_, Loan>(
            r#"
            SELECT * FROM loans
            WHERE loan_expired <= $1
              AND NOT book_returned
              AND NOT expiry_notified
              AND ($2::date IS NULL OR (loan_expired, loan_id) > ($2, $3))
            ORDER BY loan_expired ASC, loan_id ASC
            LIMIT $4
            "#,
        )
        .bind(today)
        .bind(wm_date)
        .bind(wm_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Next batch of unreturned loans expiring exactly on `due_date`
    pub async fn due_on_batch(
        &self,
        due_date: NaiveDate,
        watermark_id: Option<Uuid>,
        limit: i64,
    ) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            r#"
            SELECT * FROM loans
            WHERE loan_expired = $1
              AND NOT book_returned
              AND ($2::uuid IS NULL OR loan_id > $2)
            ORDER BY loan_id ASC
            LIMIT $3
            "#,
        )
        .bind(due_date)
        .bind(watermark_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }
}
