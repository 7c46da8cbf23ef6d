//! Loan model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Loan row from the database.
///
/// `expiry_notified` is flipped by the loan-expired sweep after the guardian
/// email went out; the sweep never picks such a loan up again.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub loan_id: Uuid,
    pub user_id: String,
    pub book_id: String,
    pub book_name: String,
    pub loan_date: NaiveDate,
    pub loan_expired: NaiveDate,
    pub book_returned: bool,
    pub expiry_notified: bool,
}

/// Loan-created notification payload sent by the loan-management platform
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanInput {
    /// Borrowing student's ID in the loan-management platform
    pub user_id: String,
    /// Guardian address to notify, carried in the payload (not re-resolved)
    #[validate(email)]
    pub email_guardian: String,
    pub book_id: String,
    pub book_name: String,
    /// Date the book is due back
    pub loan_return: NaiveDate,
}
