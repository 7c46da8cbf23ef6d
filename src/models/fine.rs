//! Fine model and related types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::{FineStatus, FineType};

/// Fine row from the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Fine {
    pub fine_id: Uuid,
    pub loan_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub expired_date: NaiveDate,
    pub fine_status: FineStatus,
    pub fine_type: FineType,
}

/// Fine joined with its loan, for listing endpoints
#[derive(Debug, Clone, FromRow)]
pub struct FineWithLoan {
    pub fine_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub expired_date: NaiveDate,
    pub fine_status: FineStatus,
    pub fine_type: FineType,
    pub user_id: String,
    pub book_name: String,
}

/// Fine creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FineInput {
    pub user_id: String,
    pub book_id: String,
    pub amount: Decimal,
    pub fine_type: FineType,
    #[validate(length(max = 300))]
    pub description: Option<String>,
    pub expired_date: NaiveDate,
}

/// Fine projection returned by the listing endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FineOutput {
    pub fine_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub expired_date: NaiveDate,
    pub fine_status: FineStatus,
    pub fine_type: FineType,
    pub book_title: String,
}

impl From<FineWithLoan> for FineOutput {
    fn from(row: FineWithLoan) -> Self {
        Self {
            fine_id: row.fine_id,
            description: row.description,
            amount: row.amount,
            expired_date: row.expired_date,
            fine_status: row.fine_status,
            fine_type: row.fine_type,
            book_title: row.book_name,
        }
    }
}
