//! Notification model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::NotificationType;

/// Notification row from the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub notification_id: Uuid,
    pub user_id: String,
    pub email_guardian: String,
    pub notification_date: NaiveDate,
    pub notification_type: NotificationType,
    pub seen: bool,
    pub book_name: String,
    /// Set for loan-expiration notifications
    pub loan_id: Option<Uuid>,
}

/// Notification projection returned by the listing endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOutput {
    pub notification_id: Uuid,
    pub notification_date: NaiveDate,
    pub notification_type: NotificationType,
    pub seen: bool,
    pub book_name: String,
}

impl From<Notification> for NotificationOutput {
    fn from(row: Notification) -> Self {
        Self {
            notification_id: row.notification_id,
            notification_date: row.notification_date,
            notification_type: row.notification_type,
            seen: row.seen,
            book_name: row.book_name,
        }
    }
}

/// Unseen-notification and active-fine counts for one user.
/// Both counts default to zero, never null.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserNotificationCounts {
    pub unseen_notifications: i64,
    pub active_fines: i64,
}
