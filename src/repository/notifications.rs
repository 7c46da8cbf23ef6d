//! Notifications repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{enums::NotificationType, notification::Notification, page::PageQuery},
};

#[derive(Clone)]
pub struct NotificationsRepository {
    pool: Pool<Postgres>,
}

impl NotificationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a notification row
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        user_id: &str,
        email_guardian: &str,
        notification_date: NaiveDate,
        notification_type: NotificationType,
        book_name: &str,
        loan_id: Option<Uuid>,
    ) -> AppResult<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (notification_id, user_id, email_guardian,
                                       notification_date, notification_type, seen,
                                       book_name, loan_id)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(email_guardian)
        .bind(notification_date)
        .bind(notification_type)
        .bind(book_name)
        .bind(loan_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Paginated notifications of a user, newest first
    pub async fn find_by_user(
        &self,
        user_id: &str,
        query: PageQuery,
    ) -> AppResult<(Vec<Notification>, i64)> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1
            ORDER BY notification_date DESC, notification_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(query.size)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((notifications, total))
    }

    /// Flip an unseen notification to seen. Returns the affected-row count
    /// (0 or 1); the caller inspects the count, no error on a missing row.
    pub async fn mark_seen(&self, notification_id: Uuid) -> AppResult<u64> {
        let affected = sqlx::query(
            "UPDATE notifications SET seen = TRUE WHERE notification_id = $1 AND NOT seen",
        )
        .bind(notification_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected)
    }

    /// Number of unseen notifications for a user
    pub async fn count_unseen(&self, user_id: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT seen",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
