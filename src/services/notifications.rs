//! Notification and fine lifecycle service

use chrono::Local;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::NotificationType,
        fine::{FineInput, FineOutput},
        loan::LoanInput,
        notification::{NotificationOutput, UserNotificationCounts},
        page::{PageQuery, Paginated},
    },
    repository::Repository,
    services::{directory::DirectoryClient, email::EmailService},
};

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
    email: EmailService,
    directory: DirectoryClient,
}

impl NotificationsService {
    pub fn new(repository: Repository, email: EmailService, directory: DirectoryClient) -> Self {
        Self {
            repository,
            email,
            directory,
        }
    }

    /// Record a loan reported by the loan-management platform and notify the
    /// guardian address carried in the payload. Pure create path; the
    /// guardian is not re-resolved through the user-info API.
    pub async fn notify_loan(&self, input: LoanInput) -> AppResult<()> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let today = Local::now().date_naive();
        self.repository.loans.create(&input, today).await?;
        self.repository
            .notifications
            .create(
                &input.user_id,
                &input.email_guardian,
                today,
                NotificationType::Alert,
                &input.book_name,
                None,
            )
            .await?;
        self.email
            .send_loan_created(&input.email_guardian, &input.book_name, input.loan_return)
            .await?;
        Ok(())
    }

    /// Mark the active loan for a book as returned and notify the guardian
    /// of the return condition. Opening a DAMAGE fine for a bad-condition
    /// return is the caller's separate call.
    pub async fn return_book(&self, book_id: &str, bad_condition: bool) -> AppResult<()> {
        let loan = self.repository.loans.find_active_by_book(book_id).await?;
        self.repository.loans.mark_returned(loan.loan_id).await?;

        let token = self.directory.fetch_token().await?;
        let info = self.directory.user_info(&token, &loan.user_id).await?;

        let today = Local::now().date_naive();
        self.repository
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
        self.email
            .send_return_notice(&info.guardian_email, &info.name, &loan.book_name, bad_condition)
            .await?;
        Ok(())
    }

    /// Open a PENDING fine against the most recent loan for (book, user).
    /// The three side effects run best-effort sequentially; there is no
    /// compensating rollback on partial failure.
    pub async fn open_fine(&self, input: FineInput) -> AppResult<()> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let loan = self
            .repository
            .loans
            .find_last_loan(&input.book_id, &input.user_id)
            .await?;

        let description = input
            .description
            .clone()
            .unwrap_or_else(|| input.fine_type.description().to_string());

        self.repository
            .fines
            .create(
                loan.loan_id,
                &description,
                input.amount,
                input.expired_date,
                input.fine_type,
            )
            .await?;

        let token = self.directory.fetch_token().await?;
        let info = self.directory.user_info(&token, &input.user_id).await?;

        let today = Local::now().date_naive();
        self.repository
            .notifications
            .create(
                &input.user_id,
                &info.guardian_email,
                today,
                NotificationType::Fine,
                &loan.book_name,
                None,
            )
            .await?;
        self.email
            .send_fine_opened(
                &info.guardian_email,
                input.amount,
                input.expired_date,
                input.fine_type,
            )
            .await?;
        Ok(())
    }

    /// Close a fine; fails NotFound on an unknown ID
    pub async fn close_fine(&self, fine_id: Uuid) -> AppResult<()> {
        self.repository.fines.close(fine_id).await
    }

    /// Paginated notification history of a user
    pub async fn get_notifications(
        &self,
        user_id: &str,
        query: PageQuery,
    ) -> AppResult<Paginated<NotificationOutput>> {
        let query = query.validated()?;
        let (rows, total) = self.repository.notifications.find_by_user(user_id, query).await?;
        let data = rows.into_iter().map(NotificationOutput::from).collect();
        Ok(Paginated::new(data, query, total))
    }

    /// Paginated fines of a user
    pub async fn get_fines_by_user(
        &self,
        user_id: &str,
        query: PageQuery,
    ) -> AppResult<Paginated<FineOutput>> {
        let query = query.validated()?;
        let (rows, total) = self.repository.fines.find_by_user(user_id, query).await?;
        let data = rows.into_iter().map(FineOutput::from).collect();
        Ok(Paginated::new(data, query, total))
    }

    /// Flip a notification to seen; the affected-row count (0 or 1) is the
    /// observable success signal
    pub async fn mark_notification_as_seen(&self, notification_id: Uuid) -> AppResult<u64> {
        self.repository.notifications.mark_seen(notification_id).await
    }

    /// Unseen notifications and pending fines for a user; both counts
    /// default to zero
    pub async fn get_unseen_count(&self, user_id: &str) -> AppResult<UserNotificationCounts> {
        let unseen_notifications = self.repository.notifications.count_unseen(user_id).await?;
        let active_fines = self.repository.fines.count_pending_by_user(user_id).await?;
        Ok(UserNotificationCounts {
            unseen_notifications,
            active_fines,
        })
    }
}
