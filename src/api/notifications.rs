//! User-facing notification and fine endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        fine::{FineInput, FineOutput},
        loan::LoanInput,
        notification::{NotificationOutput, UserNotificationCounts},
        page::{PageQuery, Paginated},
    },
};

/// Query parameters of the return-book endpoint
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnBookParams {
    pub book_id: String,
    pub returned_in_bad_condition: bool,
}

/// Get the notifications of a user, paginated
#[utoipa::path(
    get,
    path = "/notifications/users/{userId}",
    tag = "notifications",
    params(
        ("userId" = String, Path, description = "User ID"),
        ("page" = i64, Query, description = "Zero-based page number"),
        ("size" = i64, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Paginated notifications", body = Paginated<NotificationOutput>)
    )
)]
pub async fn get_notifications(
    State(state): State<crate::AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<NotificationOutput>>> {
    let page = state
        .services
        .notifications
        .get_notifications(&user_id, query)
        .await?;
    Ok(Json(page))
}

/// Get the fines of a user, paginated
#[utoipa::path(
    get,
    path = "/notifications/users/{userId}/fines",
    tag = "notifications",
    params(
        ("userId" = String, Path, description = "User ID"),
        ("page" = i64, Query, description = "Zero-based page number"),
        ("size" = i64, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Paginated fines", body = Paginated<FineOutput>)
    )
)]
pub async fn get_fines(
    State(state): State<crate::AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<FineOutput>>> {
    let page = state
        .services
        .notifications
        .get_fines_by_user(&user_id, query)
        .await?;
    Ok(Json(page))
}

/// Record a loan created by the loan-management platform and notify the guardian
#[utoipa::path(
    post,
    path = "/notifications/notify-create-loan",
    tag = "notifications",
    request_body = LoanInput,
    responses(
        (status = 200, description = "Notification sent"),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn notify_loan(
    State(state): State<crate::AppState>,
    Json(input): Json<LoanInput>,
) -> AppResult<&'static str> {
    state.services.notifications.notify_loan(input).await?;
    Ok("Notification Sent!")
}

/// Mark the active loan of a book as returned and notify the guardian
#[utoipa::path(
    post,
    path = "/notifications/notify-return-loan",
    tag = "notifications",
    params(
        ("bookId" = String, Query, description = "Book ID"),
        ("returnedInBadCondition" = bool, Query, description = "Whether the book came back damaged")
    ),
    responses(
        (status = 200, description = "Book returned"),
        (status = 404, description = "No active loan for the book")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Query(params): Query<ReturnBookParams>,
) -> AppResult<&'static str> {
    state
        .services
        .notifications
        .return_book(&params.book_id, params.returned_in_bad_condition)
        .await?;
    Ok("Book Returned")
}

/// Open a fine against a user's most recent loan of a book
#[utoipa::path(
    post,
    path = "/notifications/users/{userId}/fines/create",
    tag = "notifications",
    params(
        ("userId" = String, Path, description = "User ID")
    ),
    request_body = FineInput,
    responses(
        (status = 200, description = "Fine created"),
        (status = 400, description = "Path and body user disagree"),
        (status = 404, description = "No loan for the (book, user) pair")
    )
)]
pub async fn open_fine(
    State(state): State<crate::AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<FineInput>,
) -> AppResult<&'static str> {
    if input.user_id != user_id {
        return Err(AppError::Validation(format!(
            "Path user {} does not match body user {}",
            user_id, input.user_id
        )));
    }
    state.services.notifications.open_fine(input).await?;
    Ok("Fine Created")
}

/// Close a fine
#[utoipa::path(
    put,
    path = "/notifications/users/fines/{fineId}/close",
    tag = "notifications",
    params(
        ("fineId" = Uuid, Path, description = "Fine ID")
    ),
    responses(
        (status = 200, description = "Fine closed"),
        (status = 404, description = "Fine not found")
    )
)]
pub async fn close_fine(
    State(state): State<crate::AppState>,
    Path(fine_id): Path<Uuid>,
) -> AppResult<&'static str> {
    state.services.notifications.close_fine(fine_id).await?;
    Ok("Fine Closed")
}

/// Mark a notification as seen; the response is the affected-row count
#[utoipa::path(
    put,
    path = "/notifications/mark-seen/{notificationId}",
    tag = "notifications",
    params(
        ("notificationId" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Number of rows updated (0 or 1)", body = u64)
    )
)]
pub async fn mark_notification_as_seen(
    State(state): State<crate::AppState>,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<u64>> {
    let affected = state
        .services
        .notifications
        .mark_notification_as_seen(notification_id)
        .await?;
    Ok(Json(affected))
}

/// Count unseen notifications and pending fines for a user
#[utoipa::path(
    get,
    path = "/notifications/count/{userId}",
    tag = "notifications",
    params(
        ("userId" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Unseen/active counts", body = UserNotificationCounts)
    )
)]
pub async fn get_unseen_count(
    State(state): State<crate::AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserNotificationCounts>> {
    let counts = state.services.notifications.get_unseen_count(&user_id).await?;
    Ok(Json(counts))
}
