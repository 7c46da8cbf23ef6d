//! Admin endpoints: pending-fine listings, fine day rate, sweep status,
//! and mirrors of the user-facing loan/fine operations

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        fine::{FineInput, FineOutput},
        loan::LoanInput,
        page::{PageQuery, Paginated},
    },
    repository::sweeps::SweepState,
};

use super::notifications::ReturnBookParams;

/// Query parameters of the pending-by-date listing
#[derive(Deserialize, ToSchema)]
pub struct PendingByDateParams {
    pub date: NaiveDate,
    pub page: i64,
    pub size: i64,
}

/// List all PENDING fines, paginated
#[utoipa::path(
    get,
    path = "/notifications/admin/fines-pending",
    tag = "admin",
    params(
        ("page" = i64, Query, description = "Zero-based page number"),
        ("size" = i64, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Paginated pending fines", body = Paginated<FineOutput>)
    )
)]
pub async fn get_pending_fines(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<FineOutput>>> {
    let page = state.services.admin.pending_fines(query).await?;
    Ok(Json(page))
}

/// List PENDING fines expiring on a date, paginated
#[utoipa::path(
    get,
    path = "/notifications/admin/fines/pending-by-date",
    tag = "admin",
    params(
        ("date" = NaiveDate, Query, description = "Expiration date filter"),
        ("page" = i64, Query, description = "Zero-based page number"),
        ("size" = i64, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Paginated pending fines", body = Paginated<FineOutput>)
    )
)]
pub async fn get_pending_fines_by_date(
    State(state): State<crate::AppState>,
    Query(params): Query<PendingByDateParams>,
) -> AppResult<Json<Paginated<FineOutput>>> {
    let query = PageQuery {
        page: params.page,
        size: params.size,
    };
    let page = state
        .services
        .admin
        .pending_fines_by_date(params.date, query)
        .await?;
    Ok(Json(page))
}

/// Change the fine day rate
#[utoipa::path(
    put,
    path = "/notifications/admin/fines/{newRate}/rate",
    tag = "admin",
    params(
        ("newRate" = Decimal, Path, description = "New per-day rate, within [0, 10000]")
    ),
    responses(
        (status = 200, description = "Rate updated"),
        (status = 400, description = "Rate outside [0, 10000]")
    )
)]
pub async fn set_fine_day_rate(
    State(state): State<crate::AppState>,
    Path(new_rate): Path<Decimal>,
) -> AppResult<&'static str> {
    state.services.admin.set_fine_day_rate(new_rate).await?;
    Ok("Fine updated Correctly")
}

/// Read the fine day rate
#[utoipa::path(
    get,
    path = "/notifications/admin/fines/rate",
    tag = "admin",
    responses(
        (status = 200, description = "Current per-day rate", body = Decimal)
    )
)]
pub async fn get_fine_day_rate(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Decimal>> {
    Ok(Json(state.services.admin.fine_day_rate().await))
}

/// Watermarks and outcome tallies of the sweep jobs
#[utoipa::path(
    get,
    path = "/notifications/admin/sweeps",
    tag = "admin",
    responses(
        (status = 200, description = "Sweep job status", body = Vec<SweepState>)
    )
)]
pub async fn get_sweep_status(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<SweepState>>> {
    Ok(Json(state.services.admin.sweep_status().await?))
}

/// Admin mirror of notify-create-loan
#[utoipa::path(
    post,
    path = "/notifications/admin/loan/create",
    tag = "admin",
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

/// Admin mirror of notify-return-loan
#[utoipa::path(
    post,
    path = "/notifications/admin/loan/return",
    tag = "admin",
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

/// Admin mirror of fine creation
#[utoipa::path(
    post,
    path = "/notifications/admin/users/{userId}/fines/create",
    tag = "admin",
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

/// Admin mirror of fine closing
#[utoipa::path(
    put,
    path = "/notifications/admin/users/fines/{fineId}/close",
    tag = "admin",
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
