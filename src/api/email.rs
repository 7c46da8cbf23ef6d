//! Ad-hoc email endpoint

use axum::extract::{Query, State};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::AppResult;

/// Query parameters of the raw send endpoint
#[derive(Deserialize, ToSchema)]
pub struct SendEmailParams {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Send a raw email
#[utoipa::path(
    get,
    path = "/sendEmail",
    tag = "email",
    params(
        ("to" = String, Query, description = "Recipient address"),
        ("subject" = String, Query, description = "Subject line"),
        ("body" = String, Query, description = "Plain-text body")
    ),
    responses(
        (status = 200, description = "Email sent"),
        (status = 502, description = "Transport failure")
    )
)]
pub async fn send_email(
    State(state): State<crate::AppState>,
    Query(params): Query<SendEmailParams>,
) -> AppResult<&'static str> {
    state
        .services
        .email
        .send(&params.to, &params.subject, &params.body)
        .await?;
    Ok("Email Sent!")
}
