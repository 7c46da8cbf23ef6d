//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, email, health, notifications};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BibloSoft Alerts API",
        version = "1.0.0",
        description = "Alerts and Notifications microservice for the BibloSoft school library platform",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Notifications
        notifications::get_notifications,
        notifications::get_fines,
        notifications::notify_loan,
        notifications::return_book,
        notifications::open_fine,
        notifications::close_fine,
        notifications::mark_notification_as_seen,
        notifications::get_unseen_count,
        // Admin
        admin::get_pending_fines,
        admin::get_pending_fines_by_date,
        admin::set_fine_day_rate,
        admin::get_fine_day_rate,
        admin::get_sweep_status,
        admin::notify_loan,
        admin::return_book,
        admin::open_fine,
        admin::close_fine,
        // Email
        email::send_email,
    ),
    components(
        schemas(
            // Notifications
            crate::models::loan::LoanInput,
            crate::models::fine::FineInput,
            crate::models::fine::FineOutput,
            crate::models::notification::NotificationOutput,
            crate::models::notification::UserNotificationCounts,
            crate::models::enums::FineStatus,
            crate::models::enums::FineType,
            crate::models::enums::NotificationType,
            // Admin
            crate::repository::sweeps::SweepState,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "notifications", description = "User notifications and fines"),
        (name = "admin", description = "Administrative operations"),
        (name = "email", description = "Ad-hoc email sending")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
