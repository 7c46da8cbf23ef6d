//! BibloSoft Alerts and Notifications Service
//!
//! REST microservice for school library fines and guardian notifications.

use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblosoft_alerts_server::{api, config::AppConfig, jobs, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "biblosoft_alerts_server={},tower_http=debug",
            config.logging.level
        )
        .into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting BibloSoft Alerts Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(
        repository.clone(),
        config.email.clone(),
        config.directory.clone(),
        &config.jobs,
    )
    .expect("Failed to create services");
    let services = Arc::new(services);

    // Spawn the sweep jobs
    jobs::spawn_all(&config.jobs, repository, services.clone())
        .expect("Failed to spawn sweep jobs");

    tracing::info!("Sweep jobs spawned");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // User-facing notifications and fines
        .route("/notifications/users/:userId", get(api::notifications::get_notifications))
        .route("/notifications/users/:userId/fines", get(api::notifications::get_fines))
        .route("/notifications/notify-create-loan", post(api::notifications::notify_loan))
        .route("/notifications/notify-return-loan", post(api::notifications::return_book))
        .route("/notifications/users/:userId/fines/create", post(api::notifications::open_fine))
        .route("/notifications/users/fines/:fineId/close", put(api::notifications::close_fine))
        .route("/notifications/mark-seen/:notificationId", put(api::notifications::mark_notification_as_seen))
        .route("/notifications/count/:userId", get(api::notifications::get_unseen_count))
        // Admin
        .route("/notifications/admin/fines-pending", get(api::admin::get_pending_fines))
        .route("/notifications/admin/fines/pending-by-date", get(api::admin::get_pending_fines_by_date))
        .route("/notifications/admin/fines/:newRate/rate", put(api::admin::set_fine_day_rate))
        .route("/notifications/admin/fines/rate", get(api::admin::get_fine_day_rate))
        .route("/notifications/admin/sweeps", get(api::admin::get_sweep_status))
        .route("/notifications/admin/loan/create", post(api::admin::notify_loan))
        .route("/notifications/admin/loan/return", post(api::admin::return_book))
        .route("/notifications/admin/users/:userId/fines/create", post(api::admin::open_fine))
        .route("/notifications/admin/users/fines/:fineId/close", put(api::admin::close_fine))
        // Ad-hoc email
        .route("/sendEmail", get(api::email::send_email))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .merge(routes)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
