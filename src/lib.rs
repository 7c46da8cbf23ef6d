//! BibloSoft Alerts and Notifications Service
//!
//! REST microservice for the school library platform: fines, guardian
//! notifications, and the daily sweep jobs that drive reminder emails and
//! fine increases.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
