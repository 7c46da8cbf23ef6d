//! Business logic services

pub mod admin;
pub mod directory;
pub mod email;
pub mod notifications;

use crate::{
    config::{DirectoryConfig, EmailConfig, JobsConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub notifications: notifications::NotificationsService,
    pub admin: admin::AdminService,
    pub email: email::EmailService,
    pub directory: directory::DirectoryClient,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        email_config: EmailConfig,
        directory_config: DirectoryConfig,
        jobs_config: &JobsConfig,
    ) -> AppResult<Self> {
        let email = email::EmailService::new(email_config);
        let directory = directory::DirectoryClient::new(directory_config)?;
        Ok(Self {
            notifications: notifications::NotificationsService::new(
                repository.clone(),
                email.clone(),
                directory.clone(),
            ),
            admin: admin::AdminService::new(repository, jobs_config.fine_day_rate),
            email,
            directory,
        })
    }
}
