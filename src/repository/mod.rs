//! Repository layer for database operations

pub mod fines;
pub mod loans;
pub mod notifications;
pub mod sweeps;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub loans: loans::LoansRepository,
    pub fines: fines::FinesRepository,
    pub notifications: notifications::NotificationsRepository,
    pub sweeps: sweeps::SweepsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            loans: loans::LoansRepository::new(pool.clone()),
            fines: fines::FinesRepository::new(pool.clone()),
            notifications: notifications::NotificationsRepository::new(pool.clone()),
            sweeps: sweeps::SweepsRepository::new(pool.clone()),
            pool,
        }
    }
}
