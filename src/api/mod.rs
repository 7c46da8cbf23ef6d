//! API handlers for the alerts REST endpoints

pub mod admin;
pub mod email;
pub mod health;
pub mod notifications;
pub mod openapi;
