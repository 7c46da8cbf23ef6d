//! Domain models and wire DTOs

pub mod enums;
pub mod fine;
pub mod loan;
pub mod notification;
pub mod page;
