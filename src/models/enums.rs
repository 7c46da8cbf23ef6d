//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// FineStatus
// ---------------------------------------------------------------------------

/// Fine lifecycle status. PENDING until explicitly closed; CLOSED is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "fine_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FineStatus {
    Pending,
    Closed,
}

impl std::fmt::Display for FineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FineStatus::Pending => "PENDING",
            FineStatus::Closed => "CLOSED",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// FineType
// ---------------------------------------------------------------------------

/// Reason a fine was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "fine_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FineType {
    Damage,
    Late,
}

impl FineType {
    /// Human-readable description included in guardian emails
    pub fn description(&self) -> &'static str {
        match self {
            FineType::Damage => "The book was returned in bad condition.",
            FineType::Late => "The book was not returned by its due date.",
        }
    }
}

impl std::fmt::Display for FineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FineType::Damage => "DAMAGE",
            FineType::Late => "LATE",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// NotificationType
// ---------------------------------------------------------------------------

/// Kind of persisted notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "notification_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Fine,
    Alert,
    BookLoanExpired,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            NotificationType::Fine => "FINE",
            NotificationType::Alert => "ALERT",
            NotificationType::BookLoanExpired => "BOOK_LOAN_EXPIRED",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_type_serializes_screaming_snake() {
        let json = serde_json::to_string(&NotificationType::BookLoanExpired).unwrap();
        assert_eq!(json, "\"BOOK_LOAN_EXPIRED\"");
    }

    #[test]
    fn fine_status_round_trips() {
        let parsed: FineStatus = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(parsed, FineStatus::Pending);
        assert_eq!(parsed.to_string(), "PENDING");
    }

    #[test]
    fn fine_type_descriptions_differ() {
        assert_ne!(FineType::Damage.description(), FineType::Late.description());
    }
}
