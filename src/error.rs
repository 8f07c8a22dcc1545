//! Application error types for the approval workflow.
//!
//! These errors are serializable so the HTTP layer can hand a structured
//! description back to callers.

use serde::Serialize;
use thiserror::Error;

/// Application-level errors returned by the workflow services.
///
/// All variants serialize to a structured JSON object.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
    },

    /// Requested resource not found.
    #[error("Not found: {resource}")]
    NotFound {
        resource: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Invalid input provided.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// A display name matched more than one member.
    #[error("Ambiguous name: {name} matches {matches} members")]
    Ambiguous { name: String, matches: usize },

    /// The nominee does not belong to the group the nomination was filed in.
    #[error("Member is not part of group {submitted_group}")]
    #[serde(rename_all = "camelCase")]
    NotAGroupMember {
        submitted_group: String,
        member_groups: Vec<String>,
    },

    /// The ballot already carries a decision.
    #[error("Ballot {ballot_id} has already been reviewed")]
    #[serde(rename_all = "camelCase")]
    AlreadyReviewed { ballot_id: String },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a database error with optional operation context.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            operation: None,
        }
    }

    /// Create a database error with operation context.
    pub fn database_with_op(message: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            operation: Some(operation.into()),
        }
    }

    /// Create a not found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: None,
        }
    }

    /// Create a not found error with ID.
    pub fn not_found_with_id(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: Some(id.into()),
        }
    }

    /// Nominee lookup by display name came back empty.
    pub fn nominee_not_found(name: impl Into<String>) -> Self {
        Self::not_found_with_id("Nominee", name)
    }

    /// Ballot id is unknown to the ledger.
    pub fn ballot_not_found(ballot_id: impl Into<String>) -> Self {
        Self::not_found_with_id("Ballot", ballot_id)
    }

    /// Group is missing or has no usable roster.
    pub fn roster_unavailable(group_id: impl Into<String>) -> Self {
        Self::not_found_with_id("Roster", group_id)
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error with field name.
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Points could not be coerced to an integer.
    pub fn invalid_points(raw: impl std::fmt::Display) -> Self {
        Self::invalid_input_field(format!("points must be numeric, got {}", raw), "points")
    }

    /// A required request parameter was absent or blank.
    pub fn missing_field(field: &str) -> Self {
        Self::invalid_input_field(format!("{} is required", field), field)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// Conversions from common error types

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}

impl From<crate::db::DbError> for AppError {
    fn from(err: crate::db::DbError) -> Self {
        Self::database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = AppError::database("connection failed");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"Database\""));
        assert!(json.contains("connection failed"));
    }

    #[test]
    fn test_not_found_with_id() {
        let err = AppError::ballot_not_found("b-123");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"resource\":\"Ballot\""));
        assert!(json.contains("\"id\":\"b-123\""));
    }

    #[test]
    fn test_membership_mismatch_carries_diagnostic() {
        let err = AppError::NotAGroupMember {
            submitted_group: "blue".to_string(),
            member_groups: vec!["red".to_string()],
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "NotAGroupMember");
        assert_eq!(json["details"]["submittedGroup"], "blue");
        assert_eq!(json["details"]["memberGroups"][0], "red");
    }

    #[test]
    fn test_optional_fields_not_serialized() {
        let err = AppError::database("error");
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("operation"));
    }

    #[test]
    fn test_display_impl() {
        let err = AppError::invalid_points("\"ten\"");
        assert_eq!(
            format!("{}", err),
            "Invalid input: points must be numeric, got \"ten\""
        );
        assert_eq!(
            AppError::AlreadyReviewed {
                ballot_id: "b1".into()
            }
            .to_string(),
            "Ballot b1 has already been reviewed"
        );
    }
}
