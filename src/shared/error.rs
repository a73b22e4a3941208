//! Shared Error Types
//!
//! Errors raised while turning request bodies into domain values. The backend
//! maps `ValidationError` to `400 Bad Request` and surfaces only its message.
//!
//! # Usage
//!
//! ```rust
//! use church_admin::shared::error::SharedError;
//!
//! let error = SharedError::validation("branchId", "Branch ID is required");
//! assert_eq!(error.user_message(), "Branch ID is required");
//! ```
use thiserror::Error;

/// Shared error types raised while validating records
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Message returned to the client as-is
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The message shown to API clients, without the field prefix
    pub fn user_message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("organizerEmail", "Organizer email is required");
        let SharedError::ValidationError { field, message } = &error;
        assert_eq!(field, "organizerEmail");
        assert_eq!(message, "Organizer email is required");
        assert_eq!(error.user_message(), "Organizer email is required");
    }

    #[test]
    fn test_display_names_the_field() {
        let error = SharedError::validation("branchId", "Branch ID is required");
        assert_eq!(error.to_string(), "Validation error in field 'branchId': Branch ID is required");
    }
}
