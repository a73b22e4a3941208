/**
 * Backend Error Types
 *
 * This module defines the error taxonomy of the backend server.
 *
 * # Error Categories
 *
 * ## Authentication and authorization
 *
 * `AuthError` (bad or missing bearer token) and `AuthzError` (unknown
 * principal or wrong role) short-circuit a request in the auth middleware,
 * before any handler code runs.
 *
 * ## Persistence
 *
 * `StoreError` is the opaque failure type of the storage layer. Handlers wrap
 * it in `BackendError::Persistence` together with the message the client
 * receives; the storage detail itself is only logged.
 *
 * ## Broadcast
 *
 * Send failures to a live session never reach this type. The dispatcher
 * recovers from them by pruning the session.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::roles::AuthzError;
use crate::backend::auth::sessions::AuthError;
use crate::shared::SharedError;

/// Failure reported by a store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database rejected or failed the query
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint was violated
    #[error("conflicting value for {0}")]
    Conflict(String),

    /// Password hashing failed before the record could be written
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl StoreError {
    /// Convert a sqlx error, classifying unique-constraint violations as conflicts
    pub fn from_sqlx(err: sqlx::Error, what: &str) -> Self {
        let is_unique = err
            .as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false);
        if is_unique {
            Self::Conflict(what.to_string())
        } else {
            Self::Database(err)
        }
    }
}

/// Backend-specific error types
///
/// Every variant converts into a JSON response of the form
/// `{"error": "<message>"}` (see `conversion.rs`).
#[derive(Debug, Error)]
pub enum BackendError {
    /// Bearer token missing or rejected
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Principal unknown or lacks the required role
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// Storage failure while serving a request
    #[error("{message}")]
    Persistence {
        /// Message returned to the client
        message: String,
        #[source]
        source: StoreError,
    },

    /// Handler error (e.g., unknown record, invalid request)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Request body failed validation
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Shorthand for a `404 Not Found` handler error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// Shorthand for a `400 Bad Request` handler error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    /// Wrap a storage failure with the message the client should see
    pub fn persistence(message: impl Into<String>, source: StoreError) -> Self {
        Self::Persistence {
            message: message.into(),
            source,
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Auth` - 401 Unauthorized
    /// - `Authz` - 404 for an unknown principal, 403 for a role mismatch,
    ///   500 if the role lookup itself failed
    /// - `Persistence` - 409 for a uniqueness conflict, otherwise 500
    /// - `HandlerError` - Uses the status code from the error
    /// - `SharedError` - 400 Bad Request
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Authz(err) => match err {
                AuthzError::PrincipalNotFound => StatusCode::NOT_FOUND,
                AuthzError::RoleMismatch => StatusCode::FORBIDDEN,
                AuthzError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Persistence { source, .. } => match source {
                StoreError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(SharedError::ValidationError { .. }) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the message placed in the response body
    pub fn message(&self) -> String {
        match self {
            Self::Auth(err) => err.to_string(),
            Self::Authz(err) => err.to_string(),
            Self::Persistence { message, source } => match source {
                StoreError::Conflict(what) => format!("{} already in use.", what),
                _ => message.clone(),
            },
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(err) => err.user_message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error() {
        let error = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
        match error {
            BackendError::HandlerError { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Invalid request");
            }
            _ => panic!("Expected HandlerError"),
        }
    }

    #[test]
    fn test_auth_status_codes() {
        let cases = [
            (AuthError::MissingCredential, "No token provided."),
            (AuthError::Expired, "Token has expired."),
            (AuthError::Invalid, "Invalid token."),
            (AuthError::VerificationFailed, "Token verification failed."),
        ];
        for (err, expected) in cases {
            let err = BackendError::from(err);
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.message(), expected);
        }
    }

    #[test]
    fn test_authz_status_codes() {
        let not_found = BackendError::from(AuthzError::PrincipalNotFound);
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.message(), "Admin not found.");

        let mismatch = BackendError::from(AuthzError::RoleMismatch);
        assert_eq!(mismatch.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(mismatch.message(), "Access denied. Admins only.");
    }

    #[test]
    fn test_persistence_hides_storage_detail() {
        let err = BackendError::persistence(
            "Failed to create notification",
            StoreError::Database(sqlx::Error::PoolTimedOut),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Failed to create notification");
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = BackendError::persistence(
            "An error occurred while creating the admin.",
            StoreError::Conflict("Username".to_string()),
        );
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "Username already in use.");
    }

    #[test]
    fn test_from_shared_error() {
        let backend_error: BackendError = SharedError::validation("branchId", "Branch ID is required").into();
        assert_eq!(backend_error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(backend_error.message(), "Branch ID is required");
    }
}
