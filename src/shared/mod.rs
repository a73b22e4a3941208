//! Shared Module
//!
//! This module contains the record types exchanged over the REST API and the
//! live-update channel. They carry no server state and serialize to the
//! camelCase JSON shape clients already consume.
//!
//! # Overview
//!
//! - **`event`** - Church events and the request bodies that create or update them
//! - **`notification`** - Persisted notifications
//! - **`admin`** - Admin roles and the public admin profile
//! - **`error`** - Validation errors

/// Church event records
pub mod event;

/// Notification records
pub mod notification;

/// Admin roles and profiles
pub mod admin;

/// Shared error types
pub mod error;

/// Trim a request field, treating blank text as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Re-export commonly used types for convenience
pub use admin::{AdminProfile, Role};
pub use error::SharedError;
pub use event::{Event, EventChanges, NewEvent};
pub use notification::{NewNotification, Notification};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_trims_and_drops_blank() {
        assert_eq!(non_empty(Some("  pastor ".to_string())).as_deref(), Some("pastor"));
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }
}
