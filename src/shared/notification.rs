/**
 * Notification Records
 *
 * A notification is addressed to one recipient and is immutable once
 * created, except for its read flag. Only the message text travels over the
 * live-update channel; the full record is returned by the REST API.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    /// Recipient user ID
    pub user_id: i64,
    pub read_status: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for a notification that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub user_id: i64,
}
