/**
 * Church Event Records
 *
 * This module defines the event record served by `/api/events` and pushed to
 * live-update clients inside `EVENT_UPDATED` frames, plus the request bodies
 * used to create and update events.
 *
 * # Dates
 *
 * Clients send either a full RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
 * Plain dates are interpreted as midnight UTC.
 */
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::non_empty;

/// A persisted church event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event ID
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: String,
    pub organizer: String,
    pub organizer_email: String,
    /// Image URL, if one was attached
    pub image: Option<String>,
    /// Owning branch
    pub branch_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new event
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: String,
    pub organizer: String,
    pub organizer_email: String,
    pub image: Option<String>,
    pub branch_id: i64,
}

/// Validated replacement fields for an existing event
///
/// `organizer_email` and `branch_id` are not editable; `image` is replaced
/// wholesale, so `None` clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventChanges {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: String,
    pub organizer: String,
    pub image: Option<String>,
}

impl Event {
    /// Apply an update in place and bump `updated_at`
    pub fn apply(&mut self, changes: EventChanges, now: DateTime<Utc>) {
        self.title = changes.title;
        self.description = changes.description;
        self.start_date = changes.start_date;
        self.end_date = changes.end_date;
        self.location = changes.location;
        self.organizer = changes.organizer;
        self.image = changes.image;
        self.updated_at = now;
    }
}

const MISSING_UPDATE_FIELDS: &str =
    "Title, description, start date, end date, location, and organizer are required.";

/// Request body for `POST /api/events/event`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub organizer_email: Option<String>,
    pub image: Option<String>,
    pub branch_id: Option<i64>,
}

impl CreateEventRequest {
    /// Validate the request and produce a `NewEvent`
    ///
    /// The organizer email and branch are checked first, each with its own
    /// message, before the remaining required fields.
    pub fn validate(self) -> Result<NewEvent, SharedError> {
        let organizer_email = non_empty(self.organizer_email)
            .ok_or_else(|| SharedError::validation("organizerEmail", "Organizer email is required"))?;
        let branch_id = self
            .branch_id
            .ok_or_else(|| SharedError::validation("branchId", "Branch ID is required"))?;

        let missing = || SharedError::validation("event", MISSING_UPDATE_FIELDS);
        Ok(NewEvent {
            title: non_empty(self.title).ok_or_else(missing)?,
            description: non_empty(self.description).ok_or_else(missing)?,
            start_date: parse_date("startDate", non_empty(self.start_date).ok_or_else(missing)?)?,
            end_date: parse_date("endDate", non_empty(self.end_date).ok_or_else(missing)?)?,
            location: non_empty(self.location).ok_or_else(missing)?,
            organizer: non_empty(self.organizer).ok_or_else(missing)?,
            organizer_email,
            image: non_empty(self.image),
            branch_id,
        })
    }
}

/// Request body for `PUT /api/events/event/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub image: Option<String>,
}

impl UpdateEventRequest {
    /// Validate the request and produce `EventChanges`
    pub fn validate(self) -> Result<EventChanges, SharedError> {
        let missing = || SharedError::validation("event", MISSING_UPDATE_FIELDS);
        Ok(EventChanges {
            title: non_empty(self.title).ok_or_else(missing)?,
            description: non_empty(self.description).ok_or_else(missing)?,
            start_date: parse_date("startDate", non_empty(self.start_date).ok_or_else(missing)?)?,
            end_date: parse_date("endDate", non_empty(self.end_date).ok_or_else(missing)?)?,
            location: non_empty(self.location).ok_or_else(missing)?,
            organizer: non_empty(self.organizer).ok_or_else(missing)?,
            image: non_empty(self.image),
        })
    }
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date (midnight UTC)
pub fn parse_date(field: &str, raw: String) -> Result<DateTime<Utc>, SharedError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| SharedError::validation(field, format!("Invalid {}: {}", field, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_create() -> CreateEventRequest {
        CreateEventRequest {
            title: Some("Sunday Service".to_string()),
            description: Some("Weekly church service".to_string()),
            start_date: Some("2024-09-05".to_string()),
            end_date: Some("2024-09-05T12:00:00Z".to_string()),
            location: Some("Church Auditorium".to_string()),
            organizer: Some("John Doe".to_string()),
            organizer_email: Some("johndoe@example.com".to_string()),
            image: None,
            branch_id: Some(3),
        }
    }

    #[test]
    fn test_create_request_validates() {
        let event = full_create().validate().unwrap();
        assert_eq!(event.branch_id, 3);
        assert_eq!(event.start_date.to_rfc3339(), "2024-09-05T00:00:00+00:00");
        assert_eq!(event.end_date.to_rfc3339(), "2024-09-05T12:00:00+00:00");
    }

    #[test]
    fn test_create_requires_organizer_email_first() {
        let request = CreateEventRequest {
            organizer_email: None,
            branch_id: None,
            ..full_create()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.user_message(), "Organizer email is required");
    }

    #[test]
    fn test_create_requires_branch() {
        let request = CreateEventRequest {
            branch_id: None,
            ..full_create()
        };
        assert_eq!(request.validate().unwrap_err().user_message(), "Branch ID is required");
    }

    #[test]
    fn test_update_requires_all_fields() {
        let request = UpdateEventRequest {
            title: Some("Updated Event".to_string()),
            ..Default::default()
        };
        assert_eq!(request.validate().unwrap_err().user_message(), MISSING_UPDATE_FIELDS);
    }

    #[test]
    fn test_invalid_date_rejected() {
        let err = parse_date("startDate", "next tuesday".to_string()).unwrap_err();
        assert!(err.user_message().contains("startDate"));
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let now = Utc::now();
        let event = Event {
            id: 1,
            title: "t".to_string(),
            description: "d".to_string(),
            start_date: now,
            end_date: now,
            location: "l".to_string(),
            organizer: "o".to_string(),
            organizer_email: "o@example.com".to_string(),
            image: None,
            branch_id: 2,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["organizerEmail"], "o@example.com");
        assert_eq!(json["branchId"], 2);
        assert!(json.get("startDate").is_some());
    }
}
