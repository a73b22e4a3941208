/**
 * Broadcast Messages
 *
 * The transient messages fanned out to live sessions. They are never
 * persisted. Each serializes to one JSON object per text frame:
 *
 * - `NotificationCreated` → `{"message": "<text>"}`
 * - `EventUpdated` → `{"type": "EVENT_UPDATED", "event": {...}}`
 * - `EventDeleted` → `{"type": "EVENT_DELETED", "eventId": "<id>"}`
 */

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::shared::Event;

#[derive(Debug, Clone, PartialEq)]
pub enum BroadcastMessage {
    /// A notification was stored; carries only its message text
    NotificationCreated { text: String },
    EventUpdated { event: Event },
    EventDeleted { event_id: i64 },
}

impl BroadcastMessage {
    /// Short name for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotificationCreated { .. } => "notification_created",
            Self::EventUpdated { .. } => "event_updated",
            Self::EventDeleted { .. } => "event_deleted",
        }
    }

    /// Encode as a wire frame
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for BroadcastMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NotificationCreated { text } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("message", text)?;
                map.end()
            }
            Self::EventUpdated { event } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "EVENT_UPDATED")?;
                map.serialize_entry("event", event)?;
                map.end()
            }
            Self::EventDeleted { event_id } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "EVENT_DELETED")?;
                map.serialize_entry("eventId", &event_id.to_string())?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_notification_frame_carries_only_text() {
        let frame = BroadcastMessage::NotificationCreated {
            text: "Service at 9am".to_string(),
        }
        .to_frame()
        .unwrap();
        assert_eq!(frame, r#"{"message":"Service at 9am"}"#);
    }

    #[test]
    fn test_event_deleted_frame() {
        let frame = BroadcastMessage::EventDeleted { event_id: 12 }.to_frame().unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value, json!({ "type": "EVENT_DELETED", "eventId": "12" }));
    }

    #[test]
    fn test_event_updated_frame() {
        let now = Utc::now();
        let event = Event {
            id: 4,
            title: "Choir Practice".to_string(),
            description: "Weekly".to_string(),
            start_date: now,
            end_date: now,
            location: "Hall".to_string(),
            organizer: "Jane".to_string(),
            organizer_email: "jane@example.com".to_string(),
            image: None,
            branch_id: 1,
            created_at: now,
            updated_at: now,
        };
        let frame = BroadcastMessage::EventUpdated { event: event.clone() }.to_frame().unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["type"], "EVENT_UPDATED");
        assert_eq!(value["event"], serde_json::to_value(&event).unwrap());
    }
}
