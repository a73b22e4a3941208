/**
 * Event Change Pipeline
 *
 * Applies event changes to storage and announces committed updates and
 * deletions on the live channel.
 *
 * A broadcast is enqueued only after the store reports success. If the event
 * does not exist or the store fails, nothing is broadcast. Creation is stored
 * silently.
 */

use std::sync::Arc;

use crate::backend::error::StoreError;
use crate::backend::events::store::EventStore;
use crate::backend::realtime::{BroadcastHandle, BroadcastMessage};
use crate::shared::{Event, EventChanges, NewEvent};

#[derive(Clone)]
pub struct EventChangePipeline {
    store: Arc<dyn EventStore>,
    broadcaster: BroadcastHandle,
}

impl EventChangePipeline {
    pub fn new(store: Arc<dyn EventStore>, broadcaster: BroadcastHandle) -> Self {
        Self { store, broadcaster }
    }

    pub async fn create(&self, event: NewEvent) -> Result<Event, StoreError> {
        let event = self.store.create(event).await?;
        tracing::info!(event_id = event.id, "Event created");
        Ok(event)
    }

    pub async fn list(&self) -> Result<Vec<Event>, StoreError> {
        self.store.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Event>, StoreError> {
        self.store.get(id).await
    }

    /// Replace an event's editable fields, then broadcast the full record
    pub async fn update(&self, id: i64, changes: EventChanges) -> Result<Option<Event>, StoreError> {
        let Some(event) = self.store.update(id, changes).await? else {
            return Ok(None);
        };

        tracing::info!(event_id = event.id, "Event updated");
        self.broadcaster.enqueue(BroadcastMessage::EventUpdated { event: event.clone() });
        Ok(Some(event))
    }

    /// Delete an event, then broadcast its ID
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        if !self.store.delete(id).await? {
            return Ok(false);
        }

        tracing::info!(event_id = id, "Event deleted");
        self.broadcaster.enqueue(BroadcastMessage::EventDeleted { event_id: id });
        Ok(true)
    }
}
