/**
 * Notification Pipeline
 *
 * Stores notifications and announces new ones on the live channel.
 *
 * `create` persists first and only then enqueues a `NotificationCreated`
 * broadcast carrying the message text alone. A storage failure returns
 * before anything is enqueued; once enqueued there is nothing to undo, since
 * broadcasts leave no durable trace.
 */

use std::sync::Arc;

use crate::backend::error::StoreError;
use crate::backend::notifications::store::NotificationStore;
use crate::backend::realtime::{BroadcastHandle, BroadcastMessage};
use crate::shared::{NewNotification, Notification};

#[derive(Clone)]
pub struct NotificationPipeline {
    store: Arc<dyn NotificationStore>,
    broadcaster: BroadcastHandle,
}

impl NotificationPipeline {
    pub fn new(store: Arc<dyn NotificationStore>, broadcaster: BroadcastHandle) -> Self {
        Self { store, broadcaster }
    }

    /// Persist an unread notification, then broadcast its message text
    pub async fn create(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        recipient_id: i64,
    ) -> Result<Notification, StoreError> {
        let notification = self
            .store
            .create(NewNotification {
                title: title.into(),
                message: message.into(),
                user_id: recipient_id,
            })
            .await?;

        tracing::info!(notification_id = notification.id, user_id = recipient_id, "Notification created");
        self.broadcaster.enqueue(BroadcastMessage::NotificationCreated {
            text: notification.message.clone(),
        });

        Ok(notification)
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Notification>, StoreError> {
        self.store.list_for_user(user_id).await
    }

    pub async fn set_read_status(&self, id: i64, read: bool) -> Result<Option<Notification>, StoreError> {
        self.store.set_read_status(id, read).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::notifications::store::MemoryNotificationStore;
    use crate::backend::realtime::{BroadcastDispatcher, ConnectionRegistry};
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    struct FailingStore;

    #[async_trait]
    impl NotificationStore for FailingStore {
        async fn create(&self, _: NewNotification) -> Result<Notification, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn list_for_user(&self, _: i64) -> Result<Vec<Notification>, StoreError> {
            Ok(Vec::new())
        }
        async fn set_read_status(&self, _: i64, _: bool) -> Result<Option<Notification>, StoreError> {
            Ok(None)
        }
        async fn delete(&self, _: i64) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_create_persists_unread_and_broadcasts_text() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut receivers = Vec::new();
        for _ in 0..3 {
            let (tx, rx) = mpsc::unbounded_channel();
            registry.register(tx);
            receivers.push(rx);
        }
        let (handle, _worker) = BroadcastDispatcher::new(Arc::clone(&registry)).spawn();
        let store = Arc::new(MemoryNotificationStore::new());
        let pipeline = NotificationPipeline::new(store.clone(), handle);

        let created = pipeline.create("Reminder", "Service at 9am", 42).await.unwrap();
        assert!(!created.read_status);
        assert_eq!(store.list_for_user(42).await.unwrap(), vec![created]);

        for rx in receivers.iter_mut() {
            let frame = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
            assert_eq!(frame, r#"{"message":"Service at 9am"}"#);
        }
    }

    #[tokio::test]
    async fn test_storage_failure_broadcasts_nothing() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(tx);
        let (handle, _worker) = BroadcastDispatcher::new(Arc::clone(&registry)).spawn();
        let pipeline = NotificationPipeline::new(Arc::new(FailingStore), handle);

        assert!(pipeline.create("Reminder", "Service at 9am", 42).await.is_err());
        assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());
    }
}
