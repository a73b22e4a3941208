/**
 * Notification Storage
 *
 * Database operations for notifications, behind the `NotificationStore`
 * trait so the pipeline can run against PostgreSQL or memory.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::backend::error::StoreError;
use crate::shared::{NewNotification, Notification};

#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Store a new notification, unread
    async fn create(&self, notification: NewNotification) -> Result<Notification, StoreError>;
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Notification>, StoreError>;
    async fn set_read_status(&self, id: i64, read: bool) -> Result<Option<Notification>, StoreError>;
    /// Returns `false` if no notification had that ID
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    title: String,
    message: String,
    user_id: i64,
    read_status: bool,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: row.id,
            title: row.title,
            message: row.message,
            user_id: row.user_id,
            read_status: row.read_status,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL notification store
#[derive(Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn create(&self, notification: NewNotification) -> Result<Notification, StoreError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (title, message, user_id, read_status, created_at)
            VALUES ($1, $2, $3, FALSE, $4)
            RETURNING id, title, message, user_id, read_status, created_at
            "#,
        )
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Notification>, StoreError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, title, message, user_id, read_status, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_read_status(&self, id: i64, read: bool) -> Result<Option<Notification>, StoreError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notifications SET read_status = $2
            WHERE id = $1
            RETURNING id, title, message, user_id, read_status, created_at
            "#,
        )
        .bind(id)
        .bind(read)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// In-memory notification store
#[derive(Default)]
pub struct MemoryNotificationStore {
    inner: RwLock<(i64, BTreeMap<i64, Notification>)>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn create(&self, notification: NewNotification) -> Result<Notification, StoreError> {
        let mut guard = self.inner.write().await;
        let (next_id, rows) = &mut *guard;
        *next_id += 1;
        let stored = Notification {
            id: *next_id,
            title: notification.title,
            message: notification.message,
            user_id: notification.user_id,
            read_status: false,
            created_at: Utc::now(),
        };
        rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Notification>, StoreError> {
        let guard = self.inner.read().await;
        let mut found: Vec<_> = guard.1.values().filter(|n| n.user_id == user_id).cloned().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(found)
    }

    async fn set_read_status(&self, id: i64, read: bool) -> Result<Option<Notification>, StoreError> {
        let mut guard = self.inner.write().await;
        Ok(guard.1.get_mut(&id).map(|n| {
            n.read_status = read;
            n.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.1.remove(&id).is_some())
    }
}
