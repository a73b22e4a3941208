/**
 * Event Storage
 *
 * Database operations for church events behind the `EventStore` trait.
 * Listing is ordered by start date, newest first, and is not paginated.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::backend::error::StoreError;
use crate::shared::{Event, EventChanges, NewEvent};

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create(&self, event: NewEvent) -> Result<Event, StoreError>;
    async fn list(&self) -> Result<Vec<Event>, StoreError>;
    async fn get(&self, id: i64) -> Result<Option<Event>, StoreError>;
    /// Returns the updated event, or `None` if no event had that ID
    async fn update(&self, id: i64, changes: EventChanges) -> Result<Option<Event>, StoreError>;
    /// Returns `false` if no event had that ID
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    title: String,
    description: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    location: String,
    organizer: String,
    organizer_email: String,
    image: Option<String>,
    branch_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            title: row.title,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            location: row.location,
            organizer: row.organizer,
            organizer_email: row.organizer_email,
            image: row.image,
            branch_id: row.branch_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const EVENT_COLUMNS: &str = "id, title, description, start_date, end_date, location, organizer, \
     organizer_email, image, branch_id, created_at, updated_at";

/// PostgreSQL event store
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn create(&self, event: NewEvent) -> Result<Event, StoreError> {
        let query = format!(
            "INSERT INTO church_events
                 (title, description, start_date, end_date, location, organizer,
                  organizer_email, image, branch_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.start_date)
            .bind(event.end_date)
            .bind(&event.location)
            .bind(&event.organizer)
            .bind(&event.organizer_email)
            .bind(&event.image)
            .bind(event.branch_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM church_events ORDER BY start_date DESC, id DESC");
        let rows = sqlx::query_as::<_, EventRow>(&query).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Event>, StoreError> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM church_events WHERE id = $1");
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn update(&self, id: i64, changes: EventChanges) -> Result<Option<Event>, StoreError> {
        let query = format!(
            "UPDATE church_events
             SET title = $2, description = $3, start_date = $4, end_date = $5,
                 location = $6, organizer = $7, image = $8, updated_at = $9
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(changes.start_date)
            .bind(changes.end_date)
            .bind(&changes.location)
            .bind(&changes.organizer)
            .bind(&changes.image)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM church_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// In-memory event store
#[derive(Default)]
pub struct MemoryEventStore {
    inner: RwLock<(i64, BTreeMap<i64, Event>)>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn create(&self, event: NewEvent) -> Result<Event, StoreError> {
        let mut guard = self.inner.write().await;
        let (next_id, rows) = &mut *guard;
        *next_id += 1;
        let now = Utc::now();
        let stored = Event {
            id: *next_id,
            title: event.title,
            description: event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            location: event.location,
            organizer: event.organizer,
            organizer_email: event.organizer_email,
            image: event.image,
            branch_id: event.branch_id,
            created_at: now,
            updated_at: now,
        };
        rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let guard = self.inner.read().await;
        let mut events: Vec<_> = guard.1.values().cloned().collect();
        events.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        Ok(events)
    }

    async fn get(&self, id: i64) -> Result<Option<Event>, StoreError> {
        Ok(self.inner.read().await.1.get(&id).cloned())
    }

    async fn update(&self, id: i64, changes: EventChanges) -> Result<Option<Event>, StoreError> {
        let mut guard = self.inner.write().await;
        Ok(guard.1.get_mut(&id).map(|event| {
            event.apply(changes, Utc::now());
            event.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.1.remove(&id).is_some())
    }
}
