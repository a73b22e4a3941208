/**
 * Application State Management
 *
 * This module defines the application state structure and implements the
 * `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - the live-session registry and the broadcast handle that feeds it
 * - the token validator, issuer and role gate used by the auth layer
 * - the admin account store
 * - the notification and event pipelines
 *
 * Every field is cheap to clone (`Arc` or a handle wrapping one), so the
 * state is cloned per request without copying data.
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::{AdminStore, MemoryAdminStore, PgAdminStore, RoleGate, TokenIssuer, TokenValidator};
use crate::backend::events::{EventChangePipeline, EventStore, MemoryEventStore, PgEventStore};
use crate::backend::notifications::{
    MemoryNotificationStore, NotificationPipeline, NotificationStore, PgNotificationStore,
};
use crate::backend::realtime::{BroadcastHandle, ConnectionRegistry};

/// The storage backends the server runs on
#[derive(Clone)]
pub struct Stores {
    pub admins: Arc<dyn AdminStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub events: Arc<dyn EventStore>,
}

impl Stores {
    /// PostgreSQL-backed stores sharing one pool
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            admins: Arc::new(PgAdminStore::new(pool.clone())),
            notifications: Arc::new(PgNotificationStore::new(pool.clone())),
            events: Arc::new(PgEventStore::new(pool)),
        }
    }

    /// Empty in-memory stores
    pub fn memory() -> Self {
        Self {
            admins: Arc::new(MemoryAdminStore::new()),
            notifications: Arc::new(MemoryNotificationStore::new()),
            events: Arc::new(MemoryEventStore::new()),
        }
    }
}

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Open live-update sessions
    pub registry: Arc<ConnectionRegistry>,

    /// Producer side of the broadcast queue
    pub broadcaster: BroadcastHandle,

    pub validator: Arc<TokenValidator>,
    pub issuer: Arc<TokenIssuer>,

    /// Resolves the caller's current role on each admin-only request
    pub gate: RoleGate,

    pub admins: Arc<dyn AdminStore>,
    pub notifications: NotificationPipeline,
    pub events: EventChangePipeline,
}

impl FromRef<AppState> for Arc<ConnectionRegistry> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.registry.clone()
    }
}

impl FromRef<AppState> for BroadcastHandle {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.broadcaster.clone()
    }
}

impl FromRef<AppState> for Arc<TokenIssuer> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.issuer.clone()
    }
}

impl FromRef<AppState> for Arc<dyn AdminStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.admins.clone()
    }
}

impl FromRef<AppState> for NotificationPipeline {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.notifications.clone()
    }
}

impl FromRef<AppState> for EventChangePipeline {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.events.clone()
    }
}
