//! Notifications Module
//!
//! Persisted notifications and the pipeline that announces new ones to live
//! clients.
//!
//! - **`store`** - `NotificationStore` trait, PostgreSQL and in-memory stores
//! - **`pipeline`** - `NotificationPipeline`: persist, then enqueue a broadcast
//! - **`handlers`** - `/api/notification` HTTP handlers

pub mod store;

pub mod pipeline;

pub mod handlers;

pub use pipeline::NotificationPipeline;
pub use store::{MemoryNotificationStore, NotificationStore, PgNotificationStore};
