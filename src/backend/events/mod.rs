//! Church events: storage, change pipeline and HTTP handlers

pub mod handlers;
pub mod pipeline;
pub mod store;

pub use pipeline::EventChangePipeline;
pub use store::{EventStore, MemoryEventStore, PgEventStore};
