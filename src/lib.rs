//! Church Admin - Main Library
//!
//! Backend for a church administration system: an admin-authenticated REST
//! API for notifications and events, and a WebSocket channel that pushes
//! live updates to every connected client.
//!
//! # Module Structure
//!
//! - **`shared`** - Record types exchanged over the API and the live channel
//!   - Events, notifications, admin roles and profiles
//!   - Validation errors
//!
//! - **`backend`** - Axum server
//!   - Bearer-token authentication and per-request role checks
//!   - Notification and event pipelines
//!   - Session registry and broadcast fan-out
//!   - PostgreSQL and in-memory storage
//!
//! # Usage
//!
//! ```rust,no_run
//! use church_admin::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Live Updates
//!
//! A client connects to `GET /ws`, receives a greeting frame and from then on
//! every broadcast dispatched while it is connected. Broadcasts are produced
//! after a notification is created and after an event is updated or deleted.
//! Delivery is best-effort: nothing is acknowledged, retried or replayed.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
