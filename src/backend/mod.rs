//! Backend Module
//!
//! All server-side code: an Axum HTTP server with admin authentication,
//! notification and event endpoints, and WebSocket live updates.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Tokens, admin accounts and the role gate
//! - **`middleware`** - `require_admin` route layer
//! - **`notifications`** - Notification storage, pipeline and handlers
//! - **`events`** - Event storage, change pipeline and handlers
//! - **`realtime`** - Session registry, broadcast dispatcher, WebSocket handler
//! - **`error`** - Backend error types and their JSON responses
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication and authorization
//! ├── middleware/     - Request middleware
//! ├── notifications/  - Notifications
//! ├── events/         - Church events
//! ├── realtime/       - Live updates
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! ```text
//! request ─▶ TraceLayer ─▶ require_admin (admin-only routes) ─▶ handler ─▶ pipeline
//!                                                                            │
//!                                           store commit ◀───────────────────┤
//!                                                                            ▼
//!                                                   BroadcastHandle::enqueue (after commit)
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and admin accounts
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Notifications
pub mod notifications;

/// Church events
pub mod events;

/// Real-time update system
pub mod realtime;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use server::create_app;
