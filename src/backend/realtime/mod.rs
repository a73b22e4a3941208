//! Real-time Update Module
//!
//! This module delivers live updates to connected WebSocket clients.
//!
//! # Architecture
//!
//! - **`registry`** - `ConnectionRegistry`: the set of open sessions
//! - **`dispatcher`** - `BroadcastDispatcher`: fan-out to a registry snapshot,
//!   and the `BroadcastHandle` producers enqueue on
//! - **`message`** - `BroadcastMessage` and its wire encoding
//! - **`socket`** - `GET /ws` upgrade and per-connection lifecycle
//!
//! # Flow
//!
//! ```text
//! pipeline ──enqueue──▶ BroadcastHandle ──snapshot──▶ worker ──▶ Session::send
//!                              ▲
//! /ws upgrade ──register──▶ ConnectionRegistry
//! ```
//!
//! There is exactly one registry per process, created in `server::init` and
//! handed explicitly to the dispatcher and the socket handler.

/// Session registry
pub mod registry;

/// Fan-out dispatcher and producer handle
pub mod dispatcher;

/// Broadcast message types
pub mod message;

/// WebSocket connection handler
pub mod socket;

// Re-export commonly used types and functions
pub use dispatcher::{BroadcastDispatcher, BroadcastHandle, DispatchReport};
pub use message::BroadcastMessage;
pub use registry::{BroadcastError, ConnectionRegistry, Session, SessionId, SessionState};
pub use socket::{handle_ws_upgrade, GREETING};
