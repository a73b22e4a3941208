//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState, Stores and FromRef implementations
//! ├── config.rs       - Environment configuration and database loading
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::from_env`
//! 2. **Storage**: PostgreSQL when reachable, otherwise in-memory stores
//! 3. **State Creation**: registry, broadcast worker, auth and pipelines
//! 4. **Router Creation**: routes, auth layers and middleware

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{BootstrapAdmin, ConfigError, ServerConfig};
pub use init::{build_state, create_app, seed_bootstrap_admin};
pub use state::{AppState, Stores};
