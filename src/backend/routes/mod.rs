//! Route Configuration Module
//!
//! - **`router`** - Main router creation, shared layers and fallback
//! - **`api_routes`** - `/api` endpoints, split into public and admin-only groups
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoints
//! ```

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
