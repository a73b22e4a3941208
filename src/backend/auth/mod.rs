//! Authentication Module
//!
//! Bearer-token authentication and role-based authorization for the admin
//! API.
//!
//! # Architecture
//!
//! - **`sessions`** - Token issuing and validation (`TokenIssuer`, `TokenValidator`)
//! - **`admins`** - Admin account model and stores
//! - **`roles`** - `RoleGate`, which resolves a principal's current role per request
//! - **`handlers`** - HTTP handlers for `/api/admin`
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── sessions.rs     - Token management
//! ├── admins.rs       - Admin accounts and database operations
//! ├── roles.rs        - Role gate
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Request Flow
//!
//! 1. **Login**: username and password verified → token returned
//! 2. **Protected request**: token validated → principal's role looked up → handler runs
//!
//! A validated token says who the caller is, never what they may do. The role
//! comes from the account store on every request.

/// Token generation and validation
pub mod sessions;

/// Admin accounts and database operations
pub mod admins;

/// Role gate
pub mod roles;

/// HTTP handlers for admin endpoints
pub mod handlers;

pub use admins::{AdminRecord, AdminStore, AdminUpdate, MemoryAdminStore, NewAdmin, PgAdminStore};
pub use roles::{AuthorizedAdmin, AuthzError, RoleGate};
pub use sessions::{bearer_token, AuthError, Principal, TokenIssuer, TokenValidator};
