//! Admin Handlers Module
//!
//! HTTP handlers for `/api/admin`.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports
//! ├── types.rs     - Request and response types
//! ├── login.rs     - POST /api/admin/login
//! └── accounts.rs  - Admin account CRUD (admin-only)
//! ```

/// Request and response types
pub mod types;

/// Login handler
pub mod login;

/// Account handlers
pub mod accounts;

pub use accounts::{create_admin, delete_admin, get_admin, list_admins, reset_password, set_admin_role, update_admin};
pub use login::login;
pub use types::{
    AdminResponse, CreateAdminRequest, LoginRequest, LoginResponse, ResetPasswordRequest, SetRoleRequest,
    UpdateAdminRequest,
};
