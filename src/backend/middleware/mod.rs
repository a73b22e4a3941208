//! Middleware Module
//!
//! HTTP middleware and extractors for the backend server.
//!
//! - **`auth`** - `require_admin`, applied as a route layer to every admin-only route
//! - **`extract`** - `ApiJson` and `ApiPath`, whose rejections are `400 {"error": ...}`

pub mod auth;
pub mod extract;

pub use auth::{require_admin, AuthAdmin};
pub use extract::{ApiJson, ApiPath};
