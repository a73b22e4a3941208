//! Common test utilities and helpers
//!
//! - **`app`** - `TestApp`: the full router over in-memory stores, plus
//!   request and live-session helpers
//! - **`auth_helpers`** - Seeded accounts and token helpers

#![allow(dead_code)]

pub mod app;
pub mod auth_helpers;

pub use app::*;
pub use auth_helpers::*;
