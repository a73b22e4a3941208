/**
 * Admin Handler Types
 *
 * Request and response bodies for the `/api/admin` endpoints. Request fields
 * are optional so that a missing field produces the endpoint's own 400
 * message instead of a body-rejection error.
 */

use serde::{Deserialize, Serialize};

use crate::shared::AdminProfile;

/// Login request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login response
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub message: String,
    /// Bearer token for the admin-only routes
    pub token: String,
}

/// Create-admin request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    /// Plain-text password, hashed before storage
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Role name, defaults to `Admin`
    pub role: Option<String>,
}

/// Update-admin request
///
/// `role` keeps the stored role when absent. A non-empty `password` replaces
/// the stored hash.
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

/// Password-reset request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ResetPasswordRequest {
    pub password: Option<String>,
}

/// Role-change request
#[derive(Deserialize, Serialize, Debug)]
pub struct SetRoleRequest {
    pub role: String,
}

/// Response carrying a single admin profile
#[derive(Serialize, Deserialize, Debug)]
pub struct AdminResponse {
    pub message: String,
    pub admin: AdminProfile,
}
