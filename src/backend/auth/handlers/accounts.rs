/**
 * Admin Account Handlers
 *
 * List, create, read, update, re-role, reset and delete admin accounts. All
 * of these sit behind the admin-only route layer. Responses carry
 * `AdminProfile`, never the password hash.
 */
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use bcrypt::{hash, DEFAULT_COST};
use serde_json::json;
use std::sync::Arc;

use crate::backend::auth::admins::{AdminStore, AdminUpdate, NewAdmin};
use crate::backend::auth::handlers::types::{
    AdminResponse, CreateAdminRequest, ResetPasswordRequest, SetRoleRequest, UpdateAdminRequest,
};
use crate::backend::error::{BackendError, StoreError};
use crate::backend::middleware::{ApiJson, ApiPath, AuthAdmin};
use crate::shared::{non_empty, AdminProfile, Role};

fn parse_role(raw: Option<&str>) -> Result<Option<Role>, BackendError> {
    raw.map(|raw| Role::parse(raw).ok_or_else(|| BackendError::bad_request("Invalid role.")))
        .transpose()
}

fn hash_password(password: &str, context: &'static str) -> Result<String, BackendError> {
    hash(password, DEFAULT_COST).map_err(|e| BackendError::persistence(context, StoreError::Hash(e)))
}

/// `GET /api/admin`
pub async fn list_admins(State(admins): State<Arc<dyn AdminStore>>) -> Result<Json<serde_json::Value>, BackendError> {
    let profiles: Vec<AdminProfile> = admins
        .list()
        .await
        .map_err(|e| BackendError::persistence("Error fetching admins.", e))?
        .iter()
        .map(|admin| admin.profile())
        .collect();

    tracing::info!(count = profiles.len(), "Listed admins");
    Ok(Json(json!({ "admins": profiles })))
}

/// `POST /api/admin`
pub async fn create_admin(
    State(admins): State<Arc<dyn AdminStore>>,
    AuthAdmin(caller): AuthAdmin,
    ApiJson(request): ApiJson<CreateAdminRequest>,
) -> Result<impl IntoResponse, BackendError> {
    let (Some(username), Some(email), Some(password)) = (
        non_empty(request.username),
        non_empty(request.email),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(BackendError::bad_request("Username, email, and password are required."));
    };

    let role = parse_role(request.role.as_deref())?.unwrap_or_default();
    let password_hash = hash_password(&password, "Error creating admin.")?;

    let admin = admins
        .create(NewAdmin {
            username,
            email,
            password_hash,
            first_name: non_empty(request.first_name),
            last_name: non_empty(request.last_name),
            role,
        })
        .await
        .map_err(|e| BackendError::persistence("Error creating admin.", e))?;

    tracing::info!(admin_id = admin.id, created_by = caller.account.id, role = %admin.role, "Admin created");
    Ok((
        StatusCode::CREATED,
        Json(AdminResponse {
            message: "Admin created successfully".to_string(),
            admin: admin.profile(),
        }),
    ))
}

/// `GET /api/admin/{id}`
pub async fn get_admin(
    State(admins): State<Arc<dyn AdminStore>>,
    ApiPath(admin_id): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let admin = admins
        .find_by_id(admin_id)
        .await
        .map_err(|e| BackendError::persistence("Error fetching admin.", e))?
        .ok_or_else(|| BackendError::not_found("Admin not found."))?;

    Ok(Json(json!({ "admin": admin.profile() })))
}

/// `PUT /api/admin/{id}`
pub async fn update_admin(
    State(admins): State<Arc<dyn AdminStore>>,
    ApiPath(admin_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateAdminRequest>,
) -> Result<Json<AdminResponse>, BackendError> {
    let (Some(username), Some(email)) = (non_empty(request.username), non_empty(request.email)) else {
        return Err(BackendError::bad_request("Username and email are required."));
    };

    let role = parse_role(request.role.as_deref())?;
    let password_hash = match request.password.filter(|p| !p.is_empty()) {
        Some(password) => Some(hash_password(&password, "Error updating admin.")?),
        None => None,
    };
    let password_changed = password_hash.is_some();

    let admin = admins
        .update(
            admin_id,
            AdminUpdate {
                username,
                email,
                first_name: non_empty(request.first_name),
                last_name: non_empty(request.last_name),
                role,
                password_hash,
            },
        )
        .await
        .map_err(|e| BackendError::persistence("Error updating admin.", e))?
        .ok_or_else(|| BackendError::not_found("Admin not found."))?;

    tracing::info!(admin_id = admin.id, role = %admin.role, password_changed, "Admin updated");
    Ok(Json(AdminResponse {
        message: "Admin updated successfully".to_string(),
        admin: admin.profile(),
    }))
}

/// `PUT /api/admin/{id}/role`
pub async fn set_admin_role(
    State(admins): State<Arc<dyn AdminStore>>,
    ApiPath(admin_id): ApiPath<i64>,
    ApiJson(request): ApiJson<SetRoleRequest>,
) -> Result<Json<AdminResponse>, BackendError> {
    let role = Role::parse(&request.role).ok_or_else(|| BackendError::bad_request("Invalid role."))?;
    let admin = admins
        .set_role(admin_id, role)
        .await
        .map_err(|e| BackendError::persistence("Error updating admin role.", e))?
        .ok_or_else(|| BackendError::not_found("Admin not found."))?;

    tracing::info!(admin_id = admin.id, role = %role, "Admin role changed");
    Ok(Json(AdminResponse {
        message: "Admin role updated successfully".to_string(),
        admin: admin.profile(),
    }))
}

/// `PUT /api/admin/{id}/password`
pub async fn reset_password(
    State(admins): State<Arc<dyn AdminStore>>,
    ApiPath(admin_id): ApiPath<i64>,
    ApiJson(request): ApiJson<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let Some(password) = request.password.filter(|p| !p.is_empty()) else {
        return Err(BackendError::bad_request("Password is required."));
    };

    let password_hash = hash_password(&password, "Error resetting password.")?;
    admins
        .set_password(admin_id, password_hash)
        .await
        .map_err(|e| BackendError::persistence("Error resetting password.", e))?
        .ok_or_else(|| BackendError::not_found("Admin not found."))?;

    tracing::info!(admin_id, "Admin password reset");
    Ok(Json(json!({ "message": "Password reset successfully" })))
}

/// `DELETE /api/admin/{id}`
pub async fn delete_admin(
    State(admins): State<Arc<dyn AdminStore>>,
    ApiPath(admin_id): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let deleted = admins
        .delete(admin_id)
        .await
        .map_err(|e| BackendError::persistence("Error deleting admin.", e))?;
    if !deleted {
        return Err(BackendError::not_found("Admin not found."));
    }

    tracing::info!(admin_id, "Admin deleted");
    Ok(Json(json!({ "message": "Admin deleted successfully" })))
}
