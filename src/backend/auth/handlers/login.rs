/**
 * Login Handler
 *
 * Implements `POST /api/admin/login`.
 *
 * # Authentication Process
 *
 * 1. Look up the admin by username
 * 2. Verify the password using bcrypt
 * 3. Issue a bearer token whose subject is the admin ID
 *
 * An unknown username and a wrong password both return 401 with the same
 * message.
 */
use axum::{extract::State, http::StatusCode, Json};
use bcrypt::verify;
use chrono::Utc;
use std::sync::Arc;

use crate::backend::auth::admins::AdminStore;
use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::backend::auth::sessions::TokenIssuer;
use crate::backend::error::{BackendError, StoreError};
use crate::backend::middleware::ApiJson;
use crate::shared::non_empty;

const INVALID_CREDENTIALS: &str = "Invalid credentials.";

pub async fn login(
    State(admins): State<Arc<dyn AdminStore>>,
    State(issuer): State<Arc<TokenIssuer>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, BackendError> {
    let (Some(username), Some(password)) = (non_empty(request.username), request.password.filter(|p| !p.is_empty()))
    else {
        return Err(BackendError::bad_request("Username and password are required."));
    };

    let admin = admins
        .find_by_username(&username)
        .await
        .map_err(|e| BackendError::persistence("Server error", e))?
        .ok_or_else(|| {
            tracing::warn!("Login failed, unknown username: {}", username);
            BackendError::handler(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS)
        })?;

    let valid = verify(&password, &admin.password_hash)
        .map_err(|e| BackendError::persistence("Server error", StoreError::Hash(e)))?;
    if !valid {
        tracing::warn!(admin_id = admin.id, "Login failed, wrong password");
        return Err(BackendError::handler(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS));
    }

    let token = issuer.issue(admin.id, Utc::now()).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    })?;

    tracing::info!(admin_id = admin.id, "Admin logged in: {}", admin.username);
    Ok(Json(LoginResponse {
        message: "Admin authenticated successfully".to_string(),
        token,
    }))
}
