/**
 * Admin Authorization Middleware
 *
 * Protects the admin-only routes. For every request it:
 *
 * 1. Extracts the bearer token from the `Authorization` header
 * 2. Validates it against the current time
 * 3. Resolves the principal's current role through the `RoleGate`
 * 4. Attaches the `AuthorizedAdmin` to the request extensions
 *
 * Any failure short-circuits with the error response and the handler never
 * runs, so a refused request has no side effects.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::backend::auth::roles::AuthorizedAdmin;
use crate::backend::auth::sessions::{bearer_token, AuthError};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::Role;

/// Require a valid token belonging to an account with the `Admin` role
pub async fn require_admin(State(app_state): State<AppState>, mut request: Request, next: Next) -> Response {
    let header = request.headers().get(AUTHORIZATION).and_then(|h| h.to_str().ok());
    let token = bearer_token(header);

    let principal = match app_state.validator.validate(token, Utc::now()) {
        Ok(principal) => principal,
        Err(e) => {
            tracing::warn!(path = %request.uri().path(), "Rejected token: {}", e);
            return BackendError::from(e).into_response();
        }
    };

    let authorized = match app_state.gate.authorize(principal, Role::Admin).await {
        Ok(authorized) => authorized,
        Err(e) => return BackendError::from(e).into_response(),
    };

    request.extensions_mut().insert(authorized);
    next.run(request).await
}

/// Extractor for the admin authorized by `require_admin`
#[derive(Clone, Debug)]
pub struct AuthAdmin(pub AuthorizedAdmin);

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthorizedAdmin>()
            .cloned()
            .map(AuthAdmin)
            .ok_or_else(|| {
                tracing::warn!("AuthorizedAdmin not found in request extensions");
                BackendError::from(AuthError::MissingCredential)
            })
    }
}
