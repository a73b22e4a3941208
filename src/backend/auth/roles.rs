/**
 * Role Gate
 *
 * Resolves a validated principal's current role from the account store and
 * enforces the role a route requires. The lookup runs on every call, so a
 * deleted account or a changed role takes effect on the next request.
 */

use std::sync::Arc;
use thiserror::Error;

use crate::backend::auth::admins::{AdminRecord, AdminStore};
use crate::backend::auth::sessions::Principal;
use crate::backend::error::StoreError;
use crate::shared::Role;

/// Why an authenticated principal was refused
#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("Admin not found.")]
    PrincipalNotFound,
    #[error("Access denied. Admins only.")]
    RoleMismatch,
    #[error("An error occurred while checking admin role.")]
    Lookup(#[source] StoreError),
}

/// A principal whose role has been checked for this request
#[derive(Debug, Clone)]
pub struct AuthorizedAdmin {
    pub principal: Principal,
    pub account: AdminRecord,
}

/// Enforces required roles against the account store
#[derive(Clone)]
pub struct RoleGate {
    accounts: Arc<dyn AdminStore>,
}

impl RoleGate {
    pub fn new(accounts: Arc<dyn AdminStore>) -> Self {
        Self { accounts }
    }

    /// Check that `principal` currently holds `required`
    pub async fn authorize(&self, principal: Principal, required: Role) -> Result<AuthorizedAdmin, AuthzError> {
        let account = self
            .accounts
            .find_by_id(principal.subject_id)
            .await
            .map_err(AuthzError::Lookup)?
            .ok_or(AuthzError::PrincipalNotFound)?;

        if !required.matches(&account.role) {
            tracing::warn!(
                admin_id = account.id,
                role = %account.role,
                required = %required,
                "Role check failed"
            );
            return Err(AuthzError::RoleMismatch);
        }

        Ok(AuthorizedAdmin { principal, account })
    }
}
