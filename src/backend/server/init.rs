/**
 * Server Initialization
 *
 * Builds the application state and router.
 *
 * # Initialization Process
 *
 * 1. Connect to PostgreSQL if `DATABASE_URL` is set, else use in-memory stores
 * 2. Start the broadcast worker
 * 3. Build the auth components and pipelines
 * 4. Seed the bootstrap admin, if configured
 * 5. Create the router
 */

use axum::Router;
use bcrypt::{hash, DEFAULT_COST};
use std::sync::Arc;

use crate::backend::auth::{AdminStore, NewAdmin, RoleGate, TokenIssuer, TokenValidator};
use crate::backend::error::StoreError;
use crate::backend::events::EventChangePipeline;
use crate::backend::notifications::NotificationPipeline;
use crate::backend::realtime::{BroadcastDispatcher, ConnectionRegistry};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, BootstrapAdmin, ServerConfig};
use crate::backend::server::state::{AppState, Stores};
use crate::shared::Role;

/// Create and configure the Axum application
pub async fn create_app(config: &ServerConfig) -> Router<()> {
    tracing::info!("Initializing church admin backend server");

    let stores = match &config.database_url {
        Some(url) => match load_database(url).await {
            Some(pool) => Stores::postgres(pool),
            None => Stores::memory(),
        },
        None => {
            tracing::warn!("DATABASE_URL not set. Using in-memory stores; data is lost on restart.");
            Stores::memory()
        }
    };

    let app_state = build_state(config, stores);

    if let Some(bootstrap) = &config.bootstrap_admin {
        if let Err(e) = seed_bootstrap_admin(app_state.admins.as_ref(), bootstrap).await {
            tracing::error!("Failed to seed bootstrap admin: {}", e);
        }
    }

    create_router(app_state)
}

/// Wire the stores into an `AppState` and start the broadcast worker
///
/// Must be called from within a Tokio runtime.
pub fn build_state(config: &ServerConfig, stores: Stores) -> AppState {
    let registry = Arc::new(ConnectionRegistry::new());
    let (broadcaster, _worker) = BroadcastDispatcher::new(Arc::clone(&registry)).spawn();
    tracing::info!("[Realtime] Broadcast worker started");

    AppState {
        registry,
        broadcaster: broadcaster.clone(),
        validator: Arc::new(TokenValidator::new(&config.access_secret)),
        issuer: Arc::new(TokenIssuer::new(&config.access_secret, config.token_ttl)),
        gate: RoleGate::new(Arc::clone(&stores.admins)),
        admins: Arc::clone(&stores.admins),
        notifications: NotificationPipeline::new(stores.notifications, broadcaster.clone()),
        events: EventChangePipeline::new(stores.events, broadcaster),
    }
}

/// Create the bootstrap admin unless the username already exists
pub async fn seed_bootstrap_admin(admins: &dyn AdminStore, bootstrap: &BootstrapAdmin) -> Result<(), StoreError> {
    if admins.find_by_username(&bootstrap.username).await?.is_some() {
        tracing::debug!("Bootstrap admin {} already exists", bootstrap.username);
        return Ok(());
    }

    let admin = admins
        .create(NewAdmin {
            username: bootstrap.username.clone(),
            email: bootstrap.email.clone(),
            password_hash: hash(&bootstrap.password, DEFAULT_COST)?,
            first_name: None,
            last_name: None,
            role: Role::Admin,
        })
        .await?;
    tracing::info!(admin_id = admin.id, "Bootstrap admin {} created", admin.username);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::MemoryAdminStore;

    fn bootstrap() -> BootstrapAdmin {
        BootstrapAdmin {
            username: "pastor".to_string(),
            email: "pastor@example.com".to_string(),
            password: "changeme".to_string(),
        }
    }

    #[tokio::test]
    async fn test_seed_bootstrap_admin_is_idempotent() {
        let store = MemoryAdminStore::new();
        seed_bootstrap_admin(&store, &bootstrap()).await.unwrap();
        seed_bootstrap_admin(&store, &bootstrap()).await.unwrap();

        let admin = store.find_by_username("pastor").await.unwrap().unwrap();
        assert_eq!(admin.id, 1);
        assert!(Role::Admin.matches(&admin.role));
        assert!(bcrypt::verify("changeme", &admin.password_hash).unwrap());
        assert!(store.find_by_id(2).await.unwrap().is_none());
    }
}
