/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines all
 * route groups into a single Axum router.
 *
 * # Route Groups
 *
 * 1. Root and live channel (`/`, `/ws`)
 * 2. API routes (`/api/admin`, `/api/notification`, `/api/events`)
 * 3. Fallback handler (404)
 *
 * Tracing and CORS layers wrap every route.
 */

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::realtime::handle_ws_upgrade;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

pub const ROOT_MESSAGE: &str = "Welcome to the Church Management System API";

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        .route("/", get(|| async { ROOT_MESSAGE }))
        .route("/ws", get(handle_ws_upgrade));

    let router = configure_api_routes(router, &app_state);

    router
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
