/**
 * API Routes
 *
 * # Routes
 *
 * ## Admin
 * - `POST /api/admin/login` - Admin login
 * - `GET /api/admin` - List admins (admin-only)
 * - `POST /api/admin` - Create admin (admin-only)
 * - `GET /api/admin/{id}` - Get admin (admin-only)
 * - `PUT /api/admin/{id}` - Update admin details (admin-only)
 * - `DELETE /api/admin/{id}` - Delete admin (admin-only)
 * - `PUT /api/admin/{id}/role` - Change an admin's role (admin-only)
 * - `PUT /api/admin/{id}/password` - Reset an admin's password (admin-only)
 *
 * ## Notifications
 * - `POST /api/notification/send-notifications` - Create and broadcast (admin-only)
 * - `GET /api/notification/notifications/{id}` - List notifications for user `{id}`
 * - `PATCH /api/notification/notifications/{id}` - Set read status (admin-only)
 * - `DELETE /api/notification/notifications/{id}` - Delete (admin-only)
 *
 * ## Events
 * - `POST /api/events/event` - Create (admin-only)
 * - `GET /api/events/event` - List, newest start date first
 * - `GET /api/events/event/{id}` - Get one
 * - `PUT /api/events/event/{id}` - Update and broadcast (admin-only)
 * - `DELETE /api/events/event/{id}` - Delete and broadcast (admin-only)
 *
 * Admin-only routes are grouped into their own router and wrapped with
 * `require_admin` as a route layer, then merged with the public routes.
 * The layer also wraps the admin-only group's 405 fallback, so an
 * unauthenticated request with an unsupported method on a protected path gets
 * 401 rather than 405.
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};

use crate::backend::auth::handlers::{
    create_admin, delete_admin, get_admin, list_admins, login, reset_password, set_admin_role, update_admin,
};
use crate::backend::events::handlers::{create_event, delete_event, get_event, list_events, update_event};
use crate::backend::middleware::require_admin;
use crate::backend::notifications::handlers::{
    create_notification, delete_notification, get_notifications, update_notification_status,
};
use crate::backend::server::state::AppState;

/// Add every `/api` route to `router`
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/notification/notifications/{id}", get(get_notifications))
        .route("/api/events/event", get(list_events))
        .route("/api/events/event/{id}", get(get_event));

    let admin_only = Router::new()
        .route("/api/admin", get(list_admins).post(create_admin))
        .route("/api/admin/{id}", get(get_admin).put(update_admin).delete(delete_admin))
        .route("/api/admin/{id}/role", put(set_admin_role))
        .route("/api/admin/{id}/password", put(reset_password))
        .route("/api/notification/send-notifications", post(create_notification))
        .route(
            "/api/notification/notifications/{id}",
            patch(update_notification_status).delete(delete_notification),
        )
        .route("/api/events/event", post(create_event))
        .route("/api/events/event/{id}", put(update_event).delete(delete_event))
        .route_layer(from_fn_with_state(app_state.clone(), require_admin));

    router.merge(public).merge(admin_only)
}
