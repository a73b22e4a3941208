//! Notification HTTP Handlers
//!
//! Handlers for `/api/notification`. Creation is admin-only (enforced by the
//! route layer) and is the only operation that broadcasts.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, ApiPath};
use crate::backend::notifications::pipeline::NotificationPipeline;

/// Request body for `POST /api/notification/send-notifications`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub user_id: Option<i64>,
}

/// Request body for `PATCH /api/notification/notifications/{id}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationStatusRequest {
    pub read_status: bool,
}

/// Create a notification and broadcast its text to live clients
///
/// Responds `201` with `{"message": "<text>"}` only.
pub async fn create_notification(
    State(pipeline): State<NotificationPipeline>,
    ApiJson(request): ApiJson<CreateNotificationRequest>,
) -> Result<impl IntoResponse, BackendError> {
    let title = request.title.filter(|t| !t.trim().is_empty());
    let message = request.message.filter(|m| !m.trim().is_empty());
    let (Some(title), Some(message), Some(user_id)) = (title, message, request.user_id) else {
        return Err(BackendError::bad_request("Title, message, and userId are required."));
    };

    let notification = pipeline
        .create(title, message, user_id)
        .await
        .map_err(|e| BackendError::persistence("Failed to create notification", e))?;

    Ok((StatusCode::CREATED, Json(json!({ "message": notification.message }))))
}

/// List a user's notifications
pub async fn get_notifications(
    State(pipeline): State<NotificationPipeline>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<Response, BackendError> {
    let notifications = pipeline
        .list_for_user(user_id)
        .await
        .map_err(|e| BackendError::persistence("Error fetching notifications.", e))?;

    if notifications.is_empty() {
        return Ok((StatusCode::NOT_FOUND, Json(json!({ "message": "No notifications found." }))).into_response());
    }

    Ok(Json(json!({ "notifications": notifications })).into_response())
}

/// Set a notification's read flag
pub async fn update_notification_status(
    State(pipeline): State<NotificationPipeline>,
    ApiPath(notification_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateNotificationStatusRequest>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let notification = pipeline
        .set_read_status(notification_id, request.read_status)
        .await
        .map_err(|e| BackendError::persistence("Error updating notification status.", e))?
        .ok_or_else(|| BackendError::not_found("Notification not found."))?;

    Ok(Json(json!({
        "message": "Notification status updated successfully.",
        "notification": notification,
    })))
}

/// Delete a notification
pub async fn delete_notification(
    State(pipeline): State<NotificationPipeline>,
    ApiPath(notification_id): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let deleted = pipeline
        .delete(notification_id)
        .await
        .map_err(|e| BackendError::persistence("Error deleting notification.", e))?;

    if !deleted {
        return Err(BackendError::not_found("Notification not found."));
    }

    Ok(Json(json!({ "message": "Notification deleted successfully." })))
}
