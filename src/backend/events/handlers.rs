//! Event HTTP Handlers
//!
//! Handlers for `/api/events/event`. Writes are admin-only (enforced by the
//! route layer); updates and deletions are announced by the pipeline.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, ApiPath};
use crate::backend::events::pipeline::EventChangePipeline;
use crate::shared::event::{CreateEventRequest, UpdateEventRequest};
use crate::shared::Event;

pub async fn create_event(
    State(pipeline): State<EventChangePipeline>,
    ApiJson(request): ApiJson<CreateEventRequest>,
) -> Result<impl IntoResponse, BackendError> {
    let new_event = request.validate()?;
    let event = pipeline
        .create(new_event)
        .await
        .map_err(|e| BackendError::persistence("Error creating event.", e))?;

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list_events(
    State(pipeline): State<EventChangePipeline>,
) -> Result<Json<Vec<Event>>, BackendError> {
    let events = pipeline
        .list()
        .await
        .map_err(|e| BackendError::persistence("Error fetching events.", e))?;
    Ok(Json(events))
}

pub async fn get_event(
    State(pipeline): State<EventChangePipeline>,
    ApiPath(event_id): ApiPath<i64>,
) -> Result<Json<Event>, BackendError> {
    pipeline
        .get(event_id)
        .await
        .map_err(|e| BackendError::persistence("Error fetching event.", e))?
        .map(Json)
        .ok_or_else(|| BackendError::not_found("Event not found."))
}

/// Replace an event's editable fields and broadcast the result
pub async fn update_event(
    State(pipeline): State<EventChangePipeline>,
    ApiPath(event_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateEventRequest>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let changes = request.validate()?;
    let event = pipeline
        .update(event_id, changes)
        .await
        .map_err(|e| BackendError::persistence("Error updating event.", e))?
        .ok_or_else(|| BackendError::not_found("Event not found."))?;

    Ok(Json(json!({
        "message": "Event updated successfully",
        "event": event,
    })))
}

/// Delete an event and broadcast its ID
pub async fn delete_event(
    State(pipeline): State<EventChangePipeline>,
    ApiPath(event_id): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let deleted = pipeline
        .delete(event_id)
        .await
        .map_err(|e| BackendError::persistence("Error deleting event.", e))?;

    if !deleted {
        return Err(BackendError::not_found("Event not found."));
    }

    Ok(Json(json!({ "message": "Event deleted successfully." })))
}
