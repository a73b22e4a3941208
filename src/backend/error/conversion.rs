/**
 * Error Conversion
 *
 * Converts backend errors into HTTP responses so handlers and middleware can
 * return them directly.
 *
 * # Response Format
 *
 * ```json
 * { "error": "Error message" }
 * ```
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), "{}", message);
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
