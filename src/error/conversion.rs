/**
 * Error Conversion
 *
 * This module converts `ApiError` into HTTP responses so handlers can
 * return it directly from any route.
 *
 * # Response Format
 *
 * Error responses are returned as JSON with the following structure:
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 400
 * }
 * ```
 *
 * # Logging
 *
 * 5xx errors log the full error server-side before the response is built,
 * since their client-facing message is intentionally generic.
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    /// Convert an API error into an HTTP response
    ///
    /// The response is a JSON object with:
    /// - `error`: The client-facing error message
    /// - `status`: The HTTP status code
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Internal error while handling request: {}", self);
        }

        let body = serde_json::json!({
            "error": self.message(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
