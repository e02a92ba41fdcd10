//! Uniform JSON responses carrying CORS headers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::form::ApiResponse;
use crate::web::cors::cors_headers;

/// Serialize `body` as JSON with `status` and the CORS headers for `origin`.
pub fn json_response(
    body: ApiResponse,
    status: StatusCode,
    origin: Option<&str>,
    allowed_origins: &[String],
) -> Response {
    (status, cors_headers(origin, allowed_origins), Json(body)).into_response()
}

/// Answer a CORS preflight: 204, no body, only the CORS headers.
pub fn preflight_response(origin: Option<&str>, allowed_origins: &[String]) -> Response {
    (StatusCode::NO_CONTENT, cors_headers(origin, allowed_origins)).into_response()
}
