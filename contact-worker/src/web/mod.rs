//! Web server module for the contact form endpoint.
//!
//! This module provides the axum router that:
//! - Answers CORS preflights for allow-listed origins
//! - Validates and sanitizes multipart form submissions
//! - Verifies the Turnstile token and relays the submission to Discord
//! - Returns a uniform JSON body for every outcome

pub mod cors;
pub mod handlers;
pub mod response;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

pub use cors::{cors_headers, is_origin_allowed};
pub use handlers::{contact, health, AppState, ContactError, HealthResponse};
pub use response::{json_response, preflight_response};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(contact))
        .route("/contact", any(contact))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
