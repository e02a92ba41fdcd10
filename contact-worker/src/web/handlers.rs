//! Contact form endpoint handlers.
//!
//! A submission goes through, in order:
//! 1. Method and content-type gating
//! 2. Multipart parsing and sanitization
//! 3. Presence and format validation
//! 4. Turnstile verification
//! 5. Discord delivery
//!
//! The first failing step ends the request with its own status and message.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, Method, StatusCode},
    response::Response,
    Json,
};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::discord::DiscordNotifier;
use crate::form::{sanitize, validate, ApiResponse, Submission, ValidationError};
use crate::turnstile::TurnstileVerifier;
use crate::web::response::{json_response, preflight_response};
use crate::Config;

/// Multipart field carrying the company name.
pub const FIELD_COMPANY_NAME: &str = "intra_name";

/// Multipart field carrying the Turnstile token.
pub const FIELD_TURNSTILE_TOKEN: &str = "cf-turnstile-response";

const SUCCESS_MESSAGE: &str = "Form submitted successfully!";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: TurnstileVerifier,
    pub notifier: DiscordNotifier,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = Client::new();
        Self {
            verifier: TurnstileVerifier::new(client.clone(), config.turnstile_verify_url.clone()),
            notifier: DiscordNotifier::new(client),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Contact Form
// =============================================================================

/// Everything that can end a contact request early.
///
/// `Display` is the message sent to the client.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid content type")]
    InvalidContentType,

    #[error("Missing required fields")]
    MissingFields,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Turnstile verification failed")]
    VerificationFailed,

    #[error("Failed to send message")]
    DeliveryFailed,

    #[error("Internal Server Error")]
    Unexpected(#[from] anyhow::Error),
}

impl ContactError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContactError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ContactError::InvalidContentType
            | ContactError::MissingFields
            | ContactError::Invalid(_) => StatusCode::BAD_REQUEST,
            ContactError::VerificationFailed => StatusCode::FORBIDDEN,
            ContactError::DeliveryFailed | ContactError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Contact form endpoint.
///
/// Mounted for every method; `OPTIONS` gets a preflight answer and anything
/// other than `POST` is rejected here rather than by the router.
pub async fn contact(State(state): State<AppState>, request: Request) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let allowed_origins = &state.config.allowed_origins;

    if request.method() == Method::OPTIONS {
        return preflight_response(origin.as_deref(), allowed_origins);
    }

    match handle_submission(&state, request).await {
        Ok(()) => json_response(
            ApiResponse::message(SUCCESS_MESSAGE),
            StatusCode::OK,
            origin.as_deref(),
            allowed_origins,
        ),
        Err(e) => {
            if let ContactError::Unexpected(source) = &e {
                error!(error = ?source, "contact_unexpected_error");
            }
            json_response(
                ApiResponse::error(e.to_string()),
                e.status_code(),
                origin.as_deref(),
                allowed_origins,
            )
        }
    }
}

async fn handle_submission(state: &AppState, request: Request) -> Result<(), ContactError> {
    if request.method() != Method::POST {
        warn!(method = %request.method(), "contact_method_not_allowed");
        return Err(ContactError::MethodNotAllowed);
    }

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !content_type.contains("multipart/form-data") {
        warn!(content_type = %content_type, "contact_invalid_content_type");
        return Err(ContactError::InvalidContentType);
    }

    let multipart = Multipart::from_request(request, state)
        .await
        .context("Failed to read multipart body")?;
    let mut fields = read_fields(multipart).await?;

    let submission = Submission {
        name: sanitize(&fields.remove("name").unwrap_or_default()),
        email: sanitize(&fields.remove("email").unwrap_or_default()),
        message: sanitize(&fields.remove("message").unwrap_or_default()),
        company_name: fields
            .remove(FIELD_COMPANY_NAME)
            .map(|c| sanitize(&c))
            .filter(|c| !c.is_empty()),
        verification_token: fields.remove(FIELD_TURNSTILE_TOKEN).unwrap_or_default(),
    };

    info!(
        name_length = submission.name.chars().count(),
        email_length = submission.email.chars().count(),
        message_length = submission.message.chars().count(),
        has_company_name = submission.company_name.is_some(),
        "contact_received"
    );

    if submission.name.is_empty()
        || submission.email.is_empty()
        || submission.message.is_empty()
        || submission.verification_token.is_empty()
    {
        warn!(
            has_name = !submission.name.is_empty(),
            has_email = !submission.email.is_empty(),
            has_message = !submission.message.is_empty(),
            has_token = !submission.verification_token.is_empty(),
            "contact_missing_fields"
        );
        return Err(ContactError::MissingFields);
    }

    if let Err(e) = validate(&submission.name, &submission.email, &submission.message) {
        warn!(reason = %e, "contact_validation_failed");
        return Err(e.into());
    }

    let verification = state
        .verifier
        .verify(
            &submission.verification_token,
            &state.config.turnstile_secret_key,
        )
        .await
        .context("Turnstile verification request failed")?;
    if !verification.success {
        warn!(
            error_codes = ?verification.error_codes,
            "contact_turnstile_failed"
        );
        return Err(ContactError::VerificationFailed);
    }

    let delivered = state
        .notifier
        .notify(&state.config.discord_webhook_url, &submission)
        .await
        .context("Discord webhook request failed")?;
    if !delivered {
        error!("contact_delivery_failed");
        return Err(ContactError::DeliveryFailed);
    }

    info!("contact_submitted");

    Ok(())
}

/// Collect the text of every named multipart field.
///
/// When a name repeats, the first value wins.
async fn read_fields(mut multipart: Multipart) -> Result<HashMap<String, String>, ContactError> {
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .context("Failed to read multipart field")?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .with_context(|| format!("Failed to read multipart field {name}"))?;
        fields.entry(name).or_insert(value);
    }

    Ok(fields)
}
