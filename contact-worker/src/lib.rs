//! Contact relay - contact form backend.
//!
//! Accepts multipart contact form submissions, sanitizes and validates them,
//! checks the Cloudflare Turnstile token and forwards the result to a Discord
//! webhook.
//!
//! ## Architecture
//!
//! ```text
//! Browser → Web Server → Turnstile siteverify
//!                      → Discord webhook
//! ```

pub mod config;
pub mod discord;
pub mod form;
pub mod turnstile;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use discord::DiscordNotifier;
pub use form::{sanitize, validate, Submission, ValidationError, VerificationResult};
pub use turnstile::TurnstileVerifier;
pub use web::{router, AppState};
