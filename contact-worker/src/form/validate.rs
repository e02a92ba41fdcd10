//! Field format and length checks.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Maximum name length, in UTF-16 code units.
pub const MAX_NAME_LEN: usize = 50;

/// Maximum message length, in UTF-16 code units.
pub const MAX_MESSAGE_LEN: usize = 500;

// Deliberately loose: local@domain.tld with no whitespace or extra `@`.
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// First failing check; `Display` is the message returned to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid name")]
    Name,
    #[error("Invalid email address")]
    Email,
    #[error("Invalid message content")]
    Message,
}

/// Validate the sanitized name, email and message, in that order.
pub fn validate(name: &str, email: &str, message: &str) -> Result<(), ValidationError> {
    if name.is_empty() || utf16_len(name) > MAX_NAME_LEN {
        return Err(ValidationError::Name);
    }
    if email.is_empty() || !EMAIL.is_match(email) {
        return Err(ValidationError::Email);
    }
    if message.is_empty() || utf16_len(message) > MAX_MESSAGE_LEN {
        return Err(ValidationError::Message);
    }
    Ok(())
}

// UTF-16 code units: characters outside the BMP count as two.
fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}
