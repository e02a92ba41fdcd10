//! Contact form submission handling.
//!
//! ## Processing Flow
//!
//! ```text
//! multipart fields → sanitize() → Submission → validate()
//! ```
//!
//! Sanitization always happens before validation, so length limits apply to
//! the escaped text.

pub mod sanitize;
pub mod types;
pub mod validate;

pub use sanitize::sanitize;
pub use types::{ApiResponse, Submission, VerificationResult};
pub use validate::{validate, ValidationError};
