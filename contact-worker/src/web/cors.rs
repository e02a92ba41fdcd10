//! Cross-origin headers for allow-listed origins.

use axum::http::{
    header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        VARY,
    },
    HeaderMap, HeaderValue,
};
use tracing::debug;
use url::Url;

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Check whether `origin` is on the allow list.
///
/// The Origin header is normalized to `scheme://host[:port]` before an exact
/// comparison. Unparsable origins are never allowed.
pub fn is_origin_allowed(origin: &str, allowed_origins: &[String]) -> bool {
    let normalized = match Url::parse(origin) {
        Ok(url) => url.origin().ascii_serialization(),
        Err(e) => {
            debug!(origin = %origin, error = %e, "cors_origin_unparsable");
            return false;
        }
    };

    allowed_origins.iter().any(|a| *a == normalized)
}

/// Build the CORS headers for a request's Origin header.
///
/// Returns an empty map when the origin is absent or not allowed.
pub fn cors_headers(origin: Option<&str>, allowed_origins: &[String]) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let Some(origin) = origin else {
        return headers;
    };
    if !is_origin_allowed(origin, allowed_origins) {
        return headers;
    }
    let Ok(origin_value) = HeaderValue::from_str(origin) else {
        return headers;
    };

    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin_value);
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(VARY, HeaderValue::from_static("Origin"));
    headers
}
