//! Markup sanitization for free-text form fields.

use once_cell::sync::Lazy;
use regex::Regex;

/// Replacement for a stripped `<script>...</script>` block.
pub const SCRIPT_REMOVED: &str = "[script removed]";

/// Replacement for a stripped tag carrying an `on*` event handler.
pub const MALICIOUS_TAG_REMOVED: &str = "[malicious tag removed]";

// Case folding is ASCII-only and "any character" excludes line terminators
// (\n, \r, U+2028, U+2029), so `ſ` or `K` never stand in for `s` or `k`.
static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"<[sS][cC][rR][iI][pP][tT][^\n\r\x{2028}\x{2029}]*?>[^\n\r\x{2028}\x{2029}]*?</[sS][cC][rR][iI][pP][tT]>",
    )
    .expect("valid script regex")
});

static EVENT_HANDLER_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"<[^\n\r\x{2028}\x{2029}]*?[oO][nN][0-9A-Za-z_]+[^\n\r\x{2028}\x{2029}]*?>",
    )
    .expect("valid event handler regex")
});

/// Sanitize a free-text field.
///
/// Script blocks and tags with event handlers are replaced by markers first,
/// then `< > " ' &` are entity-escaped. The order matters: once escaped, the
/// tag patterns can no longer match.
pub fn sanitize(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let stripped = SCRIPT_BLOCK.replace_all(input, SCRIPT_REMOVED);
    let stripped = EVENT_HANDLER_TAG.replace_all(&stripped, MALICIOUS_TAG_REMOVED);

    escape_html(&stripped)
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    out
}
