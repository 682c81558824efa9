//! Bounded log excerpts for upstream payloads.

use serde_json::Value;

/// Payload excerpt length for shape-mismatch logs.
pub const PAYLOAD_EXCERPT_CHARS: usize = 200;

/// Record excerpt length for dropped-record logs.
pub const RECORD_EXCERPT_CHARS: usize = 100;

/// Response body excerpt length for HTTP failure logs.
pub const BODY_EXCERPT_CHARS: usize = 500;

/// Truncate `text` to at most `max_chars` characters, appending `...`
/// when anything was cut. Never splits a UTF-8 sequence.
pub fn excerpt_str(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Compact JSON rendering of `value`, truncated like [`excerpt_str`].
pub fn excerpt(value: &Value, max_chars: usize) -> String {
    excerpt_str(&value.to_string(), max_chars)
}
