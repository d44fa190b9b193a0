// ABOUTME: Escaping helpers for building HTML fragments from text and attribute values.
// ABOUTME: Used wherever plain text is written back into markup.

/// Escapes special characters in attribute values.
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escapes text so it round-trips as a single text node.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
