//! Small helpers for keeping log output readable and free of secrets.

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to a UTF-8
/// boundary) with an ellipsis and the number of dropped bytes appended.
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Mask a secret for `Debug` output, keeping only whether it was set.
pub fn redact(secret: &Option<String>) -> &'static str {
    match secret {
        Some(s) if !s.is_empty() => "<redacted>",
        _ => "<unset>",
    }
}
