//! Short-code input sanitization
//!
//! Lookup entry points accept either a bare short code or a full short
//! URL pasted by the user. Before hitting the API the input is reduced
//! to the bare code: trimmed, and if it looks like a URL only the final
//! path segment before any query string or fragment is kept.

/// Reduce a raw user-supplied code-or-URL string to a bare short code.
///
/// Returns `None` when nothing usable remains (empty input, or a URL
/// ending in a slash).
///
/// ```
/// use shortstats::utils::sanitize_code;
///
/// assert_eq!(sanitize_code("  ABC123  "), Some("ABC123".to_string()));
/// assert_eq!(
///     sanitize_code("https://host/ABC123?x=1#y"),
///     Some("ABC123".to_string())
/// );
/// assert_eq!(sanitize_code("   "), None);
/// ```
pub fn sanitize_code(raw: &str) -> Option<String> {
    let mut code = raw.trim();

    if code.contains("http://") || code.contains("https://") {
        // Last path segment, e.g. http://host:8080/WO8iDmzy -> WO8iDmzy
        let segment = code.rsplit('/').next().unwrap_or("");
        // Drop any query parameters or fragments
        code = segment.split(['?', '#']).next().unwrap_or("").trim();
    }

    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}
