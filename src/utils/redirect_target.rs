//! Sanitizing of redirect destinations before they reach a `Location` header.

/// Collapses leading slashes so a destination can't become protocol-relative.
///
/// `//evil.example/x` would send the browser to another host; it becomes
/// `/evil.example/x`. Absolute URLs and single-slash paths are unchanged.
pub fn sanitize_destination(destination: &str) -> &str {
    let mut to = destination;
    while to.starts_with("//") {
        to = &to[1..];
    }
    to
}
