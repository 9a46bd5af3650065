//! Content-Type selection.
//!
//! Only two extensions are recognized. The decision is made on the request
//! target as received, so generated pages (listings, not-found) fall through
//! to HTML.

const TEXT_PLAIN: &str = "text/plain";
const TEXT_HTML: &str = "text/html";

/// Picks the `Content-Type` for a request target by its suffix.
///
/// ```
/// # use docserve::http::mime::content_type_for;
/// assert_eq!(content_type_for("/notes.txt"), "text/plain");
/// assert_eq!(content_type_for("/index.html"), "text/html");
/// assert_eq!(content_type_for("/docs"), "text/html");
/// ```
pub fn content_type_for(target: &str) -> &'static str {
    if target.ends_with(".txt") {
        TEXT_PLAIN
    } else {
        // .html and everything else
        TEXT_HTML
    }
}
