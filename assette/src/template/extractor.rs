//! Main-content extraction for HTMX navigation
//!
//! The base layout wraps each page body in a pair of HTML comments. An HTMX
//! request only needs what lies between them; a browser navigation gets the
//! whole document.

/// Opening marker emitted by `layouts/base.html`
pub const PARTIAL_START: &str = "<!-- HTMX_PARTIAL_START -->";

/// Closing marker emitted by `layouts/base.html`
pub const PARTIAL_END: &str = "<!-- HTMX_PARTIAL_END -->";

/// The trimmed content between the markers, or the input unchanged when
/// either marker is missing
#[must_use]
pub fn extract_main_content(html: &str) -> &str {
    html.split_once(PARTIAL_START)
        .and_then(|(_, rest)| rest.split_once(PARTIAL_END))
        .map_or(html, |(content, _)| content.trim())
}
