//! Askama rendering with HTMX awareness
//!
//! Every page template extends `layouts/base.html`. [`HxTemplate`] decides
//! whether a request gets the full document or only the main content, and
//! turns rendering failures into a logged `500`.
//!
//! ```rust
//! use askama::Template;
//! use assette::template::HxTemplate;
//!
//! #[derive(Template)]
//! #[template(source = "<p>{{ name }}</p>", ext = "html")]
//! struct Greeting {
//!     name: String,
//! }
//!
//! let html = Greeting { name: "Ann".into() }.render_fragment().unwrap();
//! assert_eq!(html, "<p>Ann</p>");
//! ```

pub mod extractor;

pub use extractor::extract_main_content;

use askama::Template;
use axum::response::{Html, IntoResponse, Response};
use http::StatusCode;

/// HTMX-aware rendering for any Askama template
pub trait HxTemplate: Template {
    /// Full page for browser navigation, main content for HTMX requests
    fn render_htmx(&self, is_htmx: bool) -> Response {
        match self.render() {
            Ok(html) if is_htmx => Html(extract_main_content(&html).to_owned()).into_response(),
            Ok(html) => Html(html).into_response(),
            Err(err) => render_failed(&err),
        }
    }

    /// Render as-is into an HTML response
    fn render_html(&self) -> Response {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => render_failed(&err),
        }
    }

    /// Render a fragment for composition into a larger response
    ///
    /// # Errors
    ///
    /// Returns the Askama error when rendering fails.
    fn render_fragment(&self) -> Result<String, askama::Error> {
        self.render()
    }
}

impl<T> HxTemplate for T where T: Template {}

fn render_failed(err: &askama::Error) -> Response {
    tracing::error!(error = %err, "Template rendering failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering failed").into_response()
}
