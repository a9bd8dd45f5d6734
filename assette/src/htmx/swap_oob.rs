//! Out-of-band swaps
//!
//! A profile action answers with the refreshed `#user-list` as the primary
//! body, and may piggyback other regions on the same response: a toast into
//! `#notifications` or a cleared `#create-form`. htmx applies each
//! `hx-swap-oob` element to the element with the matching id.

use std::fmt::Write;

use axum::response::{Html, IntoResponse, Response};

/// How an out-of-band part lands in its target
///
/// The part's children are inserted; the wrapper element itself never is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SwapStrategy {
    /// Replace the target's children
    #[default]
    InnerHTML,
    /// Append to the target's children
    BeforeEnd,
}

impl SwapStrategy {
    /// The `hx-swap-oob` attribute value
    #[must_use]
    pub const fn oob_value(self) -> &'static str {
        match self {
            Self::InnerHTML => "innerHTML",
            Self::BeforeEnd => "beforeend",
        }
    }
}

#[derive(Debug, Clone)]
struct OobPart {
    id: &'static str,
    strategy: SwapStrategy,
    html: String,
}

/// Primary fragment plus any number of out-of-band parts
///
/// # Example
///
/// ```rust
/// use assette::htmx::{HxSwapOob, SwapStrategy};
///
/// let mut body = HxSwapOob::new("<ul></ul>");
/// body.push("notifications", SwapStrategy::BeforeEnd, "<p>Saved</p>");
/// let html = body.render();
///
/// assert!(html.starts_with("<ul></ul>"));
/// assert!(html.contains(r#"<div id="notifications" hx-swap-oob="beforeend">"#));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HxSwapOob {
    primary: String,
    parts: Vec<OobPart>,
}

impl HxSwapOob {
    /// Start from the fragment swapped into the request's target
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            parts: Vec::new(),
        }
    }

    /// Queue an out-of-band part for the element with id `id`
    pub fn push(&mut self, id: &'static str, strategy: SwapStrategy, html: impl Into<String>) {
        self.parts.push(OobPart {
            id,
            strategy,
            html: html.into(),
        });
    }

    /// Concatenate the primary fragment and the wrapped parts
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = self.primary.clone();
        for part in &self.parts {
            // writing into a String cannot fail
            let _ = write!(
                html,
                r#"<div id="{}" hx-swap-oob="{}">{}</div>"#,
                part.id,
                part.strategy.oob_value(),
                part.html
            );
        }
        html
    }
}

impl IntoResponse for HxSwapOob {
    fn into_response(self) -> Response {
        Html(self.render()).into_response()
    }
}
