//! Shell pages
//!
//! Browser navigation gets the full document. HTMX navigation from the
//! header links gets only the main content, except for history restores,
//! which need the whole page again.

use axum::{extract::State, response::Response};

use crate::error::AssetteError;
use crate::htmx::{HxHistoryRestoreRequest, HxRequest};
use crate::state::AppState;
use crate::template::HxTemplate;
use crate::views::{GeneratePage, ModelsPage, ProfilePage};

/// `GET /`
pub async fn generate(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    HxHistoryRestoreRequest(restore): HxHistoryRestoreRequest,
) -> Response {
    GeneratePage::new(&state.config().theme, state.assets().generation_enabled())
        .render_htmx(is_htmx && !restore)
}

/// `GET /models`
pub async fn models(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    HxHistoryRestoreRequest(restore): HxHistoryRestoreRequest,
) -> Response {
    let models = state.assets().models().await;
    ModelsPage::new(&state.config().theme, models).render_htmx(is_htmx && !restore)
}

/// `GET /profile`
///
/// # Errors
///
/// Returns a `500` if the store cannot be read.
pub async fn profile(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    HxHistoryRestoreRequest(restore): HxHistoryRestoreRequest,
) -> Result<Response, AssetteError> {
    let users = state.controller().list().await?;
    Ok(ProfilePage::new(&state.config().theme, users).render_htmx(is_htmx && !restore))
}
