//! HTTP handlers and the application router
//!
//! - [`pages`]: the three shell pages
//! - [`profile`]: HTMX endpoints behind the profile page
//! - [`api`]: JSON user API over the same controller
//! - [`assets`]: uploads, job status, downloads and the model API

pub mod api;
pub mod assets;
pub mod pages;
pub mod profile;

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete as delete_route, get, patch, post},
    Router,
};
use http::StatusCode;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::health::{health_check, liveness};
use crate::state::AppState;

const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the full application router
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use assette::assets::{AssetService, LocalStorage, ModelCatalog};
/// use assette::{config::AssetteConfig, handlers, state::AppState, store::SqliteUserStore};
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let store = Arc::new(SqliteUserStore::in_memory().await?);
/// let assets = AssetService::new(
///     ModelCatalog::in_memory(),
///     LocalStorage::new("uploads"),
///     None,
///     10 * 1024 * 1024,
/// );
/// let app = handlers::router(AppState::new(AssetteConfig::default(), store, assets));
/// # let _ = app;
/// # Ok(())
/// # }
/// ```
pub fn router(state: AppState) -> Router {
    let timeout = Duration::from_millis(state.config().htmx.request_timeout_ms);
    // room for the multipart framing around the image itself
    let upload_limit = state.assets().max_upload_bytes() + MULTIPART_OVERHEAD;

    Router::new()
        .route("/", get(pages::generate))
        .route("/models", get(pages::models))
        .route("/profile", get(pages::profile))
        .route("/profile/users", post(profile::create))
        .route("/profile/users/{id}", delete_route(profile::delete))
        .route("/profile/users/{id}/{field}", patch(profile::update_field))
        .route("/api/users", get(api::list).post(api::create))
        .route(
            "/api/users/{id}",
            get(api::show).patch(api::update).delete(api::delete),
        )
        .route(
            "/upload",
            post(assets::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/status/{id}", get(assets::status))
        .route("/download/{id}", get(assets::download))
        .route("/api/models", get(assets::list_models))
        .route("/api/models/{id}", delete_route(assets::delete_model))
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .with_state(state)
}
