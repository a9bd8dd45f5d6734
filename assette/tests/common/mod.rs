//! Shared setup for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use assette::{
    assets::{AssetService, GenerationError, LocalStorage, ModelCatalog, ModelGenerator},
    config::AssetteConfig,
    controller::ProfileEvent,
    handlers,
    state::AppState,
    store::SqliteUserStore,
};
use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use parking_lot::Mutex;
use tempfile::TempDir;

/// What [`FixedGenerator`] hands back for every image
pub const MODEL: &[u8] = b"glTF\x02\x00\x00\x00model";

/// Generator that answers every image with [`MODEL`]
pub struct FixedGenerator;

#[async_trait]
impl ModelGenerator for FixedGenerator {
    async fn generate(&self, _image: Bytes) -> Result<Bytes, GenerationError> {
        Ok(Bytes::from_static(MODEL))
    }
}

/// Router over a fresh in-memory store, plus a log of observer events
///
/// Generation is off.
pub async fn app() -> (Router, Arc<Mutex<Vec<ProfileEvent>>>) {
    let store = SqliteUserStore::in_memory().await.unwrap();
    let config = AssetteConfig::default();
    let assets = AssetService::new(
        ModelCatalog::in_memory(),
        LocalStorage::new(&config.generation.upload_dir),
        None,
        config.generation.max_upload_bytes,
    );
    let state = AppState::new(config, Arc::new(store), assets);

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    state
        .controller()
        .subscribe(move |event: &ProfileEvent| sink.lock().push(event.clone()));

    (handlers::router(state), events)
}

/// Router whose uploads go to `generator`, with models stored in a
/// temporary directory that lives as long as the returned guard
pub async fn app_with_generator(
    generator: Option<Arc<dyn ModelGenerator>>,
    max_upload_bytes: usize,
) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteUserStore::in_memory().await.unwrap();
    let assets = AssetService::new(
        ModelCatalog::in_memory(),
        LocalStorage::new(dir.path()),
        generator,
        max_upload_bytes,
    );
    let state = AppState::new(AssetteConfig::default(), Arc::new(store), assets);
    (handlers::router(state), dir)
}
