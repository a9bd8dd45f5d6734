//! Shared helpers for unit tests

use std::sync::Arc;

use parking_lot::Mutex;

use crate::assets::{AssetService, LocalStorage, ModelCatalog};
use crate::config::AssetteConfig;
use crate::controller::{ProfileEvent, ProfileObserver};
use crate::state::AppState;
use crate::store::SqliteUserStore;

/// Observer that keeps every event it sees
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ProfileEvent>>>,
}

impl RecordingObserver {
    /// Events seen so far, oldest first
    pub fn events(&self) -> Vec<ProfileEvent> {
        self.events.lock().clone()
    }
}

impl ProfileObserver for RecordingObserver {
    fn on_change(&self, event: &ProfileEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Application state over a fresh in-memory store, with generation off
pub async fn memory_state() -> AppState {
    let store = SqliteUserStore::in_memory()
        .await
        .expect("in-memory store should open");
    let config = AssetteConfig::default();
    let assets = AssetService::new(
        ModelCatalog::in_memory(),
        LocalStorage::new(&config.generation.upload_dir),
        None,
        config.generation.max_upload_bytes,
    );
    AppState::new(config, Arc::new(store), assets)
}
