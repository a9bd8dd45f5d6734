//! Application state shared by every handler

use std::sync::Arc;

use crate::assets::AssetService;
use crate::config::AssetteConfig;
use crate::controller::ProfileController;
use crate::store::UserStore;

/// Application state for the router
///
/// Holds the loaded configuration, the profile controller (which owns the
/// store handle passed in at startup) and the asset service. Cloning is cheap.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use assette::assets::{AssetService, LocalStorage, ModelCatalog};
/// use assette::{config::AssetteConfig, state::AppState, store::SqliteUserStore};
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let store = Arc::new(SqliteUserStore::in_memory().await?);
/// let assets = AssetService::new(
///     ModelCatalog::in_memory(),
///     LocalStorage::new("uploads"),
///     None,
///     1024,
/// );
/// let state = AppState::new(AssetteConfig::default(), store, assets);
/// assert_eq!(state.config().server.port, 8080);
/// assert!(!state.assets().generation_enabled());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct AppState {
    config: Arc<AssetteConfig>,
    controller: ProfileController,
    assets: AssetService,
}

impl AppState {
    /// Build state around an opened store and asset service
    #[must_use]
    pub fn new(config: AssetteConfig, store: Arc<dyn UserStore>, assets: AssetService) -> Self {
        Self {
            config: Arc::new(config),
            controller: ProfileController::new(store),
            assets,
        }
    }

    /// Loaded configuration
    #[must_use]
    pub fn config(&self) -> &AssetteConfig {
        &self.config
    }

    /// The profile controller
    #[must_use]
    pub const fn controller(&self) -> &ProfileController {
        &self.controller
    }

    /// Uploads, jobs and the model catalogue
    #[must_use]
    pub const fn assets(&self) -> &AssetService {
        &self.assets
    }
}
