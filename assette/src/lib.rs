//! Assette: a small HTMX app for image-to-model generation and user profiles
//!
//! Renders three pages (generate, models, profile) and lets a visitor manage
//! `User` records (name, email) stored in SQLite. Uploaded images are turned
//! into `.glb` models by a hosted API when a key is configured. The moving
//! parts:
//!
//! - **Record store** ([`store`]): SQLx-backed persistence of users, owning the
//!   schema and the connection pool
//! - **Validation rule** ([`validation`]): names must be at least three characters
//! - **Profile controller** ([`controller`]): create / field edit / delete, with
//!   observer notification and a re-fetched list after every mutation
//! - **Presentation shell** ([`views`]): Askama layouts with the navigation bar
//!   and colour theme
//! - **Assets** ([`assets`]): generation jobs, model storage and the model
//!   catalogue
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use assette::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AssetteConfig::from_env()?;
//!     let store = Arc::new(SqliteUserStore::open(&config.database).await?);
//!     let assets = AssetService::open(&config.generation).await?;
//!
//!     let state = AppState::new(config, store.clone(), assets);
//!     let app = assette::handlers::router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     store.close().await;
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod config;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod health;
pub mod htmx;
pub mod models;
pub mod observability;
pub mod state;
pub mod store;
pub mod template;
pub mod validation;
pub mod views;

#[cfg(test)]
pub mod testing;

pub mod prelude {
    //! Convenience re-exports for wiring an application together
    //!
    //! ```rust
    //! use assette::prelude::*;
    //! ```

    pub use crate::assets::{AssetError, AssetService, Job, JobStatus, Model, ModelGenerator};
    pub use crate::config::AssetteConfig;
    pub use crate::controller::{
        CreateForm, ProfileController, ProfileEvent, ProfileObserver, ProfileView, TracingObserver,
    };
    pub use crate::error::AssetteError;
    pub use crate::htmx::{HxSwapOob, SwapStrategy};
    pub use crate::models::{NewUser, User, UserField};
    pub use crate::state::AppState;
    pub use crate::store::{SqliteUserStore, StoreError, UserStore};
    pub use crate::template::HxTemplate;
    pub use crate::validation::ValidationError;
}
