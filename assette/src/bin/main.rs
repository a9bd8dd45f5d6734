//! Assette server binary

use std::sync::Arc;

use anyhow::Result;
use assette::{
    assets::AssetService, config::AssetteConfig, controller::TracingObserver, handlers,
    observability, state::AppState, store::SqliteUserStore,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init()?;

    let config = AssetteConfig::from_env()?;
    let addr = config.server.socket_addr()?;

    // opened once here, closed once after the server stops
    let store = Arc::new(SqliteUserStore::open(&config.database).await?);

    let assets = AssetService::open(&config.generation).await?;

    let state = AppState::new(config, store.clone(), assets);
    state.controller().subscribe(TracingObserver);

    let app = handlers::router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    store.close().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
