//! `todo-svc` HTTP server binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured JSON logging.
//! 3. Open the SQLite [`SqliteTodoStore`], creating the `todos` table if needed.
//! 4. Build the Axum router and serve until SIGTERM / Ctrl-C.
//! 5. Close the database handle and exit.

mod config;
mod server;
mod store;
mod telemetry;
mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use config::Config;
use server::state::AppState;
use store::{SqliteTodoStore, TodoStore};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        "todo-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. Store
    // -----------------------------------------------------------------------
    let store = Arc::new(
        SqliteTodoStore::open(&cfg.database_path)
            .with_context(|| format!("failed to open database at {}", cfg.database_path))?,
    );
    info!(database_path = %cfg.database_path, "database ready");

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let shared: Arc<dyn TodoStore> = store.clone();
    let router = server::router::build(AppState::new(shared));

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, database_path = %cfg.database_path, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // -----------------------------------------------------------------------
    // 5. Shutdown
    // -----------------------------------------------------------------------
    match Arc::try_unwrap(store) {
        Ok(store) => {
            store.close().context("failed to close database")?;
            info!("database closed");
        }
        Err(_) => warn!("database handle still shared at shutdown; dropping without explicit close"),
    }

    info!("todo-svc stopped");
    Ok(())
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; closing database after in-flight requests");
}
