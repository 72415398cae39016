//! tictacd - two-player tic-tac-toe room server.
//!
//! Clients connect over WebSocket, join named rooms of two, and play; every
//! room is owned by its own actor task, and finished matches are archived.

mod archive;
mod config;
mod db;
mod error;
mod game;
mod handlers;
mod http;
mod metrics;
mod network;
mod security;
mod state;
mod telemetry;

use crate::archive::MatchArchive;
use crate::config::{ArchiveBackend, ArchiveConfig, Config};
use crate::network::Gateway;
use crate::state::Hub;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validation::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    info!(
        server = %config.server.name,
        listen = %config.listen.address,
        archive = %config.archive.backend,
        "Starting tictacd"
    );

    let archive = open_archive(&config.archive).await?;

    // Prometheus metrics are optional.
    // Convention: metrics_port = 0 disables the HTTP endpoint (used by tests).
    let metrics_port = config.server.metrics_port.unwrap_or(9090);
    if metrics_port == 0 {
        info!("Metrics disabled");
    } else {
        metrics::init();
        info!("Metrics initialized");

        tokio::spawn(async move {
            http::run_http_server(metrics_port).await;
        });
        info!(port = metrics_port, "Prometheus HTTP server started");
    }

    let hub = Arc::new(Hub::new(archive, config.limits.clone()));
    let gateway = Gateway::bind(&config.listen, hub).await?;

    tokio::select! {
        result = gateway.run() => {
            if let Err(e) = result {
                error!(error = %e, "Gateway stopped");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    Ok(())
}

/// Open the configured match archive backend.
async fn open_archive(config: &ArchiveConfig) -> anyhow::Result<Arc<dyn MatchArchive>> {
    let archive: Arc<dyn MatchArchive> = match config.kind() {
        Some(ArchiveBackend::Sqlite) => {
            info!(path = %config.path, "Initializing SQLite match archive");
            let db = db::Database::new(&config.path).await?;
            Arc::new(archive::sqlite::SqliteArchive::new(db))
        }
        Some(ArchiveBackend::Redb) => {
            info!(path = %config.path, "Initializing Redb match archive");
            Arc::new(archive::redb::RedbArchive::new(&config.path)?)
        }
        Some(ArchiveBackend::None) => {
            info!("Match archive disabled. Using NoOp.");
            Arc::new(archive::noop::NoOpArchive)
        }
        // Rejected by validation.
        None => anyhow::bail!("unknown archive backend: {}", config.backend),
    };
    Ok(archive)
}
