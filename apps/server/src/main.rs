//! # Klinika Server
//!
//! HTTP JSON-RPC backend for the clinic management frontend.
//!
//! ## Architecture
//! ```text
//! Frontend forms ──► HTTP /rpc/* (axum) ──► repositories ──► SQLite
//! ```

mod config;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use klinika_db::{Database, DbConfig};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional; real deployments set the environment directly
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Klinika server...");

    let config = ServerConfig::load()?;
    info!(
        port = config.http_port,
        database = %config.database_path,
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.db_max_connections),
    )
    .await?;
    info!("Database ready");

    let state = Arc::new(AppState { db, config });

    let app = handlers::router(state.clone());

    let addr: SocketAddr = format!("0.0.0.0:{}", state.config.http_port).parse()?;
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
