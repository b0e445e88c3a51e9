//! Shared application state.

use std::sync::Arc;

use klinika_db::Database;

use crate::config::ServerConfig;

/// State shared by every request handler.
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// Handlers receive the state behind an `Arc` via axum's `State`
/// extractor.
pub type SharedState = Arc<AppState>;
