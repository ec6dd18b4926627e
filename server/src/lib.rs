pub mod api;
pub mod config;
pub mod error;
pub mod upload;

use anyhow::Result;
use std::sync::Arc;
use axum::{Server, Router, extract::Extension, http::Uri};
use tokio::fs;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{ErrorKind, ServerResult};

/// Global server state.
#[derive(Debug)]
pub struct State {
    /// The server configuration.
    config: Config,
}
impl State {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self { config })
    }
}

/// Builds the application with all layers applied.
pub fn app(state: Arc<State>) -> Router {
    Router::new()
        .merge(api::router())
        .fallback(fallback)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
}

/// Runs the API server.
pub async fn run_api_server(config: Config) -> Result<()> {
    tracing::info!("Starting API server...");

    let tmp_dir = config.upload.tmp_dir();
    if !fs::metadata(&tmp_dir).await.map(|m| m.is_dir()).unwrap_or(false) {
        tracing::warn!("Temporary directory {:?} does not exist, uploads will fail.", tmp_dir);
    }
    if config.upload.max_file_size == 0 {
        tracing::warn!("Upload size is not limited.");
    }

    let listen = config.listen;
    let rest = app(State::new(config));

    tracing::info!("Listening on {:?}...", listen);
    Server::bind(&listen).serve(rest.into_make_service()).await?;

    Ok(())
}

/// The fallback route.
#[axum_macros::debug_handler]
async fn fallback(_: Uri) -> ServerResult<()> {
    Err(ErrorKind::NotFound.into())
}
