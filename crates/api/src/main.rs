mod cache;
mod config;
mod metrics;
mod routes;
mod state;

use anyhow::{Context, Result};
use dataset::DatasetReader;
use index::GraphIndex;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Initialize tracing
    if config.server.json_logs {
        tracing_subscriber::fmt().json().init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let bind_addr = config.server.bind_addr.clone();
    let state = Arc::new(AppState::new(config));

    // Optional dataset given on the command line
    if let Some(path) = std::env::args().nth(1).map(PathBuf::from) {
        let dataset = DatasetReader::read_file(&path).await?;
        let index = tokio::task::spawn_blocking(move || GraphIndex::build(&dataset))
            .await
            .context("Index build failed")?;
        state.swap(index).await;
    }

    let app = routes::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context(format!("Failed to bind {}", bind_addr))?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
