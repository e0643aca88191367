//! MOC maintenance assistant: HTTP server.
//!
//! Serves the chat endpoint used by the web front end, plus counters and
//! a liveness check.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use moc_api::config::ApiConfig;
use moc_api::routes;
use moc_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "moc-api starting");

    let config = ApiConfig::from_env();
    let bot_config = config.load_bot_config()?;
    let state = AppState::from_config(&bot_config);

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
