//! # skillsync-server
//!
//! Chat proxy for the SkillSync assistant.
//!
//! Clients post the generative-language request body to `/chat`; the proxy
//! validates it, adds the API key it holds and relays the upstream reply, so
//! the key never ships with a client.
//!
//! - **REST API** (axum): `GET /health`, `POST /chat`
//! - **Per-IP rate limiting** on `/chat`

mod api;
mod config;
mod error;
mod rate_limit;

use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ProxyConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,skillsync_server=debug")),
        )
        .init();

    info!("Starting SkillSync chat proxy v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ProxyConfig::from_env();
    info!(?config, "Loaded configuration");
    if config.api_key.is_none() {
        warn!("GENERATIVE_API_KEY is not set; /chat will answer 503");
    }
    let http_addr = config.http_addr;

    // -----------------------------------------------------------------------
    // 3. Build application state
    // -----------------------------------------------------------------------
    let state = AppState::new(config)?;

    // -----------------------------------------------------------------------
    // 4. Spawn background tasks
    // -----------------------------------------------------------------------

    // Every 5 minutes, forget clients whose allowance has recovered
    let rl = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            let evicted = rl.purge_recovered();
            tracing::debug!(evicted, "Rate limiter entries purged");
        }
    });

    // -----------------------------------------------------------------------
    // 5. Run the HTTP server until it fails or Ctrl+C arrives
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
