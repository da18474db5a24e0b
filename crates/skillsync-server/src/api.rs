use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::Method,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use skillsync_net::{GenerativeClient, NetError};
use skillsync_shared::protocol::{GenerateRequest, GenerateResponse};

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::rate_limit::{limit_chat, RateLimiter};

const MAX_BODY_BYTES: usize = 256 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    /// `None` while no API key is configured.
    pub upstream: Option<GenerativeClient>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> Result<Self, NetError> {
        let upstream = config
            .api_key
            .as_deref()
            .map(|key| GenerativeClient::direct(&config.api_base, &config.model, key))
            .transpose()?;
        let rate_limiter = RateLimiter::from_config(&config);
        Ok(Self {
            config: Arc::new(config),
            upstream,
            rate_limiter,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let chat_routes = Router::new()
        .route("/chat", post(chat))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            limit_chat,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(chat_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Relay one `generateContent` call upstream with the server-held key.
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ProxyError> {
    let prompt = request.prompt_text();
    if prompt.trim().is_empty() {
        return Err(ProxyError::EmptyPrompt);
    }
    let chars = prompt.chars().count();
    let max = state.config.max_prompt_chars;
    if chars > max {
        return Err(ProxyError::PromptTooLarge { chars, max });
    }

    let upstream = state.upstream.as_ref().ok_or(ProxyError::NotConfigured)?;
    let reply = upstream.generate(&request).await.map_err(|e| {
        warn!(error = %e, "Upstream generation failed");
        ProxyError::Upstream(e.to_string())
    })?;

    info!(chars, candidates = reply.candidates.len(), "Chat relayed");
    Ok(Json(reply))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting chat proxy");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
