//! Proxy configuration loaded from environment variables.
//!
//! Everything except the upstream API key has a default, so the proxy starts
//! with zero configuration; `/chat` answers 503 until a key is set.

use std::net::SocketAddr;

use skillsync_shared::constants::{
    DEFAULT_GENERATIVE_API_BASE, DEFAULT_GENERATIVE_MODEL, DEFAULT_MAX_PROMPT_CHARS,
    DEFAULT_PROXY_PORT,
};

#[derive(Clone)]
pub struct ProxyConfig {
    /// Socket address for the HTTP (axum) server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Key for the generative-language API. Never logged.
    /// Env: `GENERATIVE_API_KEY`
    /// Default: unset (chat disabled).
    pub api_key: Option<String>,

    /// Env: `GENERATIVE_API_BASE`
    /// Default: `https://generativelanguage.googleapis.com/v1beta`
    pub api_base: String,

    /// Env: `GENERATIVE_MODEL`
    /// Default: `gemini-2.0-flash`
    pub model: String,

    /// Longest accepted prompt, in characters.
    /// Env: `MAX_PROMPT_CHARS`
    /// Default: `8000`
    pub max_prompt_chars: usize,

    /// Sustained requests per second per client IP.
    /// Env: `RATE_LIMIT_PER_SEC`
    /// Default: `2`
    pub rate_per_sec: f64,

    /// Burst size per client IP.
    /// Env: `RATE_LIMIT_BURST`
    /// Default: `10`
    pub rate_burst: f64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_PROXY_PORT).into(),
            api_key: None,
            api_base: DEFAULT_GENERATIVE_API_BASE.to_string(),
            model: DEFAULT_GENERATIVE_MODEL.to_string(),
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            rate_per_sec: 2.0,
            rate_burst: 10.0,
        }
    }
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("http_addr", &self.http_addr)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_prompt_chars", &self.max_prompt_chars)
            .field("rate_per_sec", &self.rate_per_sec)
            .field("rate_burst", &self.rate_burst)
            .finish()
    }
}

impl ProxyConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(key) = lookup("GENERATIVE_API_KEY") {
            let key = key.trim();
            if !key.is_empty() {
                config.api_key = Some(key.to_string());
            }
        }

        if let Some(base) = lookup("GENERATIVE_API_BASE") {
            let base = base.trim().trim_end_matches('/');
            if base.starts_with("http://") || base.starts_with("https://") {
                config.api_base = base.to_string();
            } else {
                tracing::warn!(value = %base, "Invalid GENERATIVE_API_BASE, using default");
            }
        }

        if let Some(model) = lookup("GENERATIVE_MODEL") {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }

        if let Some(val) = lookup("MAX_PROMPT_CHARS") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.max_prompt_chars = n,
                _ => tracing::warn!(value = %val, "Invalid MAX_PROMPT_CHARS, using default"),
            }
        }

        if let Some(val) = lookup("RATE_LIMIT_PER_SEC") {
            match val.parse::<f64>() {
                Ok(n) if n > 0.0 => config.rate_per_sec = n,
                _ => tracing::warn!(value = %val, "Invalid RATE_LIMIT_PER_SEC, using default"),
            }
        }

        if let Some(val) = lookup("RATE_LIMIT_BURST") {
            match val.parse::<f64>() {
                Ok(n) if n >= 1.0 => config.rate_burst = n,
                _ => tracing::warn!(value = %val, "Invalid RATE_LIMIT_BURST, using default"),
            }
        }

        config
    }
}
