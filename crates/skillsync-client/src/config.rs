//! Client configuration loaded from environment variables.
//!
//! Every setting has a default pointing at a local development stack, so a
//! client starts with zero configuration. URLs saved in the store's
//! [`AppSettings`] take precedence over the environment.

use std::path::PathBuf;

use reqwest::Url;
use skillsync_shared::constants::{DEFAULT_API_BASE_URL, DEFAULT_CHAT_URL};
use skillsync_store::AppSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend REST root.
    /// Env: `SKILLSYNC_API_URL`
    /// Default: `http://localhost:4043/api`
    pub api_base_url: String,

    /// Chat proxy endpoint.
    /// Env: `SKILLSYNC_CHAT_URL`
    /// Default: `http://localhost:8080/chat`
    pub chat_url: String,

    /// Directory of the local database.
    /// Env: `SKILLSYNC_DATA_DIR`
    /// Default: the platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Google OAuth client id. Google sign-in is unavailable while unset.
    /// Env: `SKILLSYNC_GOOGLE_CLIENT_ID`
    pub google_client_id: Option<String>,

    /// Redirect URI registered for the OAuth client.
    /// Env: `SKILLSYNC_OAUTH_REDIRECT`
    pub oauth_redirect_uri: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            chat_url: DEFAULT_CHAT_URL.to_string(),
            data_dir: None,
            google_client_id: None,
            oauth_redirect_uri: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; invalid values are logged
    /// and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("SKILLSYNC_API_URL") {
            match checked_url(&url) {
                Some(url) => config.api_base_url = url,
                None => tracing::warn!(value = %url, "Invalid SKILLSYNC_API_URL, using default"),
            }
        }

        if let Some(url) = lookup("SKILLSYNC_CHAT_URL") {
            match checked_url(&url) {
                Some(url) => config.chat_url = url,
                None => tracing::warn!(value = %url, "Invalid SKILLSYNC_CHAT_URL, using default"),
            }
        }

        if let Some(dir) = lookup("SKILLSYNC_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }

        config.google_client_id = lookup("SKILLSYNC_GOOGLE_CLIENT_ID").filter(|v| !v.trim().is_empty());

        if let Some(uri) = lookup("SKILLSYNC_OAUTH_REDIRECT") {
            match checked_url(&uri) {
                Some(uri) => config.oauth_redirect_uri = Some(uri),
                None => tracing::warn!(value = %uri, "Invalid SKILLSYNC_OAUTH_REDIRECT, ignoring"),
            }
        }

        config
    }

    /// Apply URL overrides saved by a previous run.
    pub fn with_settings(mut self, settings: &AppSettings) -> Self {
        if let Some(url) = settings.api_base_url.as_deref().and_then(checked_url) {
            self.api_base_url = url;
        }
        if let Some(url) = settings.chat_url.as_deref().and_then(checked_url) {
            self.chat_url = url;
        }
        self
    }
}

fn checked_url(raw: &str) -> Option<String> {
    let raw = raw.trim().trim_end_matches('/');
    let url = Url::parse(raw).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| raw.to_string())
}
