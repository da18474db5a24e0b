//! Text generation for the chat assistant.
//!
//! Clients normally talk to the SkillSync chat proxy, which holds the
//! upstream API key. [`ChatEndpoint::Direct`] calls the upstream API itself
//! and is what the proxy uses internally.

use reqwest::Url;
use tracing::{debug, warn};

use skillsync_shared::constants::CHAT_FALLBACK_REPLY;
use skillsync_shared::protocol::{GenerateRequest, GenerateResponse};

use crate::error::NetError;
use crate::transport::backend_message;
use crate::Result;

#[derive(Clone)]
pub enum ChatEndpoint {
    /// The chat proxy's `/chat` URL. Same wire format, no key.
    Proxy(String),
    /// Upstream `{api_base}/models/{model}:generateContent?key=...`.
    Direct {
        api_base: String,
        model: String,
        api_key: String,
    },
}

impl std::fmt::Debug for ChatEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatEndpoint::Proxy(url) => f.debug_tuple("Proxy").field(url).finish(),
            ChatEndpoint::Direct { api_base, model, .. } => f
                .debug_struct("Direct")
                .field("api_base", api_base)
                .field("model", model)
                .field("api_key", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Clone)]
pub struct GenerativeClient {
    http: reqwest::Client,
    url: Url,
}

impl std::fmt::Debug for GenerativeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerativeClient")
            .field("host", &self.url.host_str())
            .field("path", &self.url.path())
            .finish_non_exhaustive()
    }
}

impl GenerativeClient {
    pub fn new(endpoint: ChatEndpoint) -> Result<Self> {
        Self::with_http(reqwest::Client::new(), endpoint)
    }

    pub fn with_http(http: reqwest::Client, endpoint: ChatEndpoint) -> Result<Self> {
        let url = match endpoint {
            ChatEndpoint::Proxy(url) => {
                Url::parse(&url).map_err(|e| NetError::InvalidUrl(format!("{url}: {e}")))?
            }
            ChatEndpoint::Direct {
                api_base,
                model,
                api_key,
            } => {
                let base = format!(
                    "{}/models/{}:generateContent",
                    api_base.trim_end_matches('/'),
                    model
                );
                Url::parse_with_params(&base, &[("key", api_key.as_str())])
                    .map_err(|e| NetError::InvalidUrl(format!("{api_base}: {e}")))?
            }
        };
        Ok(Self { http, url })
    }

    pub fn via_proxy(chat_url: &str) -> Result<Self> {
        Self::new(ChatEndpoint::Proxy(chat_url.to_string()))
    }

    /// Call the upstream API directly. Anything running this in a user's
    /// process exposes the key to that user.
    pub fn direct(api_base: &str, model: &str, api_key: &str) -> Result<Self> {
        Self::new(ChatEndpoint::Direct {
            api_base: api_base.to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// One `generateContent` round trip.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        // The URL may carry the key; log neither.
        let response = self
            .http
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                warn!(error = %e, "Generation request did not complete");
                NetError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = backend_message(&body);
            let from_body = reason.is_some();
            let message =
                reason.unwrap_or_else(|| format!("generation failed with status {status}"));
            warn!(status = status.as_u16(), %message, "Generation rejected");
            return Err(NetError::Status {
                status: status.as_u16(),
                message,
                from_body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| e.without_url())?;
        let reply: GenerateResponse = serde_json::from_slice(&bytes)?;
        debug!(candidates = reply.candidates.len(), "generation reply");
        Ok(reply)
    }

    /// Reply text for a single prompt, or the fixed fallback when the
    /// response carries no text.
    pub async fn reply(&self, prompt: &str) -> Result<String> {
        let response = self
            .generate(&GenerateRequest::single_prompt(prompt))
            .await?;
        Ok(response
            .reply_text()
            .unwrap_or_else(|| CHAT_FALLBACK_REPLY.to_string()))
    }
}
