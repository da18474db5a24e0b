//! Authenticated REST/JSON transport.
//!
//! No retries, no backoff: each call is one request, and its failure is
//! returned to the caller to surface.

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use skillsync_shared::models::Wellformed;

use crate::error::NetError;
use crate::session::Session;
use crate::Result;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: Session,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:4043/api`.
    pub fn new(base_url: &str, session: Session) -> Result<Self> {
        Self::with_http(reqwest::Client::new(), base_url, session)
    }

    pub fn with_http(http: reqwest::Client, base_url: &str, session: Session) -> Result<Self> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| NetError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(NetError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            http,
            base,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// API root joined with path segments; each segment is percent-encoded,
    /// so ids and topic names may contain any character.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| NetError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Absolute URL for a path relative to the API root, e.g. a media path.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    /// Resolve a URL the backend handed out. Root-relative paths such as
    /// `/api/posts/media/x` hang off the server origin, not the API root;
    /// absolute URLs pass through.
    pub fn resolve_url(&self, url: &str) -> String {
        match self.base.join(url) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => url.to_string(),
        }
    }

    /// Request without credentials (login, signup).
    pub(crate) fn public(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.http.request(method, self.endpoint(segments)?))
    }

    /// Request carrying `Authorization: Bearer <token>`. Fails without
    /// touching the network when the session holds no token.
    pub(crate) fn authed(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let token = self.session.token().ok_or(NetError::NotAuthenticated)?;
        Ok(self.public(method, segments)?.bearer_auth(token))
    }

    /// Send, check the status, decode and shape-check the JSON body.
    pub(crate) async fn send<T>(&self, request: RequestBuilder, fallback: &str) -> Result<T>
    where
        T: DeserializeOwned + Wellformed,
    {
        let response = self.dispatch(request, fallback).await?;
        let bytes = response.bytes().await?;
        let value: T = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, "Backend returned malformed JSON");
            NetError::Decode(e)
        })?;
        value.check().map_err(|e| {
            warn!(error = %e, "Backend payload failed shape check");
            NetError::Payload(e)
        })?;
        Ok(value)
    }

    /// Send and check the status, ignoring any body.
    pub(crate) async fn send_empty(&self, request: RequestBuilder, fallback: &str) -> Result<()> {
        self.dispatch(request, fallback).await.map(drop)
    }

    async fn dispatch(&self, request: RequestBuilder, fallback: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Request did not complete");
            NetError::Transport(e)
        })?;

        let status = response.status();
        debug!(url = %response.url().path(), status = status.as_u16(), "backend response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let reason = backend_message(&body);
        let from_body = reason.is_some();
        let message = reason.unwrap_or_else(|| fallback.to_string());
        warn!(status = status.as_u16(), %message, "Backend rejected request");

        Err(match status.as_u16() {
            401 => NetError::Unauthorized(message),
            409 => NetError::Conflict(message),
            code => NetError::Status {
                status: code,
                message,
                from_body,
            },
        })
    }
}

/// `message`, `error` or `error.message` string of a JSON error body.
pub(crate) fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|v| v.as_str())
        .or_else(|| value.get("error")?.as_str())
        .or_else(|| value.get("error")?.get("message")?.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
