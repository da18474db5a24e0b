//! Google OAuth implicit flow.
//!
//! The client opens [`OAuthRequest::url`] in a browser; Google redirects
//! back with `#access_token=...&state=...` and the access token is then
//! exchanged at `/auth/google` or `/auth/google-signup`.

use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Url;

use skillsync_shared::constants::{GOOGLE_AUTH_URL, GOOGLE_OAUTH_SCOPE};

use crate::error::NetError;
use crate::Result;

const STATE_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthRequest {
    pub url: String,
    /// Anti-forgery value the callback must echo back.
    pub state: String,
}

pub fn authorization_url(client_id: &str, redirect_uri: &str) -> Result<OAuthRequest> {
    let state: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(char::from)
        .collect();
    let url = Url::parse_with_params(
        GOOGLE_AUTH_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "token"),
            ("scope", GOOGLE_OAUTH_SCOPE),
            ("state", state.as_str()),
        ],
    )
    .map_err(|e| NetError::InvalidUrl(e.to_string()))?;
    Ok(OAuthRequest {
        url: url.into(),
        state,
    })
}

/// Access token from a redirect fragment, if present and the state matches.
/// Accepts the fragment with or without the leading `#`.
pub fn parse_callback_fragment(fragment: &str, expected_state: &str) -> Option<String> {
    let fragment = fragment.trim().trim_start_matches('#');
    let url = Url::parse(&format!("http://callback.invalid/?{fragment}")).ok()?;

    let mut token = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "access_token" => token = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        tracing::warn!("OAuth callback state mismatch");
        return None;
    }
    token.filter(|t| !t.is_empty())
}
