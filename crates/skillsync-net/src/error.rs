use thiserror::Error;

use skillsync_shared::PayloadError;

#[derive(Error, Debug)]
pub enum NetError {
    /// Connection refused, DNS failure, timeout, ...
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// An authenticated call was attempted without a token.
    #[error("Not logged in")]
    NotAuthenticated,

    /// The backend rejected the token or the credentials (HTTP 401).
    #[error("{0}")]
    Unauthorized(String),

    /// HTTP 409, e.g. signing up with an email that already exists.
    #[error("{0}")]
    Conflict(String),

    /// Any other non-2xx response. `message` comes from the response body
    /// when it has one (`from_body`), otherwise it is the operation's
    /// fallback text.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        from_body: bool,
    },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    Payload(#[from] PayloadError),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl NetError {
    pub fn status(&self) -> Option<u16> {
        match self {
            NetError::Unauthorized(_) => Some(401),
            NetError::Conflict(_) => Some(409),
            NetError::Status { status, .. } => Some(*status),
            NetError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The backend's own explanation, when the error body carried one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            NetError::Status {
                message,
                from_body: true,
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// [`reason`](Self::reason), or `fallback` when the backend gave none.
    pub fn reason_or(&self, fallback: &str) -> String {
        self.reason().unwrap_or(fallback).to_string()
    }

    /// Whether the session should be dropped because of this error.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, NetError::NotAuthenticated | NetError::Unauthorized(_))
    }
}
