use thiserror::Error;

use skillsync_net::NetError;
use skillsync_shared::ValidationError;
use skillsync_store::StoreError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Net(#[from] NetError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Form rejected before any network call.
    #[error("{}", summarize(.0))]
    Validation(Vec<ValidationError>),

    /// The triggering control is disabled while a call is outstanding.
    #[error("Another request is already in progress")]
    Busy,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("{0}")]
    Rejected(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ClientError {
    /// Whether the shell should drop the session.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            ClientError::Net(e) => e.is_auth_failure(),
            ClientError::NotAuthenticated => true,
            _ => false,
        }
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ClientError>;
