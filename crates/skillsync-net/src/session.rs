//! The current access credential.
//!
//! One [`Session`] is created by the application shell and cloned into every
//! component that talks to the backend. Clones share the same slot, so a
//! login or logout is immediately visible to every outgoing call.

use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        let mut slot = self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = (!token.trim().is_empty()).then_some(token);
    }

    /// Drop the token. Returns whether one was set.
    pub fn clear(&self) -> bool {
        self.token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .is_some()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
