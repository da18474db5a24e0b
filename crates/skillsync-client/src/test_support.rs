//! Fake backend and context builders for panel tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::Router;

use skillsync_net::{ApiClient, Session};

use crate::events::EventBus;
use crate::state::Context;

/// Serve `app` on an ephemeral local port and return its `/api` base URL.
pub(crate) async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

pub(crate) fn context_for(base: &str, token: Option<&str>) -> Context {
    let session = match token {
        Some(token) => Session::with_token(token),
        None => Session::new(),
    };
    Context::new(ApiClient::new(base, session).unwrap(), EventBus::new())
}

/// Shared request counter for fake handlers.
#[derive(Clone, Default)]
pub(crate) struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub(crate) fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
