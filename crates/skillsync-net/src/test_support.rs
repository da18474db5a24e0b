//! In-process fake backend for HTTP tests.

use axum::Router;

use crate::session::Session;
use crate::transport::ApiClient;

/// Serve `app` on an ephemeral local port and return its `/api` base URL.
pub(crate) async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

pub(crate) fn client_for(base: &str, session: Session) -> ApiClient {
    ApiClient::new(base, session).unwrap()
}
