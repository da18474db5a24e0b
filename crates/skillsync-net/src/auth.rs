//! Credential exchange. Every call returns the bearer token minted by the
//! backend; storing it in the [`Session`](crate::Session) is left to the
//! caller so it can persist the token first.

use reqwest::Method;

use skillsync_shared::models::{AuthResponse, Credentials, GoogleCredential, SignupRequest, User};

use crate::error::NetError;
use crate::transport::ApiClient;
use crate::Result;

pub const EMAIL_TAKEN_MESSAGE: &str = "Email already exists. Please use a different email.";

impl ApiClient {
    /// `POST /auth/login`
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let req = self.public(Method::POST, &["auth", "login"])?.json(credentials);
        self.send(req, "Invalid credentials").await
    }

    /// `POST /auth/signup`. A 409 means the email is already registered.
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        let req = self.public(Method::POST, &["auth", "signup"])?.json(request);
        self.send(req, "Signup failed").await.map_err(|e| match e {
            NetError::Conflict(_) => NetError::Conflict(EMAIL_TAKEN_MESSAGE.to_string()),
            other => other,
        })
    }

    /// `POST /auth/google` with the access token from the OAuth popup.
    pub async fn google_login(&self, credential: &GoogleCredential) -> Result<AuthResponse> {
        let req = self.public(Method::POST, &["auth", "google"])?.json(credential);
        self.send(req, "Google login failed").await
    }

    /// `POST /auth/google-signup`
    pub async fn google_signup(&self, credential: &GoogleCredential) -> Result<AuthResponse> {
        let req = self
            .public(Method::POST, &["auth", "google-signup"])?
            .json(credential);
        self.send(req, "Google signup failed").await
    }

    /// `GET /users/me` for the token currently held by the session.
    pub async fn current_user(&self) -> Result<User> {
        let req = self.authed(Method::GET, &["users", "me"])?;
        self.send(req, "Failed to load profile").await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::test_support::{client_for, spawn_backend};
    use crate::Session;

    fn creds() -> Credentials {
        Credentials {
            email: "ada@gmail.com".into(),
            password: "secret1".into(),
        }
    }

    #[tokio::test]
    async fn login_returns_token() {
        let app = Router::new().route(
            "/api/auth/login",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["email"], "ada@gmail.com");
                Json(json!({"token": "jwt-1", "email": "ada@gmail.com"}))
            }),
        );
        let api = client_for(&spawn_backend(app).await, Session::new());
        let auth = api.login(&creds()).await.unwrap();
        assert_eq!(auth.token, "jwt-1");
    }

    #[tokio::test]
    async fn login_rejected_maps_to_unauthorized() {
        let app = Router::new().route(
            "/api/auth/login",
            post(|| async { StatusCode::UNAUTHORIZED }),
        );
        let api = client_for(&spawn_backend(app).await, Session::new());
        match api.login(&creds()).await {
            Err(NetError::Unauthorized(msg)) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_without_token_is_malformed() {
        let app = Router::new().route(
            "/api/auth/login",
            post(|| async { Json(json!({"message": "ok"})) }),
        );
        let api = client_for(&spawn_backend(app).await, Session::new());
        assert!(matches!(
            api.login(&creds()).await,
            Err(NetError::Payload(_))
        ));
    }

    #[tokio::test]
    async fn signup_conflict_has_fixed_message() {
        let app = Router::new().route(
            "/api/auth/signup",
            post(|| async { (StatusCode::CONFLICT, Json(json!({"message": "dup"}))) }),
        );
        let api = client_for(&spawn_backend(app).await, Session::new());
        let req = SignupRequest {
            name: "Ada".into(),
            email: "ada@gmail.com".into(),
            password: "secret1".into(),
        };
        let err = api.signup(&req).await.unwrap_err();
        assert_eq!(err.to_string(), EMAIL_TAKEN_MESSAGE);
    }

    #[tokio::test]
    async fn current_user_sends_bearer() {
        let app = Router::new().route(
            "/api/users/me",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if auth != "Bearer jwt-1" {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                Ok(Json(json!({"id": "u1", "name": "Ada", "email": "ada@gmail.com"})))
            }),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("jwt-1"));
        let user = api.current_user().await.unwrap();
        assert_eq!(user.name, "Ada");
    }

    #[tokio::test]
    async fn current_user_without_token_skips_network() {
        let api = client_for("http://127.0.0.1:9/api", Session::new());
        assert!(matches!(
            api.current_user().await,
            Err(NetError::NotAuthenticated)
        ));
    }
}
