use reqwest::Method;

use skillsync_shared::models::{ProfileUpdate, User};
use skillsync_shared::types::UserId;

use crate::transport::ApiClient;
use crate::Result;

impl ApiClient {
    /// `PUT /users/me`; returns the stored profile.
    pub async fn update_me(&self, update: &ProfileUpdate) -> Result<User> {
        let req = self.authed(Method::PUT, &["users", "me"])?.json(update);
        self.send(req, "Failed to update profile").await
    }

    /// `DELETE /users/me`
    pub async fn delete_me(&self) -> Result<()> {
        let req = self.authed(Method::DELETE, &["users", "me"])?;
        self.send_empty(req, "Failed to delete account").await
    }

    /// `GET /users/recommendations`
    pub async fn recommendations(&self) -> Result<Vec<User>> {
        let req = self.authed(Method::GET, &["users", "recommendations"])?;
        self.send(req, "Failed to fetch users").await
    }

    /// `POST /users/follow/{id}`
    pub async fn follow(&self, user: &UserId) -> Result<()> {
        let req = self.authed(Method::POST, &["users", "follow", user.as_str()])?;
        self.send_empty(req, "Failed to follow user").await
    }

    /// `POST /users/unfollow/{id}`
    pub async fn unfollow(&self, user: &UserId) -> Result<()> {
        let req = self.authed(Method::POST, &["users", "unfollow", user.as_str()])?;
        self.send_empty(req, "Failed to unfollow user").await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, post, put};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use crate::error::NetError;
    use crate::test_support::{client_for, spawn_backend};
    use crate::Session;

    use super::*;

    #[tokio::test]
    async fn recommendations_rejects_user_without_id() {
        let app = Router::new().route(
            "/api/users/recommendations",
            get(|| async { Json(json!([{"id": "u2", "name": "Bo"}, {"name": "ghost"}])) }),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        assert!(matches!(
            api.recommendations().await,
            Err(NetError::Payload(_))
        ));
    }

    #[tokio::test]
    async fn follow_and_unfollow_hit_user_paths() {
        let hits = Arc::new(Mutex::new(Vec::<String>::new()));
        let follow_hits = hits.clone();
        let unfollow_hits = hits.clone();
        let app = Router::new()
            .route(
                "/api/users/follow/:id",
                post(move |Path(id): Path<String>| async move {
                    follow_hits.lock().unwrap().push(format!("follow {id}"));
                    StatusCode::OK
                }),
            )
            .route(
                "/api/users/unfollow/:id",
                post(move |Path(id): Path<String>| async move {
                    unfollow_hits.lock().unwrap().push(format!("unfollow {id}"));
                    StatusCode::OK
                }),
            );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        api.follow(&UserId::new("u2")).await.unwrap();
        api.unfollow(&UserId::new("u2")).await.unwrap();
        assert_eq!(*hits.lock().unwrap(), vec!["follow u2", "unfollow u2"]);
    }

    #[tokio::test]
    async fn update_me_omits_blank_password() {
        let app = Router::new().route(
            "/api/users/me",
            put(|Json(body): Json<Value>| async move {
                assert!(body.get("password").is_none());
                Json(json!({"id": "u1", "name": body["name"], "email": body["email"]}))
            }),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        let user = api
            .update_me(&ProfileUpdate {
                name: "Ada L".into(),
                email: "ada@gmail.com".into(),
                password: None,
            })
            .await
            .unwrap();
        assert_eq!(user.name, "Ada L");
    }

    #[tokio::test]
    async fn server_error_message_is_surfaced() {
        let app = Router::new().route(
            "/api/users/me",
            axum::routing::delete(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"message": "database down"})),
                )
            }),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        let err = api.delete_me().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "database down");
    }
}
