use reqwest::Method;

use skillsync_shared::models::{LearningProgress, LearningProgressDraft};
use skillsync_shared::types::ProgressId;

use crate::transport::ApiClient;
use crate::Result;

impl ApiClient {
    /// `GET /learning-progress`, the current user's records.
    pub async fn list_progress(&self) -> Result<Vec<LearningProgress>> {
        let req = self.authed(Method::GET, &["learning-progress"])?;
        self.send(req, "Failed to fetch learning progress").await
    }

    /// `GET /learning-progress/{id}`
    pub async fn progress(&self, id: &ProgressId) -> Result<LearningProgress> {
        let req = self.authed(Method::GET, &["learning-progress", id.as_str()])?;
        self.send(req, "Learning progress not found").await
    }

    /// `POST /learning-progress`
    pub async fn create_progress(&self, draft: &LearningProgressDraft) -> Result<LearningProgress> {
        let req = self.authed(Method::POST, &["learning-progress"])?.json(draft);
        self.send(req, "Failed to save progress").await
    }

    /// `PUT /learning-progress/{id}`
    pub async fn update_progress(
        &self,
        id: &ProgressId,
        draft: &LearningProgressDraft,
    ) -> Result<LearningProgress> {
        let req = self
            .authed(Method::PUT, &["learning-progress", id.as_str()])?
            .json(draft);
        self.send(req, "Failed to save progress").await
    }

    /// `DELETE /learning-progress/{id}`
    pub async fn delete_progress(&self, id: &ProgressId) -> Result<()> {
        let req = self.authed(Method::DELETE, &["learning-progress", id.as_str()])?;
        self.send_empty(req, "Failed to delete progress").await
    }

    /// `PATCH /learning-progress/{id}/topics/{name}?completed=..`; returns
    /// the whole record with its recomputed percentage.
    pub async fn set_topic_completed(
        &self,
        id: &ProgressId,
        topic: &str,
        completed: bool,
    ) -> Result<LearningProgress> {
        let req = self
            .authed(Method::PATCH, &["learning-progress", id.as_str(), "topics", topic])?
            .query(&[("completed", completed)]);
        self.send(req, "Failed to update topic").await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::extract::{Path, Query};
    use axum::routing::{get, patch};
    use axum::{Json, Router};
    use serde_json::json;

    use crate::error::NetError;
    use crate::test_support::{client_for, spawn_backend};
    use crate::Session;

    use super::*;

    #[tokio::test]
    async fn topic_toggle_encodes_name_and_flag() {
        let app = Router::new().route(
            "/api/learning-progress/:id/topics/:topic",
            patch(
                |Path((id, topic)): Path<(String, String)>,
                 Query(q): Query<HashMap<String, String>>| async move {
                    assert_eq!(id, "pr1");
                    assert_eq!(topic, "Traits & Generics");
                    assert_eq!(q.get("completed").map(String::as_str), Some("true"));
                    Json(json!({
                        "id": "pr1",
                        "name": "Rust",
                        "topics": [{"name": "Traits & Generics", "completed": true}],
                        "progress": 100
                    }))
                },
            ),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        let updated = api
            .set_topic_completed(&ProgressId::new("pr1"), "Traits & Generics", true)
            .await
            .unwrap();
        assert_eq!(updated.percent(), 100);
    }

    #[tokio::test]
    async fn out_of_range_progress_is_rejected() {
        let app = Router::new().route(
            "/api/learning-progress",
            get(|| async { Json(json!([{"id": "pr1", "progress": 140}])) }),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        assert!(matches!(
            api.list_progress().await,
            Err(NetError::Payload(_))
        ));
    }

    #[tokio::test]
    async fn garbage_body_is_decode_error() {
        let app = Router::new().route(
            "/api/learning-progress",
            get(|| async { "<html>oops</html>" }),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        assert!(matches!(
            api.list_progress().await,
            Err(NetError::Decode(_))
        ));
    }
}
