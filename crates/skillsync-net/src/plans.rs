use reqwest::Method;

use skillsync_shared::models::{LearningPlan, LearningPlanDraft};
use skillsync_shared::types::PlanId;

use crate::transport::ApiClient;
use crate::Result;

impl ApiClient {
    /// `GET /learningplans`, every user's plans.
    pub async fn all_plans(&self) -> Result<Vec<LearningPlan>> {
        let req = self.authed(Method::GET, &["learningplans"])?;
        self.send(req, "Failed to fetch learning plans").await
    }

    /// `GET /learningplans/my`
    pub async fn my_plans(&self) -> Result<Vec<LearningPlan>> {
        let req = self.authed(Method::GET, &["learningplans", "my"])?;
        self.send(req, "Failed to fetch learning plans").await
    }

    /// `GET /learningplans/{id}`
    pub async fn plan(&self, id: &PlanId) -> Result<LearningPlan> {
        let req = self.authed(Method::GET, &["learningplans", id.as_str()])?;
        self.send(req, "Learning plan not found").await
    }

    /// `GET /learningplans/by-name/{name}`
    pub async fn plan_by_name(&self, name: &str) -> Result<LearningPlan> {
        let req = self.authed(Method::GET, &["learningplans", "by-name", name])?;
        self.send(req, "Learning plan not found").await
    }

    /// `POST /learningplans`
    pub async fn create_plan(&self, draft: &LearningPlanDraft) -> Result<LearningPlan> {
        let req = self.authed(Method::POST, &["learningplans"])?.json(draft);
        self.send(req, "Failed to create learning plan").await
    }

    /// `PUT /learningplans/{id}`
    pub async fn update_plan(&self, id: &PlanId, draft: &LearningPlanDraft) -> Result<LearningPlan> {
        let req = self
            .authed(Method::PUT, &["learningplans", id.as_str()])?
            .json(draft);
        self.send(req, "Failed to update learning plan").await
    }

    /// `DELETE /learningplans/{id}`
    pub async fn delete_plan(&self, id: &PlanId) -> Result<()> {
        let req = self.authed(Method::DELETE, &["learningplans", id.as_str()])?;
        self.send_empty(req, "Failed to delete learning plan").await
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use crate::error::NetError;
    use crate::test_support::{client_for, spawn_backend};
    use crate::Session;

    use super::*;

    #[tokio::test]
    async fn my_plans_decodes_null_lists() {
        let app = Router::new().route(
            "/api/learningplans/my",
            get(|| async {
                Json(json!([{"id": "lp1", "name": "Rust", "description": null, "topics": null}]))
            }),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        let plans = api.my_plans().await.unwrap();
        assert_eq!(plans[0].name, "Rust");
        assert!(plans[0].topics.is_empty());
        assert!(plans[0].description.is_empty());
    }

    #[tokio::test]
    async fn create_plan_posts_draft() {
        let app = Router::new().route(
            "/api/learningplans",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["topics"], json!(["Ownership", "Traits"]));
                let mut plan = body;
                plan["id"] = json!("lp9");
                (StatusCode::CREATED, Json(plan))
            }),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        let plan = api
            .create_plan(&LearningPlanDraft {
                name: "Rust".into(),
                description: "Systems".into(),
                topics: vec!["Ownership".into(), "Traits".into()],
                resources: vec!["The Book".into()],
            })
            .await
            .unwrap();
        assert_eq!(plan.id, PlanId::new("lp9"));
    }

    #[tokio::test]
    async fn missing_plan_is_not_found() {
        let app = Router::new().route(
            "/api/learningplans/:id",
            get(|Path(_id): Path<String>| async { StatusCode::NOT_FOUND }),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        match api.plan(&PlanId::new("nope")).await {
            Err(e @ NetError::Status { .. }) => {
                assert_eq!(e.status(), Some(404));
                assert_eq!(e.to_string(), "Learning plan not found");
                assert_eq!(e.reason(), None);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejection_reason_comes_from_body() {
        let app = Router::new().route(
            "/api/learningplans/:id",
            delete(|Path(_id): Path<String>| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"message": "Plan is shared and cannot be deleted"})),
                )
            }),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        let err = api.delete_plan(&PlanId::new("lp1")).await.unwrap_err();
        assert_eq!(err.reason(), Some("Plan is shared and cannot be deleted"));
        assert_eq!(
            err.reason_or("Failed to delete"),
            "Plan is shared and cannot be deleted"
        );
    }
}
