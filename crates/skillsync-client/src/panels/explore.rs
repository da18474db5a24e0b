//! People discovery: recommended users and the follow list.

use skillsync_shared::models::{FollowInfo, FollowRef, User};
use skillsync_shared::types::UserId;
use tracing::{info, warn};

use crate::error::{ClientError, Result};
use crate::fetch::Remote;
use crate::state::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExploreTab {
    #[default]
    Recommendations,
    Following,
}

#[derive(Debug, Clone, Default)]
pub struct ExplorePanel {
    tab: ExploreTab,
    recommendations: Remote<Vec<User>>,
    following: Vec<FollowRef>,
}

impl ExplorePanel {
    pub fn tab(&self) -> ExploreTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: ExploreTab) {
        self.tab = tab;
    }

    pub fn recommendations(&self) -> &Remote<Vec<User>> {
        &self.recommendations
    }

    pub fn following(&self) -> &[FollowRef] {
        &self.following
    }

    pub fn is_following(&self, id: &UserId) -> bool {
        self.following.iter().any(|f| f.user_id() == id)
    }

    /// Seed the follow list from the signed-in user and fetch
    /// recommendations.
    pub async fn load(&mut self, ctx: &Context, me: &User) -> Result<()> {
        self.following = me.following.clone();
        self.recommendations.start();
        match ctx.api.recommendations().await {
            Ok(users) => {
                self.recommendations.resolve(Ok::<_, ClientError>(users));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Error fetching users");
                self.recommendations
                    .resolve(Err::<Vec<User>, _>("Failed to fetch users"));
                Err(e.into())
            }
        }
    }

    /// Follow a recommended user: it moves from recommendations to the
    /// follow list.
    pub async fn follow(&mut self, ctx: &Context, id: &UserId) -> Result<()> {
        if let Err(e) = ctx.api.follow(id).await {
            warn!(user_id = %id, error = %e, "Error following user");
            return Err(e.into());
        }
        info!(user_id = %id, "Followed user");

        let name = self
            .recommendations
            .data()
            .and_then(|users| users.iter().find(|u| &u.id == id))
            .map(|u| u.name.clone());
        self.recommendations
            .update(|users| users.retain(|u| &u.id != id));
        if !self.is_following(id) {
            self.following.push(FollowRef::Info(FollowInfo {
                user_id: id.clone(),
                name,
            }));
        }
        Ok(())
    }

    pub async fn unfollow(&mut self, ctx: &Context, id: &UserId) -> Result<()> {
        if let Err(e) = ctx.api.unfollow(id).await {
            warn!(user_id = %id, error = %e, "Error unfollowing user");
            return Err(e.into());
        }
        info!(user_id = %id, "Unfollowed user");
        self.following.retain(|f| f.user_id() != id);
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    use crate::test_support::{context_for, spawn_backend};

    use super::*;

    fn me() -> User {
        serde_json::from_value(json!({
            "id": "u1",
            "name": "Ada",
            "email": "ada@gmail.com",
            "following": ["u9", {"id": "u8", "name": "Grace"}]
        }))
        .unwrap()
    }

    async fn ctx() -> Context {
        let app = Router::new()
            .route(
                "/api/users/recommendations",
                get(|| async {
                    Json(json!([{"id": "u2", "name": "Bo"}, {"id": "u3", "name": "Cy"}]))
                }),
            )
            .route(
                "/api/users/follow/:id",
                post(|Path(id): Path<String>| async move {
                    if id == "u3" {
                        StatusCode::INTERNAL_SERVER_ERROR
                    } else {
                        StatusCode::OK
                    }
                }),
            )
            .route("/api/users/unfollow/:id", post(|| async { StatusCode::OK }));
        context_for(&spawn_backend(app).await, Some("t"))
    }

    #[tokio::test]
    async fn follow_moves_user_between_lists() {
        let ctx = ctx().await;
        let mut panel = ExplorePanel::default();
        panel.load(&ctx, &me()).await.unwrap();
        assert_eq!(panel.following().len(), 2);

        panel.follow(&ctx, &UserId::new("u2")).await.unwrap();
        assert!(panel.is_following(&UserId::new("u2")));
        assert_eq!(panel.recommendations().data().unwrap().len(), 1);

        panel.select_tab(ExploreTab::Following);
        panel.unfollow(&ctx, &UserId::new("u9")).await.unwrap();
        assert!(!panel.is_following(&UserId::new("u9")));
        assert_eq!(panel.following().len(), 2);
    }

    #[tokio::test]
    async fn failed_follow_changes_nothing() {
        let ctx = ctx().await;
        let mut panel = ExplorePanel::default();
        panel.load(&ctx, &me()).await.unwrap();

        assert!(panel.follow(&ctx, &UserId::new("u3")).await.is_err());
        assert!(!panel.is_following(&UserId::new("u3")));
        assert_eq!(panel.recommendations().data().unwrap().len(), 2);
    }
}
