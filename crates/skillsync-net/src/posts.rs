//! Feed posts: listing, the multipart composer upload, and per-post actions.
//!
//! Mutations return nothing; callers re-fetch the feed afterwards.

use reqwest::multipart::Form;
use reqwest::Method;
use serde::Serialize;

use skillsync_shared::constants::MAX_POST_IMAGES;
use skillsync_shared::models::{media_path, Post};
use skillsync_shared::types::{MediaId, PostId};

use crate::error::NetError;
use crate::media::{MediaKind, MediaUpload};
use crate::transport::ApiClient;
use crate::Result;

#[derive(Serialize)]
struct ContentBody<'a> {
    content: &'a str,
}

impl ApiClient {
    /// Absolute URL of an uploaded image or video.
    pub fn media_url(&self, id: &MediaId) -> String {
        self.absolute(&media_path(id))
    }

    /// `GET /posts`, the global feed.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let req = self.authed(Method::GET, &["posts"])?;
        let posts: Vec<Post> = self.send(req, "Failed to fetch posts").await?;
        Ok(self.resolve_media(posts))
    }

    /// `GET /posts/following`, posts by followed users.
    pub async fn following_posts(&self) -> Result<Vec<Post>> {
        let req = self.authed(Method::GET, &["posts", "following"])?;
        let posts: Vec<Post> = self.send(req, "Failed to fetch posts").await?;
        Ok(self.resolve_media(posts))
    }

    fn resolve_media(&self, posts: Vec<Post>) -> Vec<Post> {
        posts
            .into_iter()
            .map(|mut post| {
                for url in post.image_urls.iter_mut() {
                    *url = self.resolve_url(url);
                }
                post.video_url = post.video_url.map(|url| self.resolve_url(&url));
                post.with_media_urls(|id| self.media_url(id))
            })
            .collect()
    }

    /// `POST /posts` as multipart: `content`, up to three `images`, or one
    /// `video`. Images and video are mutually exclusive.
    pub async fn create_post(
        &self,
        content: &str,
        images: Vec<MediaUpload>,
        video: Option<MediaUpload>,
    ) -> Result<()> {
        if images.len() > MAX_POST_IMAGES {
            return Err(NetError::Media(format!(
                "at most {MAX_POST_IMAGES} images per post"
            )));
        }
        if !images.is_empty() && video.is_some() {
            return Err(NetError::Media(
                "a post has either images or a video".to_string(),
            ));
        }
        if images.iter().any(|i| i.kind() != MediaKind::Image) {
            return Err(NetError::Media("images must be image files".to_string()));
        }
        if video.as_ref().is_some_and(|v| v.kind() != MediaKind::Video) {
            return Err(NetError::Media("video must be a video file".to_string()));
        }

        let mut form = Form::new().text("content", content.to_string());
        for image in images {
            form = form.part("images", image.into_part()?);
        }
        if let Some(video) = video {
            form = form.part("video", video.into_part()?);
        }

        let req = self.authed(Method::POST, &["posts"])?.multipart(form);
        self.send_empty(req, "Failed to create post").await
    }

    /// `PUT /posts/{id}`. The new content travels both as the `content`
    /// query parameter and as a JSON body.
    pub async fn update_post(&self, id: &PostId, content: &str) -> Result<()> {
        let req = self
            .authed(Method::PUT, &["posts", id.as_str()])?
            .query(&[("content", content)])
            .json(&ContentBody { content });
        self.send_empty(req, "Failed to update post").await
    }

    /// `DELETE /posts/{id}`
    pub async fn delete_post(&self, id: &PostId) -> Result<()> {
        let req = self.authed(Method::DELETE, &["posts", id.as_str()])?;
        self.send_empty(req, "Failed to delete post").await
    }

    /// `POST /posts/{id}/like`
    pub async fn like_post(&self, id: &PostId) -> Result<()> {
        let req = self.authed(Method::POST, &["posts", id.as_str(), "like"])?;
        self.send_empty(req, "Failed to like post").await
    }

    /// `POST /posts/{id}/unlike`
    pub async fn unlike_post(&self, id: &PostId) -> Result<()> {
        let req = self.authed(Method::POST, &["posts", id.as_str(), "unlike"])?;
        self.send_empty(req, "Failed to unlike post").await
    }

    /// `POST /posts/{id}/comment`, content sent like [`Self::update_post`].
    pub async fn add_comment(&self, id: &PostId, content: &str) -> Result<()> {
        let req = self
            .authed(Method::POST, &["posts", id.as_str(), "comment"])?
            .query(&[("content", content)])
            .json(&ContentBody { content });
        self.send_empty(req, "Failed to add comment").await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Multipart, Path, Query};
    use axum::http::StatusCode;
    use axum::routing::{get, post, put};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use crate::test_support::{client_for, spawn_backend};
    use crate::Session;

    use super::*;

    fn image(name: &str) -> MediaUpload {
        MediaUpload::new(name, "image/png", vec![0x89u8, b'P', b'N', b'G']).unwrap()
    }

    #[tokio::test]
    async fn list_posts_resolves_media_urls() {
        let app = Router::new().route(
            "/api/posts",
            get(|| async {
                Json(json!([{
                    "id": "p1",
                    "userId": "u1",
                    "content": "hello",
                    "imageIds": ["m1", "m2"],
                    "videoId": null,
                    "likesCount": 1,
                    "likedBy": ["u2"],
                    "comments": null
                }]))
            }),
        );
        let base = spawn_backend(app).await;
        let api = client_for(&base, Session::with_token("t"));
        let posts = api.list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].image_urls, vec![
            format!("{base}/posts/media/m1"),
            format!("{base}/posts/media/m2"),
        ]);
        assert!(posts[0].video_url.is_none());
        assert_eq!(posts[0].comment_count(), 0);
    }

    #[tokio::test]
    async fn backend_media_urls_keep_a_single_api_prefix() {
        let app = Router::new().route(
            "/api/posts",
            get(|| async {
                Json(json!([{
                    "id": "p1",
                    "userId": "u1",
                    "imageUrls": ["/api/posts/media/m1"],
                    "videoUrl": "/api/posts/media/v1",
                    "likesCount": 0,
                    "likedBy": []
                }]))
            }),
        );
        let base = spawn_backend(app).await;
        let origin = base.trim_end_matches("/api");
        let api = client_for(&base, Session::with_token("t"));
        let posts = api.list_posts().await.unwrap();
        assert_eq!(posts[0].image_urls, vec![format!("{origin}/api/posts/media/m1")]);
        assert_eq!(
            posts[0].video_url.as_deref(),
            Some(format!("{origin}/api/posts/media/v1").as_str())
        );
        assert!(!posts[0].image_urls[0].contains("/api/api/"));
    }

    #[tokio::test]
    async fn inconsistent_like_count_is_rejected() {
        let app = Router::new().route(
            "/api/posts/following",
            get(|| async {
                Json(json!([{"id": "p1", "likesCount": 0, "likedBy": ["u2"]}]))
            }),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        assert!(matches!(
            api.following_posts().await,
            Err(NetError::Payload(_))
        ));
    }

    #[tokio::test]
    async fn create_post_sends_multipart_fields() {
        let seen = Arc::new(Mutex::new(Vec::<(String, Option<String>)>::new()));
        let sink = seen.clone();
        let app = Router::new().route(
            "/api/posts",
            post(move |mut multipart: Multipart| async move {
                while let Some(field) = multipart.next_field().await.unwrap() {
                    let name = field.name().unwrap_or_default().to_string();
                    let file = field.file_name().map(str::to_string);
                    sink.lock().unwrap().push((name, file));
                }
                StatusCode::CREATED
            }),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        api.create_post("hi", vec![image("a.png"), image("b.png")], None)
            .await
            .unwrap();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                ("content".to_string(), None),
                ("images".to_string(), Some("a.png".to_string())),
                ("images".to_string(), Some("b.png".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn create_post_enforces_media_rules_locally() {
        let api = client_for("http://127.0.0.1:9/api", Session::with_token("t"));
        let four = vec![image("1.png"), image("2.png"), image("3.png"), image("4.png")];
        assert!(matches!(
            api.create_post("x", four, None).await,
            Err(NetError::Media(_))
        ));

        let video = MediaUpload::new("v.mp4", "video/mp4", vec![0u8]).unwrap();
        assert!(matches!(
            api.create_post("x", vec![image("1.png")], Some(video)).await,
            Err(NetError::Media(_))
        ));
    }

    #[tokio::test]
    async fn update_post_sends_query_and_body() {
        let app = Router::new().route(
            "/api/posts/:id",
            put(
                |Path(id): Path<String>,
                 Query(q): Query<HashMap<String, String>>,
                 Json(body): Json<Value>| async move {
                    assert_eq!(id, "p1");
                    assert_eq!(q.get("content").map(String::as_str), Some("new text & more"));
                    assert_eq!(body["content"], "new text & more");
                    StatusCode::OK
                },
            ),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        api.update_post(&PostId::new("p1"), "new text & more")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn like_failure_surfaces_status() {
        let app = Router::new().route(
            "/api/posts/:id/like",
            post(|| async { StatusCode::NOT_FOUND }),
        );
        let api = client_for(&spawn_backend(app).await, Session::with_token("t"));
        let err = api.like_post(&PostId::new("gone")).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Failed to like post");
    }
}
