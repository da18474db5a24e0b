//! Records exchanged verbatim with the SkillSync backend.
//!
//! Field names follow the backend's camelCase JSON. The backend is a Java
//! service that happily serializes `null` for unset strings and lists, so
//! most fields go through [`null_as_default`] instead of failing the whole
//! payload. Anything the UI genuinely depends on is enforced afterwards by
//! [`Wellformed::check`] at the HTTP boundary.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::MEDIA_PATH;
use crate::error::PayloadError;
use crate::progress::{completion_percent, Checkable};
use crate::types::{MediaId, PlanId, PostId, ProgressId, UserId};

// ---------------------------------------------------------------------------
// Shape checks
// ---------------------------------------------------------------------------

/// Post-decode shape validation applied to every backend response.
pub trait Wellformed {
    fn check(&self) -> Result<(), PayloadError>;
}

impl<T: Wellformed> Wellformed for Vec<T> {
    fn check(&self) -> Result<(), PayloadError> {
        self.iter().try_for_each(Wellformed::check)
    }
}

fn require(entity: &'static str, field: &'static str, value: &str) -> Result<(), PayloadError> {
    if value.trim().is_empty() {
        return Err(PayloadError::MissingField { entity, field });
    }
    Ok(())
}

/// Deserialize `null` as `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept zone-less (`2025-04-18T09:30:00.123`) and RFC 3339 timestamps;
/// anything else is dropped rather than failing the record.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        s.parse::<NaiveDateTime>()
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(&s).ok().map(|dt| dt.naive_utc()))
    }))
}

/// `@` followed by the local part of an email address.
pub fn handle_for(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    format!("@{local}")
}

/// Relative media path for an uploaded file, e.g. `/posts/media/abc`.
pub fn media_path(id: &MediaId) -> String {
    format!("{MEDIA_PATH}/{id}")
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub followers: Vec<FollowRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub following: Vec<FollowRef>,
}

impl User {
    pub fn handle(&self) -> String {
        handle_for(&self.email)
    }

    pub fn following_ids(&self) -> Vec<UserId> {
        self.following.iter().map(|f| f.user_id().clone()).collect()
    }
}

impl Wellformed for User {
    fn check(&self) -> Result<(), PayloadError> {
        require("User", "id", self.id.as_str())
    }
}

/// Entry of a user's followers/following list. Older backend builds send
/// bare user ids, newer ones send an object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FollowRef {
    Id(UserId),
    Info(FollowInfo),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FollowInfo {
    #[serde(alias = "id")]
    pub user_id: UserId,
    #[serde(default)]
    pub name: Option<String>,
}

impl FollowRef {
    pub fn user_id(&self) -> &UserId {
        match self {
            FollowRef::Id(id) => id,
            FollowRef::Info(info) => &info.user_id,
        }
    }
}

/// `PUT /users/me` body. A blank password keeps the current one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Google access token handed back by the OAuth popup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoogleCredential {
    pub credential: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Wellformed for AuthResponse {
    fn check(&self) -> Result<(), PayloadError> {
        require("AuthResponse", "token", &self.token)
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: PostId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: UserId,
    /// Embedded author, when the backend includes it.
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_ids: Vec<MediaId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub video_id: Option<MediaId>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub liked_by: Vec<UserId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

impl Post {
    /// Fill `image_urls` / `video_url` from the media ids when the backend
    /// only returned ids. `url_for` maps an id to its URL, [`media_path`]
    /// gives the path under the API root.
    pub fn with_media_urls(mut self, url_for: impl Fn(&MediaId) -> String) -> Self {
        if self.image_urls.is_empty() {
            self.image_urls = self.image_ids.iter().map(&url_for).collect();
        }
        if self.video_url.is_none() {
            self.video_url = self.video_id.as_ref().map(&url_for);
        }
        self
    }

    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.liked_by.contains(user)
    }

    pub fn is_authored_by(&self, user: &UserId) -> bool {
        !user.is_empty() && &self.user_id == user
    }

    pub fn author_name(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or_default()
    }

    pub fn author_handle(&self) -> Option<String> {
        self.user.as_ref().map(User::handle)
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

impl Wellformed for Post {
    fn check(&self) -> Result<(), PayloadError> {
        require("Post", "id", self.id.as_str())?;
        if self.liked_by.len() > self.likes_count as usize {
            return Err(PayloadError::OutOfRange {
                entity: "Post",
                field: "likesCount",
                detail: format!(
                    "{} likes but {} entries in likedBy",
                    self.likes_count,
                    self.liked_by.len()
                ),
            });
        }
        Ok(())
    }
}

/// Comments are append-only and kept in backend order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: UserId,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

// ---------------------------------------------------------------------------
// Learning plans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LearningPlan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: PlanId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<String>,
}

impl Wellformed for LearningPlan {
    fn check(&self) -> Result<(), PayloadError> {
        require("LearningPlan", "id", self.id.as_str())?;
        require("LearningPlan", "name", &self.name)
    }
}

/// Body of `POST /learningplans` and `PUT /learningplans/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LearningPlanDraft {
    pub name: String,
    pub description: String,
    pub topics: Vec<String>,
    pub resources: Vec<String>,
}

// ---------------------------------------------------------------------------
// Learning progress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

impl Checkable for Topic {
    fn is_completed(&self) -> bool {
        self.completed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Free-form kind label ("video", "article", ...).
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgress {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: ProgressId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<Topic>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<Resource>,
    /// Percentage as last persisted. Display code should prefer
    /// [`LearningProgress::percent`], which is derived from `topics`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: u32,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

impl LearningProgress {
    pub fn percent(&self) -> u8 {
        completion_percent(&self.topics)
    }

    pub fn topic(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }
}

impl Wellformed for LearningProgress {
    fn check(&self) -> Result<(), PayloadError> {
        require("LearningProgress", "id", self.id.as_str())?;
        if self.progress > 100 {
            return Err(PayloadError::OutOfRange {
                entity: "LearningProgress",
                field: "progress",
                detail: format!("{} > 100", self.progress),
            });
        }
        Ok(())
    }
}

/// Body of `POST /learning-progress` and `PUT /learning-progress/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgressDraft {
    pub name: String,
    pub description: String,
    pub topics: Vec<Topic>,
    pub resources: Vec<Resource>,
    pub progress: u8,
}

impl LearningProgressDraft {
    /// Build a draft, dropping topic/resource rows whose name is blank and
    /// deriving `progress` from what remains.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        topics: &[Topic],
        resources: &[Resource],
    ) -> Self {
        let topics: Vec<Topic> = topics
            .iter()
            .filter(|t| !t.name.trim().is_empty())
            .cloned()
            .collect();
        let resources = resources
            .iter()
            .filter(|r| !r.name.trim().is_empty())
            .cloned()
            .collect();
        let progress = completion_percent(&topics);
        Self {
            name: name.into(),
            description: description.into(),
            topics,
            resources,
            progress,
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications and direct messages (no backend contract yet)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub time: String,
    pub unread: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    pub from_me: bool,
    pub text: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: u64,
    pub user: String,
    pub photo: Option<String>,
    pub last_message: String,
    pub last_time: String,
    pub messages: Vec<DirectMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_JSON: &str = r#"{
        "id": "p1",
        "userId": "u1",
        "user": {"id": "u1", "name": "Ada", "email": "ada@gmail.com", "photo": null},
        "content": "hello",
        "imageIds": ["img1", "img2"],
        "imageUrls": null,
        "videoId": null,
        "likesCount": 2,
        "likedBy": ["u2", "u3"],
        "comments": [{"userId": "u2", "content": "nice", "createdAt": "2025-04-18T09:30:00"}],
        "createdAt": "2025-04-18T08:00:00.123"
    }"#;

    #[test]
    fn decodes_backend_post_with_nulls() {
        let post: Post = serde_json::from_str(POST_JSON).unwrap();
        assert_eq!(post.id, PostId::new("p1"));
        assert!(post.image_urls.is_empty());
        assert_eq!(post.comment_count(), 1);
        assert!(post.created_at.is_some());
        assert!(post.comments[0].created_at.is_some());
        assert_eq!(post.author_handle().as_deref(), Some("@ada"));
        post.check().unwrap();
    }

    #[test]
    fn media_urls_are_derived_from_ids() {
        let post: Post = serde_json::from_str(POST_JSON).unwrap();
        let post = post.with_media_urls(media_path);
        assert_eq!(post.image_urls, vec!["/posts/media/img1", "/posts/media/img2"]);
        assert_eq!(post.video_url, None);
    }

    #[test]
    fn backend_supplied_urls_are_kept() {
        let mut post: Post = serde_json::from_str(POST_JSON).unwrap();
        post.image_urls = vec!["/custom/1".into()];
        post.video_id = Some(MediaId::new("v1"));
        let post = post.with_media_urls(media_path);
        assert_eq!(post.image_urls, vec!["/custom/1"]);
        assert_eq!(post.video_url.as_deref(), Some("/posts/media/v1"));
    }

    #[test]
    fn post_without_id_is_rejected() {
        let post: Post = serde_json::from_str(r#"{"content": "orphan"}"#).unwrap();
        assert_eq!(
            post.check(),
            Err(PayloadError::MissingField {
                entity: "Post",
                field: "id"
            })
        );
    }

    #[test]
    fn likes_count_must_cover_liked_by() {
        let post: Post =
            serde_json::from_str(r#"{"id": "p", "likesCount": 1, "likedBy": ["a", "b"]}"#).unwrap();
        assert!(matches!(post.check(), Err(PayloadError::OutOfRange { .. })));
    }

    #[test]
    fn authorship_and_likes() {
        let post: Post = serde_json::from_str(POST_JSON).unwrap();
        assert!(post.is_authored_by(&UserId::new("u1")));
        assert!(!post.is_authored_by(&UserId::default()));
        assert!(post.is_liked_by(&UserId::new("u2")));
        assert!(!post.is_liked_by(&UserId::new("u1")));
    }

    #[test]
    fn follow_refs_accept_ids_and_objects() {
        let user: User = serde_json::from_str(
            r#"{"id": "me", "name": "Me", "email": "me@x.io",
                "following": ["a", {"userId": "b"}, {"id": "c", "name": "C"}]}"#,
        )
        .unwrap();
        let ids: Vec<_> = user.following_ids().into_iter().map(|i| i.0).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn progress_draft_drops_blank_rows_and_derives_percent() {
        let topics = vec![
            Topic { name: "Borrowing".into(), completed: true, notes: String::new() },
            Topic { name: "  ".into(), completed: true, notes: String::new() },
            Topic { name: "Lifetimes".into(), completed: false, notes: String::new() },
        ];
        let resources = vec![Resource::default()];
        let draft = LearningProgressDraft::new("Rust", "book", &topics, &resources);
        assert_eq!(draft.topics.len(), 2);
        assert!(draft.resources.is_empty());
        assert_eq!(draft.progress, 50);
    }

    #[test]
    fn resource_kind_maps_to_type() {
        let r = Resource { name: "Book".into(), url: "https://doc.rust-lang.org/book".into(), kind: "book".into() };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["type"], "book");
    }

    #[test]
    fn progress_over_100_is_rejected() {
        let p: LearningProgress = serde_json::from_str(r#"{"id": "x", "progress": 140}"#).unwrap();
        assert!(p.check().is_err());
    }

    #[test]
    fn profile_update_omits_blank_password() {
        let update = ProfileUpdate { name: "A".into(), email: "a@b.co".into(), password: None };
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("password").is_none());
    }
}
