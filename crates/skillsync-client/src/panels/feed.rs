//! Post feed: composer, post cards, likes, edits, comments.

use skillsync_net::{MediaKind, MediaUpload, NetError};
use skillsync_shared::constants::MAX_POST_IMAGES;
use skillsync_shared::models::Post;
use skillsync_shared::types::{PostId, Section, UserId};
use skillsync_shared::validation::Schema;
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::events::AppEvent;
use crate::fetch::Remote;
use crate::form::FormController;
use crate::state::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedSource {
    /// `GET /posts`
    #[default]
    All,
    /// `GET /posts/following`
    Following,
}

impl FeedSource {
    pub fn for_section(section: Section) -> Option<Self> {
        match section {
            Section::Home => Some(FeedSource::All),
            Section::Explore => Some(FeedSource::Following),
            _ => None,
        }
    }
}

/// A post plus the card's local UI state.
#[derive(Debug, Clone, PartialEq)]
pub struct PostCard {
    pub post: Post,
    liked: bool,
    like_pending: bool,
    edit_draft: Option<String>,
    comment_draft: String,
    show_comments: bool,
}

impl PostCard {
    pub fn new(post: Post, viewer: &UserId) -> Self {
        let liked = post.is_liked_by(viewer);
        Self {
            post,
            liked,
            like_pending: false,
            edit_draft: None,
            comment_draft: String::new(),
            show_comments: false,
        }
    }

    pub fn id(&self) -> &PostId {
        &self.post.id
    }

    pub fn is_liked(&self) -> bool {
        self.liked
    }

    pub fn likes(&self) -> u32 {
        self.post.likes_count
    }

    pub fn like_pending(&self) -> bool {
        self.like_pending
    }

    pub fn can_modify(&self, viewer: &UserId) -> bool {
        self.post.is_authored_by(viewer)
    }

    pub fn is_editing(&self) -> bool {
        self.edit_draft.is_some()
    }

    pub fn edit_draft(&self) -> Option<&str> {
        self.edit_draft.as_deref()
    }

    /// Save is disabled for a blank draft.
    pub fn can_save_edit(&self) -> bool {
        self.edit_draft
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }

    pub fn comment_draft(&self) -> &str {
        &self.comment_draft
    }

    pub fn comments_visible(&self) -> bool {
        self.show_comments
    }

    /// Move the count only when the viewer's membership in `liked_by`
    /// actually changes, so a refresh that already shows the like is not
    /// counted twice.
    fn apply_like(&mut self, like: bool, viewer: &UserId) {
        self.liked = like;
        let present = self.post.liked_by.contains(viewer);
        if like && !present {
            self.post.liked_by.push(viewer.clone());
            self.post.likes_count += 1;
        } else if !like && present {
            self.post.liked_by.retain(|u| u != viewer);
            self.post.likes_count = self.post.likes_count.saturating_sub(1);
        }
    }
}

/// Pending like/unlike, obtained from [`FeedPanel::begin_like`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeIntent {
    pub post_id: PostId,
    pub like: bool,
}

/// New-post form with its media attachments. A post carries either up to
/// three images or one video.
#[derive(Debug, Clone)]
pub struct Composer {
    pub form: FormController,
    images: Vec<MediaUpload>,
    video: Option<MediaUpload>,
}

impl Default for Composer {
    fn default() -> Self {
        Self {
            form: FormController::new(Schema::post(), "Post", "Posting..."),
            images: Vec::new(),
            video: None,
        }
    }
}

impl Composer {
    pub fn images(&self) -> &[MediaUpload] {
        &self.images
    }

    pub fn video(&self) -> Option<&MediaUpload> {
        self.video.as_ref()
    }

    /// Attach an image; a selected video is dropped.
    pub fn add_image(&mut self, image: MediaUpload) -> Result<()> {
        if image.kind() != MediaKind::Image {
            return Err(ClientError::Rejected("Only image files can be added as images".into()));
        }
        if self.images.len() >= MAX_POST_IMAGES {
            return Err(ClientError::Rejected(format!(
                "You can upload up to {MAX_POST_IMAGES} images"
            )));
        }
        self.video = None;
        self.images.push(image);
        Ok(())
    }

    pub fn remove_image(&mut self, index: usize) {
        if index < self.images.len() {
            self.images.remove(index);
        }
    }

    /// Attach a video; selected images are dropped.
    pub fn set_video(&mut self, video: MediaUpload) -> Result<()> {
        if video.kind() != MediaKind::Video {
            return Err(ClientError::Rejected("Only video files can be added as video".into()));
        }
        self.images.clear();
        self.video = Some(video);
        Ok(())
    }

    pub fn clear_video(&mut self) {
        self.video = None;
    }

    fn reset_media(&mut self) {
        self.images.clear();
        self.video = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedPanel {
    source: FeedSource,
    posts: Remote<Vec<PostCard>>,
    pub composer: Composer,
}

impl FeedPanel {
    pub fn source(&self) -> FeedSource {
        self.source
    }

    pub fn set_source(&mut self, source: FeedSource) {
        self.source = source;
    }

    pub fn posts(&self) -> &Remote<Vec<PostCard>> {
        &self.posts
    }

    pub fn cards(&self) -> &[PostCard] {
        self.posts.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn card(&self, id: &PostId) -> Option<&PostCard> {
        self.cards().iter().find(|c| c.id() == id)
    }

    fn card_mut(&mut self, id: &PostId) -> Result<&mut PostCard> {
        self.posts
            .data_mut()
            .and_then(|cards| cards.iter_mut().find(|c| c.id() == id))
            .ok_or_else(|| ClientError::NotFound(format!("post {id}")))
    }

    pub fn clear(&mut self) {
        self.posts.clear();
        self.composer = Composer::default();
    }

    /// Re-fetch the feed for the current source. Comment visibility and
    /// in-flight likes of posts still present are kept.
    pub async fn refresh(&mut self, ctx: &Context, viewer: &UserId) -> Result<()> {
        self.posts.start();
        let result = match self.source {
            FeedSource::All => ctx.api.list_posts().await,
            FeedSource::Following => ctx.api.following_posts().await,
        };

        match result {
            Ok(posts) => {
                let previous = self.cards().to_vec();
                let cards: Vec<PostCard> = posts
                    .into_iter()
                    .map(|post| {
                        let mut card = PostCard::new(post, viewer);
                        if let Some(old) = previous.iter().find(|p| p.id() == card.id()) {
                            card.show_comments = old.show_comments;
                            card.like_pending = old.like_pending;
                        }
                        card
                    })
                    .collect();
                debug!(count = cards.len(), source = ?self.source, "Feed loaded");
                ctx.events.emit(AppEvent::FeedRefreshed { posts: cards.len() });
                self.posts.resolve(Ok::<_, NetError>(cards));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Error fetching posts");
                self.posts.resolve(Err::<Vec<PostCard>, _>(&e));
                Err(e.into())
            }
        }
    }

    /// Submit the composer and refresh the feed on success.
    pub async fn create_post(&mut self, ctx: &Context, viewer: &UserId) -> Result<()> {
        let values = self.composer.form.begin_submit()?;
        let content = values.get("content").cloned().unwrap_or_default();
        let images = self.composer.images.clone();
        let video = self.composer.video.clone();

        match ctx.api.create_post(content.trim(), images, video).await {
            Ok(()) => {
                info!("Post created");
                self.composer.form.finish(true);
                self.composer.reset_media();
                ctx.events.emit(AppEvent::PostCreated);
                self.refresh(ctx, viewer).await
            }
            Err(e) => {
                self.composer.form.finish(false);
                ctx.events.alert("Failed to create post");
                Err(e.into())
            }
        }
    }

    /// Mark a like/unlike as in flight. Returns `None` while a previous one
    /// for the same post is still outstanding.
    pub fn begin_like(&mut self, id: &PostId) -> Option<LikeIntent> {
        let card = self.card_mut(id).ok()?;
        if card.like_pending {
            debug!(post_id = %id, "Like already in flight");
            return None;
        }
        card.like_pending = true;
        Some(LikeIntent {
            post_id: id.clone(),
            like: !card.liked,
        })
    }

    /// Apply the backend's answer to a like/unlike. The count only moves
    /// after a confirmed call.
    pub fn finish_like(
        &mut self,
        ctx: &Context,
        intent: &LikeIntent,
        result: std::result::Result<(), NetError>,
        viewer: &UserId,
    ) -> Result<()> {
        let card = self.card_mut(&intent.post_id)?;
        card.like_pending = false;
        match result {
            Ok(()) => {
                card.apply_like(intent.like, viewer);
                Ok(())
            }
            Err(e) => {
                warn!(post_id = %intent.post_id, error = %e, "Error toggling like");
                ctx.events.alert(if intent.like {
                    "Failed to like post"
                } else {
                    "Failed to unlike post"
                });
                Err(e.into())
            }
        }
    }

    pub async fn toggle_like(&mut self, ctx: &Context, id: &PostId, viewer: &UserId) -> Result<()> {
        let intent = self.begin_like(id).ok_or(ClientError::Busy)?;
        let result = if intent.like {
            ctx.api.like_post(id).await
        } else {
            ctx.api.unlike_post(id).await
        };
        self.finish_like(ctx, &intent, result, viewer)
    }

    pub fn start_edit(&mut self, id: &PostId, viewer: &UserId) -> Result<()> {
        let card = self.card_mut(id)?;
        if !card.can_modify(viewer) {
            return Err(ClientError::Rejected("Only the author can edit this post".into()));
        }
        card.edit_draft = Some(card.post.content.clone());
        Ok(())
    }

    pub fn set_edit_draft(&mut self, id: &PostId, text: impl Into<String>) -> Result<()> {
        let card = self.card_mut(id)?;
        match card.edit_draft.as_mut() {
            Some(draft) => {
                *draft = text.into();
                Ok(())
            }
            None => Err(ClientError::Rejected("Post is not being edited".into())),
        }
    }

    pub fn cancel_edit(&mut self, id: &PostId) {
        if let Ok(card) = self.card_mut(id) {
            card.edit_draft = None;
        }
    }

    pub async fn save_edit(&mut self, ctx: &Context, id: &PostId, viewer: &UserId) -> Result<()> {
        let card = self.card_mut(id)?;
        if !card.can_save_edit() {
            return Err(ClientError::Rejected("Post text is required".into()));
        }
        let draft = card.edit_draft.clone().unwrap_or_default();

        match ctx.api.update_post(id, draft.trim()).await {
            Ok(()) => {
                info!(post_id = %id, "Post updated");
                self.cancel_edit(id);
                self.refresh(ctx, viewer).await
            }
            Err(e) => {
                warn!(post_id = %id, error = %e, "Error updating post");
                ctx.events.alert("Failed to update post");
                Err(e.into())
            }
        }
    }

    /// Delete a post; on success it disappears from the list without a
    /// re-fetch.
    pub async fn delete_post(&mut self, ctx: &Context, id: &PostId, viewer: &UserId) -> Result<()> {
        if !self.card_mut(id)?.can_modify(viewer) {
            return Err(ClientError::Rejected("Only the author can delete this post".into()));
        }
        match ctx.api.delete_post(id).await {
            Ok(()) => {
                info!(post_id = %id, "Post deleted");
                self.posts.update(|cards| cards.retain(|c| c.id() != id));
                Ok(())
            }
            Err(e) => {
                warn!(post_id = %id, error = %e, "Error deleting post");
                ctx.events.alert("Failed to delete post");
                Err(e.into())
            }
        }
    }

    pub fn toggle_comments(&mut self, id: &PostId) {
        if let Ok(card) = self.card_mut(id) {
            card.show_comments = !card.show_comments;
        }
    }

    pub fn set_comment_draft(&mut self, id: &PostId, text: impl Into<String>) {
        if let Ok(card) = self.card_mut(id) {
            card.comment_draft = text.into();
        }
    }

    pub async fn add_comment(&mut self, ctx: &Context, id: &PostId, viewer: &UserId) -> Result<()> {
        let draft = self.card_mut(id)?.comment_draft.trim().to_string();
        if draft.is_empty() {
            return Err(ClientError::Rejected("Comment cannot be empty".into()));
        }

        match ctx.api.add_comment(id, &draft).await {
            Ok(()) => {
                self.set_comment_draft(id, "");
                self.refresh(ctx, viewer).await
            }
            Err(e) => {
                warn!(post_id = %id, error = %e, "Error adding comment");
                ctx.events.alert("Failed to add comment");
                Err(e.into())
            }
        }
    }
}
