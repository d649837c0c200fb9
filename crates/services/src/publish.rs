//! Publishing with a moderation gate.
//!
//! Content reaches the store only after the moderation collaborator returns a
//! clean verdict. The store lock is taken after the verdict arrives, so a slow
//! backend never blocks readers.

use std::sync::Arc;

use chrono::Utc;
use domains::{AppError, Comment, ContentModerator, Post, PostDraft, Result, User};
use tokio::sync::RwLock;
use tracing::{error, warn};

use crate::content_store::ContentStore;
use crate::pseudonym::generate_pseudonym;

/// The one store instance of the process, shared by every caller.
pub type SharedStore = Arc<RwLock<ContentStore>>;

pub fn shared(store: ContentStore) -> SharedStore {
    Arc::new(RwLock::new(store))
}

#[derive(Clone)]
pub struct PublishService {
    store: SharedStore,
    moderator: Arc<dyn ContentModerator>,
}

impl PublishService {
    pub fn new(store: SharedStore, moderator: Arc<dyn ContentModerator>) -> Self {
        Self { store, moderator }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    async fn screen(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let verdict = self.moderator.moderate(text).await.map_err(|e| {
            error!(error = %e, "moderation backend failed");
            AppError::Internal(format!("moderation unavailable: {}", e))
        })?;
        if !verdict.is_clean() {
            let reason = verdict.reason();
            warn!(%reason, "content rejected by moderation");
            return Err(AppError::Rejected(reason));
        }
        Ok(())
    }

    /// Moderates a draft and, when clean, stores it as a new post with a
    /// fresh id, the current time and a generated pseudonym.
    pub async fn publish_post(&self, draft: PostDraft, author: Option<&User>) -> Result<Post> {
        let post = draft
            .clone()
            .into_post(author, generate_pseudonym(), Utc::now());
        if !post.has_content() {
            return Err(AppError::ValidationError(
                "post needs text, an image or a link".to_string(),
            ));
        }

        self.screen(&draft.moderation_text()).await?;

        let mut store = self.store.write().await;
        if let Some(user) = author {
            store.register_user(user.clone());
        }
        store.add_post(post)
    }

    /// Moderates and stores a comment (or a reply when `parent_id` is set).
    pub async fn publish_comment(
        &self,
        post_id: &str,
        author: &User,
        text: &str,
        parent_id: Option<&str>,
    ) -> Result<Comment> {
        if text.trim().is_empty() {
            return Err(AppError::ValidationError("comment text is empty".to_string()));
        }
        self.screen(text).await?;

        let mut comment = Comment::new(post_id, author, text.trim());
        if let Some(parent) = parent_id {
            comment = comment.replying_to(parent);
        }
        let mut store = self.store.write().await;
        store.register_user(author.clone());
        store.add_comment(comment)
    }
}
