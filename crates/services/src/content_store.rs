//! # Content Store
//!
//! The in-memory aggregate that owns every collection: users, groups, posts,
//! comments, reactions, chat sessions, messages and activity. All mutation
//! goes through the methods on [`ContentStore`]; callers only ever receive
//! clones.
//!
//! Chat operations live in `chat.rs` and activity bookkeeping in
//! `activity.rs`; both extend this type.

use std::collections::HashMap;

use domains::{
    ActivityItem, Actor, AppError, ChatSession, Comment, Group, Message, Post, Reaction, Result,
    User,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::activity::DomainEvent;
use crate::pseudonym::generate_pseudonym;
use crate::views;

static MENTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)@([A-Za-z0-9_\-]+)").expect("mention pattern is valid")
});

/// Length bounds applied before any insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreLimits {
    pub group_name_min: usize,
    pub group_name_max: usize,
    pub group_description_min: usize,
    pub group_description_max: usize,
    pub post_text_max: usize,
    pub link_title_max: usize,
    pub comment_text_max: usize,
    pub message_text_max: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            group_name_min: 3,
            group_name_max: 50,
            group_description_min: 10,
            group_description_max: 300,
            post_text_max: 5000,
            link_title_max: 200,
            comment_text_max: 2000,
            message_text_max: 2000,
        }
    }
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(AppError::ValidationError(format!(
            "{} must be between {} and {} characters (got {})",
            field, min, max, len
        )));
    }
    Ok(())
}

fn check_max(field: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(AppError::ValidationError(format!(
            "{} must be at most {} characters",
            field, max
        ))),
        _ => Ok(()),
    }
}

/// The process-wide social content aggregate.
#[derive(Debug, Default)]
pub struct ContentStore {
    pub(crate) limits: StoreLimits,
    pub(crate) users: HashMap<String, User>,
    pub(crate) groups: Vec<Group>,
    pub(crate) posts: Vec<Post>,
    pub(crate) comments: Vec<Comment>,
    /// (post_id, user_id) -> the user's current reaction on that post
    pub(crate) reactions: HashMap<(String, String), Reaction>,
    pub(crate) chat_sessions: Vec<ChatSession>,
    /// Unordered participant pair -> session id
    pub(crate) chat_index: HashMap<(String, String), String>,
    pub(crate) messages: HashMap<String, Vec<Message>>,
    pub(crate) activity: Vec<ActivityItem>,
}

impl ContentStore {
    pub fn new(limits: StoreLimits) -> Self {
        Self { limits, ..Default::default() }
    }

    pub fn limits(&self) -> &StoreLimits {
        &self.limits
    }

    // --- Users ---

    /// Records (or refreshes) an identity handed over by the authentication collaborator.
    pub fn register_user(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn get_user_by_id(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).cloned()
    }

    // --- Groups ---

    /// Inserts a group after validating name and description lengths.
    /// Rejects an id already in use.
    pub fn add_group(&mut self, group: Group) -> Result<Group> {
        let limits = &self.limits;
        check_len("group name", &group.name, limits.group_name_min, limits.group_name_max)?;
        check_len(
            "group description",
            &group.description,
            limits.group_description_min,
            limits.group_description_max,
        )?;
        if self.groups.iter().any(|g| g.id == group.id) {
            warn!(group_id = %group.id, "group id collision");
            return Err(AppError::Conflict(format!("group {} already exists", group.id)));
        }

        info!(group_id = %group.id, name = %group.name, "group created");
        self.groups.push(group.clone());
        self.record(DomainEvent::GroupCreated(&group));
        Ok(group)
    }

    pub fn get_group_by_id(&self, group_id: &str) -> Option<Group> {
        views::group_by_id(&self.groups, group_id).cloned()
    }

    /// Groups in creation order.
    pub fn list_groups(&self) -> Vec<Group> {
        self.groups.clone()
    }

    // --- Posts ---

    /// Inserts a post that already passed moderation.
    ///
    /// Fills in a pseudonym when missing, copies the group name from the
    /// owning group and bumps that group's post count.
    pub fn add_post(&mut self, mut post: Post) -> Result<Post> {
        if !post.has_content() {
            warn!(post_id = %post.id, "post rejected: no content");
            return Err(AppError::ValidationError(
                "post needs text, an image or a link".to_string(),
            ));
        }
        check_max("post text", post.text.as_deref(), self.limits.post_text_max)?;
        check_max("link title", post.link_title.as_deref(), self.limits.link_title_max)?;
        if self.posts.iter().any(|p| p.id == post.id) {
            return Err(AppError::Conflict(format!("post {} already exists", post.id)));
        }

        if post.pseudonym.trim().is_empty() {
            post.pseudonym = generate_pseudonym();
        }
        match self.groups.iter_mut().find(|g| g.id == post.group_id) {
            Some(group) => {
                post.group_name = group.name.clone();
                group.post_count = Some(group.post_count.unwrap_or(0) + 1);
            }
            None => warn!(post_id = %post.id, group_id = %post.group_id, "post stored for unknown group"),
        }

        info!(post_id = %post.id, group_id = %post.group_id, "post created");
        self.posts.push(post.clone());
        self.record(DomainEvent::PostCreated(&post));
        Ok(post)
    }

    pub fn get_post_by_id(&self, post_id: &str) -> Option<Post> {
        self.posts.iter().find(|p| p.id == post_id).cloned()
    }

    /// All posts, newest first.
    pub fn get_all_posts(&self) -> Vec<Post> {
        views::posts_newest_first(&self.posts)
    }

    /// Posts of one group, newest first; empty for unknown groups.
    pub fn get_posts_by_group_id(&self, group_id: &str) -> Vec<Post> {
        views::posts_in_group(&self.posts, group_id)
    }

    fn post_index(&self, post_id: &str) -> Result<usize> {
        self.posts
            .iter()
            .position(|p| p.id == post_id)
            .ok_or_else(|| AppError::not_found("Post", post_id))
    }

    // --- Reactions ---

    /// Overwrites both counters with caller-computed values (last writer wins).
    ///
    /// The caller is responsible for the like/dislike exclusion; prefer
    /// [`ContentStore::react`], which resolves counts inside the store.
    pub fn update_post_reactions(
        &mut self,
        post_id: &str,
        likes: u32,
        dislikes: u32,
        acting_user_id: &str,
    ) -> Result<Post> {
        let idx = self.post_index(post_id)?;
        let post = &mut self.posts[idx];
        let gained_like = likes > post.likes;
        post.likes = likes;
        post.dislikes = dislikes;
        let post = post.clone();
        info!(post_id, likes, dislikes, acting_user_id, "post reactions overwritten");

        if gained_like {
            let actor = Actor::anonymous(acting_user_id);
            self.record(DomainEvent::PostLiked { post: &post, actor: &actor });
        }
        Ok(post)
    }

    /// Toggles `user_id`'s reaction on a post and returns the updated post.
    ///
    /// Repeating the current reaction removes it; choosing the opposite one
    /// moves the vote. A user never counts towards both totals.
    pub fn react(&mut self, post_id: &str, user_id: &str, reaction: Reaction) -> Result<Post> {
        let idx = self.post_index(post_id)?;
        let key = (post_id.to_string(), user_id.to_string());
        let previous = self.reactions.get(&key).copied();

        let post = &mut self.posts[idx];
        match previous {
            Some(Reaction::Like) => post.likes = post.likes.saturating_sub(1),
            Some(Reaction::Dislike) => post.dislikes = post.dislikes.saturating_sub(1),
            None => {}
        }
        let current = if previous == Some(reaction) { None } else { Some(reaction) };
        match current {
            Some(Reaction::Like) => post.likes = post.likes.saturating_add(1),
            Some(Reaction::Dislike) => post.dislikes = post.dislikes.saturating_add(1),
            None => {}
        }
        let post = post.clone();

        match current {
            Some(r) => {
                self.reactions.insert(key, r);
            }
            None => {
                self.reactions.remove(&key);
            }
        }
        info!(post_id, user_id, ?current, likes = post.likes, dislikes = post.dislikes, "reaction applied");

        if current == Some(Reaction::Like) {
            let actor = Actor::anonymous(user_id);
            self.record(DomainEvent::PostLiked { post: &post, actor: &actor });
        }
        Ok(post)
    }

    pub fn reaction_of(&self, post_id: &str, user_id: &str) -> Option<Reaction> {
        self.reactions
            .get(&(post_id.to_string(), user_id.to_string()))
            .copied()
    }

    // --- Moderation outcome ---

    /// Marks a stored post as flagged and tells its author why.
    pub fn flag_post(&mut self, post_id: &str, reason: &str) -> Result<Post> {
        let idx = self.post_index(post_id)?;
        let post = &mut self.posts[idx];
        post.is_flagged = true;
        post.flag_reason = Some(reason.to_string());
        let post = post.clone();
        warn!(post_id, reason, "post flagged");
        self.record(DomainEvent::PostFlagged { post: &post, reason });
        Ok(post)
    }

    // --- Comments ---

    /// Stores a comment, bumps the post's comment count and notifies the
    /// post author plus every registered user mentioned as `@user_id`.
    pub fn add_comment(&mut self, mut comment: Comment) -> Result<Comment> {
        let text = comment.text.trim();
        if text.is_empty() {
            return Err(AppError::ValidationError("comment text is empty".to_string()));
        }
        check_max("comment text", Some(text), self.limits.comment_text_max)?;
        let idx = self.post_index(&comment.post_id)?;
        if let Some(parent) = comment.parent_comment_id.as_deref() {
            if !self.comments.iter().any(|c| c.id == parent && c.post_id == comment.post_id) {
                return Err(AppError::not_found("Comment", parent));
            }
        }

        if comment.pseudonym.trim().is_empty() {
            comment.pseudonym = generate_pseudonym();
        }
        comment.replies.clear();
        comment.mentions = MENTION_RE
            .captures_iter(&comment.text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|id| self.users.contains_key(id))
            .collect();

        self.posts[idx].comment_count += 1;
        let post = self.posts[idx].clone();
        info!(comment_id = %comment.id, post_id = %post.id, mentions = comment.mentions.len(), "comment added");
        self.comments.push(comment.clone());

        self.record(DomainEvent::PostCommented { post: &post, comment: &comment });
        for user_id in &comment.mentions {
            self.record(DomainEvent::Mentioned { post: &post, comment: &comment, user_id });
        }
        Ok(comment)
    }

    /// Comment tree of a post, oldest first.
    pub fn comments_for_post(&self, post_id: &str) -> Vec<Comment> {
        views::comment_tree(&self.comments, post_id)
    }
}
