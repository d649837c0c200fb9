//! # Domain Models
//!
//! These structs represent the core entities of UnFiltered.
//! Identifiers are random UUID v4 strings: there is no central allocator,
//! so uniqueness comes from 122 bits of randomness rather than a counter.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a collision-resistant identifier for any entity.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Shortens text for denormalized previews (activity payloads, chat list).
pub fn snippet(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

fn is_filled(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Identity as supplied by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), display_name: None, photo_url: None }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// A topic space posts are published into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Maintained by the store on every post insert
    pub post_count: Option<u64>,
    /// Seed data only; never reconciled
    pub member_count: Option<u64>,
    pub creator_id: Option<String>,
    pub background_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// A group with a freshly generated identifier.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(new_id(), name, description)
    }

    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            post_count: None,
            member_count: None,
            creator_id: None,
            background_image: None,
            created_at: Utc::now(),
        }
    }

    pub fn created_by(mut self, user_id: impl Into<String>) -> Self {
        self.creator_id = Some(user_id.into());
        self
    }
}

/// The fundamental unit of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub group_id: String,
    /// Copied from the owning group when the post is stored
    pub group_name: String,
    /// Always present once stored; generated if the caller left it empty
    pub pseudonym: String,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub link_url: Option<String>,
    pub link_title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub likes: u32,
    pub dislikes: u32,
    pub comment_count: u32,
    pub is_flagged: bool,
    pub flag_reason: Option<String>,
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub is_anonymous: bool,
}

impl Post {
    /// An empty, anonymous post skeleton. Content is attached with the `with_*` helpers.
    pub fn new(
        id: impl Into<String>,
        group_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            group_name: String::new(),
            pseudonym: String::new(),
            text: None,
            image_url: None,
            video_url: None,
            audio_url: None,
            link_url: None,
            link_title: None,
            created_at,
            likes: 0,
            dislikes: 0,
            comment_count: 0,
            is_flagged: false,
            flag_reason: None,
            user_id: None,
            display_name: None,
            photo_url: None,
            is_anonymous: true,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_link(mut self, url: impl Into<String>, title: Option<String>) -> Self {
        self.link_url = Some(url.into());
        self.link_title = title;
        self
    }

    /// Attributes the post to `user`. The identity is kept even for anonymous
    /// posts so that activity can be routed to the author.
    pub fn by(mut self, user: &User, anonymous: bool) -> Self {
        self.user_id = Some(user.id.clone());
        self.display_name = user.display_name.clone();
        self.photo_url = user.photo_url.clone();
        self.is_anonymous = anonymous;
        self
    }

    /// At least one of text, image or link must be non-blank.
    pub fn has_content(&self) -> bool {
        is_filled(&self.text) || is_filled(&self.image_url) || is_filled(&self.link_url)
    }

    /// Short human-readable preview used in activity payloads.
    pub fn preview(&self) -> String {
        let source = self
            .text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(self.link_title.as_deref())
            .or(self.link_url.as_deref())
            .unwrap_or("[media]");
        snippet(source, 80)
    }

    /// Copy safe to hand to other users: real identity stripped when anonymous.
    pub fn redacted(&self) -> Post {
        let mut post = self.clone();
        if post.is_anonymous {
            post.user_id = None;
            post.display_name = None;
            post.photo_url = None;
        }
        post
    }
}

/// Input for publishing a post; the id, timestamp and pseudonym are assigned on publish.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub group_id: String,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub link_url: Option<String>,
    pub link_title: Option<String>,
    #[serde(default = "default_anonymous")]
    pub is_anonymous: bool,
}

fn default_anonymous() -> bool {
    true
}

impl PostDraft {
    /// Everything the moderation collaborator must judge, link included.
    pub fn moderation_text(&self) -> String {
        [self.text.as_deref(), self.link_title.as_deref(), self.link_url.as_deref()]
            .into_iter()
            .flatten()
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn into_post(self, author: Option<&User>, pseudonym: String, created_at: DateTime<Utc>) -> Post {
        let mut post = Post::new(new_id(), self.group_id, created_at);
        post.pseudonym = pseudonym;
        post.text = self.text;
        post.image_url = self.image_url;
        post.video_url = self.video_url;
        post.audio_url = self.audio_url;
        post.link_url = self.link_url;
        post.link_title = self.link_title;
        match author {
            Some(user) => post.by(user, self.is_anonymous),
            None => post,
        }
    }
}

/// A reply on a post. Replies to other comments nest through `parent_comment_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub parent_comment_id: Option<String>,
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub pseudonym: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub likes: u32,
    pub dislikes: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Comment>,
    /// User ids resolved from `@handle` tokens in the text
    #[serde(default)]
    pub mentions: BTreeSet<String>,
    pub is_anonymous: bool,
}

impl Comment {
    pub fn new(post_id: impl Into<String>, author: &User, text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            post_id: post_id.into(),
            parent_comment_id: None,
            user_id: Some(author.id.clone()),
            display_name: author.display_name.clone(),
            pseudonym: String::new(),
            text: text.into(),
            created_at: Utc::now(),
            likes: 0,
            dislikes: 0,
            replies: Vec::new(),
            mentions: BTreeSet::new(),
            is_anonymous: true,
        }
    }

    pub fn replying_to(mut self, comment_id: impl Into<String>) -> Self {
        self.parent_comment_id = Some(comment_id.into());
        self
    }

    pub fn is_by(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }

    /// Same as [`Post::redacted`], applied to the whole reply tree.
    pub fn redacted(&self) -> Comment {
        let mut comment = self.clone();
        if comment.is_anonymous {
            comment.user_id = None;
            comment.display_name = None;
        }
        comment.replies = self.replies.iter().map(Comment::redacted).collect();
        comment
    }
}

/// A like or a dislike; a user holds at most one per post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Like,
    Dislike,
}

/// A single chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub chat_session_id: String,
    pub sender_id: String,
    /// The sender's pseudonym bound to this chat session
    pub sender_pseudonym: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// The post that prompted the conversation, if any
    pub post_id_context: Option<String>,
}

/// Denormalized preview of the latest message in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A two-party conversation keyed by its unordered participant pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    /// Sorted, so `(a, b)` and `(b, a)` produce the same value
    pub participants: [String; 2],
    /// Participant id -> pseudonym valid for this session only
    pub pseudonyms: BTreeMap<String, String>,
    pub last_message: Option<LastMessage>,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Canonical ordering of a participant pair.
    pub fn pair_key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    pub fn pseudonym_of(&self, user_id: &str) -> Option<&str> {
        self.pseudonyms.get(user_id).map(String::as_str)
    }

    /// The participant that is not `user_id`.
    pub fn peer_of(&self, user_id: &str) -> Option<&str> {
        if !self.has_participant(user_id) {
            return None;
        }
        self.participants
            .iter()
            .find(|p| p.as_str() != user_id)
            .map(String::as_str)
    }
}
