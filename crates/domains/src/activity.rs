//! # Activity Items
//!
//! Notification records addressed to a single user. The payload is a sum type:
//! each variant carries exactly the display data that variant needs, so an
//! item can never hold fields belonging to another kind of event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who triggered an event, as shown to the recipient.
///
/// `user_id` stays inside the process; recipients only see the labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    #[serde(skip_serializing, default)]
    pub user_id: String,
    pub display_name: Option<String>,
    pub pseudonym: Option<String>,
}

impl Actor {
    /// An actor shown to the recipient without any label.
    pub fn anonymous(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), display_name: None, pseudonym: None }
    }
}

/// The closed set of activity variants and their payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ActivityKind {
    PostCreated {
        post_id: String,
        group_id: String,
        group_name: String,
        post_snippet: String,
    },
    GroupCreated {
        group_id: String,
        group_name: String,
    },
    PostFlagged {
        post_id: String,
        group_name: String,
        post_snippet: String,
        reason: String,
    },
    PostLiked {
        post_id: String,
        post_snippet: String,
        actor: Actor,
    },
    PostCommented {
        post_id: String,
        post_snippet: String,
        comment_id: String,
        comment_snippet: String,
        actor: Actor,
    },
    MentionedInComment {
        post_id: String,
        comment_id: String,
        comment_snippet: String,
        actor: Actor,
    },
    PostNearingDeletion {
        post_id: String,
        post_snippet: String,
        deletes_at: DateTime<Utc>,
    },
    MessageNearingDeletion {
        chat_session_id: String,
        message_id: String,
        deletes_at: DateTime<Utc>,
    },
}

impl ActivityKind {
    /// Stable tag of the variant, matching its serialized `type`.
    pub fn tag(&self) -> &'static str {
        match self {
            ActivityKind::PostCreated { .. } => "post_created",
            ActivityKind::GroupCreated { .. } => "group_created",
            ActivityKind::PostFlagged { .. } => "post_flagged",
            ActivityKind::PostLiked { .. } => "post_liked",
            ActivityKind::PostCommented { .. } => "post_commented",
            ActivityKind::MentionedInComment { .. } => "mentioned_in_comment",
            ActivityKind::PostNearingDeletion { .. } => "post_nearing_deletion",
            ActivityKind::MessageNearingDeletion { .. } => "message_nearing_deletion",
        }
    }

    /// One-line description for notification lists.
    pub fn headline(&self) -> String {
        match self {
            ActivityKind::PostCreated { group_name, .. } => {
                format!("You posted in {}", group_name)
            }
            ActivityKind::GroupCreated { group_name, .. } => {
                format!("You created the group {}", group_name)
            }
            ActivityKind::PostFlagged { reason, .. } => {
                format!("Your post was flagged: {}", reason)
            }
            ActivityKind::PostLiked { actor, .. } => {
                format!("{} liked your post", actor_label(actor))
            }
            ActivityKind::PostCommented { actor, .. } => {
                format!("{} commented on your post", actor_label(actor))
            }
            ActivityKind::MentionedInComment { actor, .. } => {
                format!("{} mentioned you in a comment", actor_label(actor))
            }
            ActivityKind::PostNearingDeletion { deletes_at, .. } => {
                format!("Your post will be deleted at {}", deletes_at.format("%Y-%m-%d %H:%M UTC"))
            }
            ActivityKind::MessageNearingDeletion { deletes_at, .. } => {
                format!("A message will be deleted at {}", deletes_at.format("%Y-%m-%d %H:%M UTC"))
            }
        }
    }
}

fn actor_label(actor: &Actor) -> &str {
    actor
        .pseudonym
        .as_deref()
        .or(actor.display_name.as_deref())
        .unwrap_or("Someone")
}

/// A notification for one user. Only `is_read` ever changes, and only false -> true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    #[serde(flatten)]
    pub kind: ActivityKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_under_variant_tag() {
        let item = ActivityItem {
            id: "a1".into(),
            user_id: "u1".into(),
            timestamp: Utc::now(),
            is_read: false,
            kind: ActivityKind::GroupCreated {
                group_id: "g1".into(),
                group_name: "Tech".into(),
            },
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "group_created");
        assert_eq!(json["data"]["group_name"], "Tech");
        assert!(json["data"].get("post_id").is_none());
        assert_eq!(json["isRead"], false);
    }

    #[test]
    fn test_headline_prefers_pseudonym() {
        let kind = ActivityKind::PostLiked {
            post_id: "p1".into(),
            post_snippet: "hello".into(),
            actor: Actor {
                user_id: "u2".into(),
                display_name: Some("Real Name".into()),
                pseudonym: Some("Quiet_Otter".into()),
            },
        };
        assert_eq!(kind.headline(), "Quiet_Otter liked your post");
        assert_eq!(kind.tag(), "post_liked");
    }

    #[test]
    fn test_actor_user_id_is_not_serialized() {
        let kind = ActivityKind::PostCommented {
            post_id: "p1".into(),
            post_snippet: "hello".into(),
            comment_id: "c1".into(),
            comment_snippet: "nice".into(),
            actor: Actor {
                user_id: "secret-user".into(),
                display_name: None,
                pseudonym: Some("Quiet_Otter".into()),
            },
        };
        let json = serde_json::to_value(&kind).unwrap();
        let actor = &json["data"]["actor"];
        assert!(actor.get("userId").is_none());
        assert_eq!(actor["pseudonym"], "Quiet_Otter");
        assert!(!json.to_string().contains("secret-user"));
    }

    #[test]
    fn test_anonymous_actor_has_no_label() {
        let kind = ActivityKind::PostLiked {
            post_id: "p1".into(),
            post_snippet: "hello".into(),
            actor: Actor::anonymous("u2"),
        };
        assert_eq!(kind.headline(), "Someone liked your post");
    }
}
