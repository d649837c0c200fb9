//! Activity layer: turns domain events into notification records and tracks
//! their read state.
//!
//! The event-to-item mapping is a pure function; the store only decides when
//! an event happened and appends whatever [`activity_for`] returns.

use chrono::Utc;
use domains::{new_id, snippet, Actor, ActivityItem, ActivityKind, Comment, Group, Post};
use tracing::{debug, info};

use crate::content_store::ContentStore;

/// Something that happened inside the store and may concern a user.
#[derive(Debug, Clone, Copy)]
pub enum DomainEvent<'a> {
    PostCreated(&'a Post),
    GroupCreated(&'a Group),
    PostFlagged { post: &'a Post, reason: &'a str },
    PostLiked { post: &'a Post, actor: &'a Actor },
    PostCommented { post: &'a Post, comment: &'a Comment },
    Mentioned { post: &'a Post, comment: &'a Comment, user_id: &'a str },
}

fn comment_actor(comment: &Comment) -> Actor {
    Actor {
        user_id: comment.user_id.clone().unwrap_or_default(),
        display_name: if comment.is_anonymous { None } else { comment.display_name.clone() },
        pseudonym: Some(comment.pseudonym.clone()),
    }
}

/// Recipient and payload for an event, or `None` when nobody should be told
/// (unknown author, or a user reacting to their own content).
pub fn activity_for(event: DomainEvent<'_>) -> Option<(String, ActivityKind)> {
    match event {
        DomainEvent::PostCreated(post) => Some((
            post.user_id.clone()?,
            ActivityKind::PostCreated {
                post_id: post.id.clone(),
                group_id: post.group_id.clone(),
                group_name: post.group_name.clone(),
                post_snippet: post.preview(),
            },
        )),
        DomainEvent::GroupCreated(group) => Some((
            group.creator_id.clone()?,
            ActivityKind::GroupCreated {
                group_id: group.id.clone(),
                group_name: group.name.clone(),
            },
        )),
        DomainEvent::PostFlagged { post, reason } => Some((
            post.user_id.clone()?,
            ActivityKind::PostFlagged {
                post_id: post.id.clone(),
                group_name: post.group_name.clone(),
                post_snippet: post.preview(),
                reason: reason.to_string(),
            },
        )),
        DomainEvent::PostLiked { post, actor } => {
            let author = post.user_id.clone()?;
            if author == actor.user_id {
                return None;
            }
            Some((
                author,
                ActivityKind::PostLiked {
                    post_id: post.id.clone(),
                    post_snippet: post.preview(),
                    actor: actor.clone(),
                },
            ))
        }
        DomainEvent::PostCommented { post, comment } => {
            let author = post.user_id.clone()?;
            if comment.is_by(&author) {
                return None;
            }
            Some((
                author,
                ActivityKind::PostCommented {
                    post_id: post.id.clone(),
                    post_snippet: post.preview(),
                    comment_id: comment.id.clone(),
                    comment_snippet: snippet(&comment.text, 80),
                    actor: comment_actor(comment),
                },
            ))
        }
        DomainEvent::Mentioned { post, comment, user_id } => {
            if comment.is_by(user_id) {
                return None;
            }
            Some((
                user_id.to_string(),
                ActivityKind::MentionedInComment {
                    post_id: post.id.clone(),
                    comment_id: comment.id.clone(),
                    comment_snippet: snippet(&comment.text, 80),
                    actor: comment_actor(comment),
                },
            ))
        }
    }
}

impl ContentStore {
    /// Appends an unread item for `user_id` stamped with the current time.
    pub fn add_activity_item(&mut self, user_id: &str, kind: ActivityKind) -> ActivityItem {
        let item = ActivityItem {
            id: new_id(),
            user_id: user_id.to_string(),
            timestamp: Utc::now(),
            is_read: false,
            kind,
        };
        info!(activity_id = %item.id, user_id, kind = item.kind.tag(), "activity recorded");
        self.activity.push(item.clone());
        item
    }

    /// Records the activity an event implies, if any.
    pub(crate) fn record(&mut self, event: DomainEvent<'_>) -> Option<ActivityItem> {
        let (user_id, kind) = activity_for(event)?;
        Some(self.add_activity_item(&user_id, kind))
    }

    /// Flips an item to read. Unknown ids and already-read items are left alone.
    pub fn mark_as_read(&mut self, activity_id: &str) {
        match self.activity.iter_mut().find(|a| a.id == activity_id) {
            Some(item) if !item.is_read => {
                item.is_read = true;
                debug!(activity_id, "activity marked as read");
            }
            Some(_) => {}
            None => debug!(activity_id, "mark_as_read on unknown activity ignored"),
        }
    }

    /// Marks every item of `user_id` as read; returns how many changed.
    pub fn mark_all_as_read(&mut self, user_id: &str) -> usize {
        let mut changed = 0;
        for item in self.activity.iter_mut().filter(|a| a.user_id == user_id && !a.is_read) {
            item.is_read = true;
            changed += 1;
        }
        changed
    }

    pub fn activity_for_user(&self, user_id: &str) -> Vec<ActivityItem> {
        crate::views::activity_for_user(&self.activity, user_id)
    }

    pub fn get_activity_item(&self, activity_id: &str) -> Option<ActivityItem> {
        self.activity.iter().find(|a| a.id == activity_id).cloned()
    }

    pub fn unread_count(&self, user_id: &str) -> usize {
        self.activity
            .iter()
            .filter(|a| a.user_id == user_id && !a.is_read)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domains::User;

    fn authored_post() -> Post {
        Post::new("p1", "g1", Utc::now())
            .with_text("hello world")
            .by(&User::new("author"), true)
    }

    #[test]
    fn test_like_by_author_is_silent() {
        let post = authored_post();
        let actor = Actor { user_id: "author".into(), display_name: None, pseudonym: None };
        assert!(activity_for(DomainEvent::PostLiked { post: &post, actor: &actor }).is_none());
    }

    #[test]
    fn test_like_by_other_notifies_author() {
        let post = authored_post();
        let actor = Actor { user_id: "fan".into(), display_name: None, pseudonym: None };
        let (recipient, kind) =
            activity_for(DomainEvent::PostLiked { post: &post, actor: &actor }).unwrap();
        assert_eq!(recipient, "author");
        assert!(matches!(kind, ActivityKind::PostLiked { ref post_id, .. } if post_id == "p1"));
    }

    #[test]
    fn test_post_without_author_has_no_recipient() {
        let post = Post::new("p1", "g1", Utc::now()).with_text("hi");
        assert!(activity_for(DomainEvent::PostCreated(&post)).is_none());
    }

    #[test]
    fn test_mark_as_read_is_idempotent() {
        let mut store = ContentStore::default();
        let item = store.add_activity_item(
            "u1",
            ActivityKind::PostNearingDeletion {
                post_id: "p1".into(),
                post_snippet: "bye".into(),
                deletes_at: Utc::now() + Duration::hours(1),
            },
        );
        assert!(!item.is_read);
        assert_eq!(store.unread_count("u1"), 1);

        store.mark_as_read(&item.id);
        store.mark_as_read(&item.id);
        store.mark_as_read("no-such-id");

        assert!(store.get_activity_item(&item.id).unwrap().is_read);
        assert_eq!(store.unread_count("u1"), 0);
    }

    #[test]
    fn test_mark_all_as_read_only_touches_one_user() {
        let mut store = ContentStore::default();
        let kind = ActivityKind::GroupCreated { group_id: "g1".into(), group_name: "Tech".into() };
        store.add_activity_item("u1", kind.clone());
        store.add_activity_item("u1", kind.clone());
        store.add_activity_item("u2", kind);

        assert_eq!(store.mark_all_as_read("u1"), 2);
        assert_eq!(store.unread_count("u1"), 0);
        assert_eq!(store.unread_count("u2"), 1);
        assert_eq!(store.activity_for_user("u1").len(), 2);
    }
}
