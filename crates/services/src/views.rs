//! Derived views over store snapshots.
//!
//! Every function here recomputes its result from the slice it is given.
//! Sorting is stable, so entities with equal timestamps keep their relative
//! order across calls against the same snapshot.

use domains::{ActivityItem, ChatSession, Comment, Group, Message, Post};

/// All posts, newest first.
pub fn posts_newest_first(posts: &[Post]) -> Vec<Post> {
    let mut sorted = posts.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

/// Posts of one group, newest first. Unknown groups yield an empty list.
pub fn posts_in_group(posts: &[Post], group_id: &str) -> Vec<Post> {
    let mut sorted: Vec<Post> = posts
        .iter()
        .filter(|p| p.group_id == group_id)
        .cloned()
        .collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

pub fn group_by_id<'a>(groups: &'a [Group], group_id: &str) -> Option<&'a Group> {
    groups.iter().find(|g| g.id == group_id)
}

/// Chat transcript, oldest first.
pub fn transcript(messages: &[Message]) -> Vec<Message> {
    let mut sorted = messages.to_vec();
    sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    sorted
}

/// Sessions `user_id` takes part in; most recent conversation first,
/// sessions that never received a message last.
pub fn sessions_for_user(sessions: &[ChatSession], user_id: &str) -> Vec<ChatSession> {
    let mut mine: Vec<ChatSession> = sessions
        .iter()
        .filter(|s| s.has_participant(user_id))
        .cloned()
        .collect();
    mine.sort_by(|a, b| {
        let a_ts = a.last_message.as_ref().map(|m| m.timestamp);
        let b_ts = b.last_message.as_ref().map(|m| m.timestamp);
        b_ts.cmp(&a_ts)
    });
    mine
}

/// Notifications addressed to `user_id`, newest first.
pub fn activity_for_user(items: &[ActivityItem], user_id: &str) -> Vec<ActivityItem> {
    let mut mine: Vec<ActivityItem> = items
        .iter()
        .filter(|a| a.user_id == user_id)
        .cloned()
        .collect();
    mine.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    mine
}

/// Builds the reply tree of a post: top-level comments oldest first,
/// each carrying its replies (also oldest first) recursively.
pub fn comment_tree(comments: &[Comment], post_id: &str) -> Vec<Comment> {
    let mut flat: Vec<&Comment> = comments.iter().filter(|c| c.post_id == post_id).collect();
    flat.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    attach_replies(&flat, None)
}

fn attach_replies(flat: &[&Comment], parent: Option<&str>) -> Vec<Comment> {
    flat.iter()
        .filter(|c| c.parent_comment_id.as_deref() == parent)
        .map(|c| {
            let mut node = (*c).clone();
            node.replies = attach_replies(flat, Some(c.id.as_str()));
            node
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use domains::User;

    fn post(id: &str, group: &str, minutes_ago: i64) -> Post {
        Post::new(id, group, Utc::now() - Duration::minutes(minutes_ago)).with_text(id)
    }

    #[test]
    fn test_posts_sorted_newest_first() {
        let posts = vec![post("old", "g1", 30), post("new", "g1", 1), post("mid", "g2", 10)];
        let ids: Vec<_> = posts_newest_first(&posts).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["new", "mid", "old"]);
    }

    #[test]
    fn test_equal_timestamps_keep_insertion_order() {
        let at = Utc::now();
        let posts = vec![
            Post::new("a", "g1", at).with_text("a"),
            Post::new("b", "g1", at).with_text("b"),
            Post::new("c", "g1", at).with_text("c"),
        ];
        let first: Vec<_> = posts_in_group(&posts, "g1").into_iter().map(|p| p.id).collect();
        let second: Vec<_> = posts_in_group(&posts, "g1").into_iter().map(|p| p.id).collect();
        assert_eq!(first, ["a", "b", "c"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_group_is_empty() {
        let posts = vec![post("p1", "g1", 0)];
        assert!(posts_in_group(&posts, "g2").is_empty());
    }

    #[test]
    fn test_comment_tree_nests_replies() {
        let user = User::new("u1");
        let root = Comment::new("p1", &user, "root");
        let reply = Comment::new("p1", &user, "reply").replying_to(root.id.clone());
        let other_post = Comment::new("p2", &user, "elsewhere");
        let tree = comment_tree(&[root.clone(), reply.clone(), other_post], "p1");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, root.id);
        assert_eq!(tree[0].replies.len(), 1);
        assert_eq!(tree[0].replies[0].id, reply.id);
    }
}
