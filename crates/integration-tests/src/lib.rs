//! Shared fixtures for the cross-crate scenario tests.

use chrono::{DateTime, Duration, Utc};
use domains::{Group, Post, User};
use services::ContentStore;

pub const TECH: &str = "g1";
pub const COOKING: &str = "g3";

/// A store holding two groups and nothing else.
pub fn seeded_store() -> ContentStore {
    let mut store = ContentStore::default();
    store
        .add_group(Group::with_id(TECH, "Tech", "Gadgets, code and everything in between"))
        .expect("seed group");
    store
        .add_group(Group::with_id(COOKING, "Cooking", "Recipes and kitchen disasters"))
        .expect("seed group");
    store
}

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(minutes)
}

pub fn text_post(id: &str, group_id: &str, created_at: DateTime<Utc>, author: &str) -> Post {
    Post::new(id, group_id, created_at)
        .with_text(format!("post {}", id))
        .by(&User::new(author), true)
}
