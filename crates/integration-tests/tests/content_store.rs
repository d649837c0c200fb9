use domains::{ActivityKind, AppError, Group, Post, Reaction, User};
use integration_tests::{minutes_ago, seeded_store, text_post, COOKING, TECH};
use services::ContentStore;

#[test]
fn test_group_and_post_scenario_from_empty_store() {
    let mut store = ContentStore::default();
    store
        .add_group(Group::with_id("g1", "Tech", "Everything about technology"))
        .unwrap();
    store
        .add_post(Post::new("p1", "g1", chrono::Utc::now()).with_text("hello"))
        .unwrap();

    let ids: Vec<_> = store.get_posts_by_group_id("g1").into_iter().map(|p| p.id).collect();
    assert_eq!(ids, ["p1"]);
    assert!(store.get_posts_by_group_id("g2").is_empty());
    assert!(store.get_group_by_id("g2").is_none());
}

#[test]
fn test_every_listing_is_newest_first() {
    let mut store = seeded_store();
    let ages = [12, 3, 45, 3, 0, 27];
    for (i, age) in ages.iter().enumerate() {
        let group = if i % 2 == 0 { TECH } else { COOKING };
        store
            .add_post(text_post(&format!("p{}", i), group, minutes_ago(*age), "u1"))
            .unwrap();
    }

    let check = |posts: Vec<Post>| {
        assert!(posts.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    };
    check(store.get_all_posts());
    check(store.get_posts_by_group_id(TECH));
    check(store.get_posts_by_group_id(COOKING));
    assert_eq!(store.get_all_posts().len(), ages.len());
}

#[test]
fn test_contentless_post_leaves_collection_unchanged() {
    let mut store = seeded_store();
    store.add_post(text_post("p1", TECH, minutes_ago(1), "u1")).unwrap();

    let mut empty = Post::new("p2", TECH, minutes_ago(0));
    empty.text = Some("".into());
    empty.image_url = Some("".into());
    empty.link_url = Some("".into());

    assert!(matches!(store.add_post(empty), Err(AppError::ValidationError(_))));
    assert_eq!(store.get_all_posts().len(), 1);
    assert_eq!(store.get_group_by_id(TECH).unwrap().post_count, Some(1));
}

#[test]
fn test_post_denormalizes_group_name_and_keeps_pseudonym() {
    let mut store = seeded_store();
    let mut post = text_post("p1", COOKING, minutes_ago(0), "u1");
    post.group_name = "stale".into();
    post.pseudonym = "Lucky_Otter".into();

    let stored = store.add_post(post).unwrap();
    assert_eq!(stored.group_name, "Cooking");
    assert_eq!(stored.pseudonym, "Lucky_Otter");
}

#[test]
fn test_reactions_and_activity_feed() {
    let mut store = seeded_store();
    store.register_user(User::new("fan").with_display_name("Fan"));
    store.add_post(text_post("p1", TECH, minutes_ago(0), "author")).unwrap();

    store.react("p1", "fan", Reaction::Like).unwrap();
    let post = store.react("p1", "fan", Reaction::Dislike).unwrap();
    assert_eq!((post.likes, post.dislikes), (0, 1));

    let feed = store.activity_for_user("author");
    assert!(feed.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    let liked = feed
        .iter()
        .find(|a| matches!(a.kind, ActivityKind::PostLiked { .. }))
        .expect("like notification");
    assert_eq!(liked.kind.headline(), "Someone liked your post");
    match &liked.kind {
        ActivityKind::PostLiked { actor, post_id, .. } => {
            assert_eq!(post_id, "p1");
            assert_eq!(actor.display_name, None);
            assert_eq!(actor.pseudonym, None);
        }
        other => panic!("unexpected payload {:?}", other),
    }

    store.mark_as_read(&liked.id);
    store.mark_as_read(&liked.id);
    assert!(store.get_activity_item(&liked.id).unwrap().is_read);
}

#[test]
fn test_group_creator_is_notified() {
    let mut store = ContentStore::default();
    let group = store
        .add_group(Group::new("Gardening", "Plants, soil and patience").created_by("u9"))
        .unwrap();
    let feed = store.activity_for_user("u9");
    assert_eq!(feed.len(), 1);
    assert!(matches!(
        &feed[0].kind,
        ActivityKind::GroupCreated { group_id, .. } if *group_id == group.id
    ));
    assert!(!feed[0].is_read);
}
