use domains::AppError;
use services::ContentStore;

#[test]
fn test_argument_order_does_not_matter() {
    let mut store = ContentStore::default();
    let a = store.start_or_get_chat_session("u1", "u2").unwrap();
    let b = store.start_or_get_chat_session("u2", "u1").unwrap();
    assert_eq!(a.id, b.id);
    assert_eq!(a.pseudonyms, b.pseudonyms);
}

#[test]
fn test_pseudonym_stays_bound_across_messages() {
    let mut store = ContentStore::default();
    let session = store.start_or_get_chat_session("u1", "u2").unwrap();
    let u1 = session.pseudonym_of("u1").unwrap().to_string();
    let u2 = session.pseudonym_of("u2").unwrap().to_string();

    store.send_message(&session.id, "u1", "hi", Some("p1")).unwrap();
    store.send_message(&session.id, "u2", "hello", None).unwrap();
    store.send_message(&session.id, "u1", "how are you?", None).unwrap();

    let transcript = store.get_messages_for_chat_session(&session.id);
    assert_eq!(transcript.len(), 3);
    assert!(transcript.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    for message in &transcript {
        let expected = if message.sender_id == "u1" { &u1 } else { &u2 };
        assert_eq!(&message.sender_pseudonym, expected);
    }
    assert_eq!(transcript[0].post_id_context.as_deref(), Some("p1"));

    let refreshed = store.start_or_get_chat_session("u2", "u1").unwrap();
    assert_eq!(refreshed.pseudonym_of("u1"), Some(u1.as_str()));
    assert_eq!(refreshed.last_message.unwrap().text, "how are you?");
}

#[test]
fn test_recent_conversations_first() {
    let mut store = ContentStore::default();
    let quiet = store.start_or_get_chat_session("u1", "u2").unwrap();
    let busy = store.start_or_get_chat_session("u1", "u3").unwrap();
    let idle = store.start_or_get_chat_session("u1", "u4").unwrap();
    store.send_message(&quiet.id, "u2", "old news", None).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    store.send_message(&busy.id, "u3", "fresh", None).unwrap();

    let order: Vec<_> = store
        .chat_sessions_for_user("u1")
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(order, [busy.id, quiet.id, idle.id]);
    assert_eq!(store.chat_sessions_for_user("u3").len(), 1);
}

#[test]
fn test_message_to_missing_session_creates_nothing() {
    let mut store = ContentStore::default();
    let err = store.send_message("ghost", "u1", "anyone?", None).unwrap_err();
    assert!(matches!(err, AppError::ContractViolation(_)));
    assert!(store.get_messages_for_chat_session("ghost").is_empty());
    assert!(store.chat_sessions_for_user("u1").is_empty());
}

#[test]
fn test_blank_message_is_rejected() {
    let mut store = ContentStore::default();
    let session = store.start_or_get_chat_session("u1", "u2").unwrap();
    let err = store.send_message(&session.id, "u1", "   ", None).unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    assert!(store.get_chat_session(&session.id).unwrap().last_message.is_none());
}
