//! Chat sessions between two users.
//!
//! A session is identified by its unordered participant pair. Each participant
//! gets a pseudonym generated for that session alone, so the same user shows up
//! under different handles in different conversations.

use std::collections::BTreeMap;

use chrono::Utc;
use domains::{new_id, AppError, ChatSession, LastMessage, Message, Result};
use tracing::{info, warn};

use crate::content_store::ContentStore;
use crate::pseudonym::generate_pseudonym;
use crate::views;

impl ContentStore {
    /// Returns the session for `{user_a, user_b}`, creating it on first request.
    /// Argument order never matters.
    pub fn start_or_get_chat_session(&mut self, user_a: &str, user_b: &str) -> Result<ChatSession> {
        if user_a.trim().is_empty() || user_b.trim().is_empty() {
            return Err(AppError::ContractViolation(
                "chat participants must be identified".to_string(),
            ));
        }
        if user_a == user_b {
            return Err(AppError::ContractViolation(format!(
                "user {} cannot start a chat with themselves",
                user_a
            )));
        }

        let key = ChatSession::pair_key(user_a, user_b);
        if let Some(existing) = self
            .chat_index
            .get(&key)
            .and_then(|id| self.chat_sessions.iter().find(|s| &s.id == id))
        {
            return Ok(existing.clone());
        }

        let (first, second) = distinct_pseudonyms(generate_pseudonym);
        let mut pseudonyms = BTreeMap::new();
        pseudonyms.insert(key.0.clone(), first);
        pseudonyms.insert(key.1.clone(), second);
        let session = ChatSession {
            id: new_id(),
            participants: [key.0.clone(), key.1.clone()],
            pseudonyms,
            last_message: None,
            created_at: Utc::now(),
        };

        info!(chat_session_id = %session.id, "chat session started");
        self.chat_index.insert(key, session.id.clone());
        self.messages.insert(session.id.clone(), Vec::new());
        self.chat_sessions.push(session.clone());
        Ok(session)
    }

    /// Appends a message to an existing session under the sender's
    /// session pseudonym and refreshes the session's last-message preview.
    ///
    /// An unknown session or a sender outside the session is a caller bug and
    /// yields [`AppError::ContractViolation`]; the session is never created here.
    pub fn send_message(
        &mut self,
        session_id: &str,
        sender_id: &str,
        text: &str,
        post_id_context: Option<&str>,
    ) -> Result<Message> {
        let max = self.limits.message_text_max;
        let Some(session) = self.chat_sessions.iter_mut().find(|s| s.id == session_id) else {
            warn!(chat_session_id = session_id, "message sent to unknown chat session");
            return Err(AppError::ContractViolation(format!(
                "chat session {} does not exist",
                session_id
            )));
        };
        let Some(pseudonym) = session.pseudonym_of(sender_id).map(str::to_string) else {
            return Err(AppError::ContractViolation(format!(
                "user {} is not a participant of chat session {}",
                sender_id, session_id
            )));
        };
        let body = text.trim();
        if body.is_empty() {
            return Err(AppError::ValidationError("message text is empty".to_string()));
        }
        if body.chars().count() > max {
            return Err(AppError::ValidationError(format!(
                "message text must be at most {} characters",
                max
            )));
        }

        let message = Message {
            id: new_id(),
            chat_session_id: session_id.to_string(),
            sender_id: sender_id.to_string(),
            sender_pseudonym: pseudonym,
            text: body.to_string(),
            created_at: Utc::now(),
            post_id_context: post_id_context.map(str::to_string),
        };
        session.last_message = Some(LastMessage {
            id: message.id.clone(),
            text: message.text.clone(),
            timestamp: message.created_at,
        });

        info!(chat_session_id = session_id, message_id = %message.id, "message sent");
        self.messages
            .entry(session_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    /// Transcript of a session, oldest first. Empty when nothing was sent yet
    /// or the session is unknown.
    pub fn get_messages_for_chat_session(&self, session_id: &str) -> Vec<Message> {
        self.messages
            .get(session_id)
            .map(|m| views::transcript(m))
            .unwrap_or_default()
    }

    pub fn get_chat_session(&self, session_id: &str) -> Option<ChatSession> {
        self.chat_sessions.iter().find(|s| s.id == session_id).cloned()
    }

    /// The pseudonym `user_id` carries inside one session.
    pub fn pseudonym_in_session(&self, session_id: &str, user_id: &str) -> Option<String> {
        self.chat_sessions
            .iter()
            .find(|s| s.id == session_id)
            .and_then(|s| s.pseudonym_of(user_id))
            .map(str::to_string)
    }

    /// Sessions of one user, most recently active first.
    pub fn chat_sessions_for_user(&self, user_id: &str) -> Vec<ChatSession> {
        views::sessions_for_user(&self.chat_sessions, user_id)
    }
}

/// Two handles for one session; the second is redrawn until it differs.
fn distinct_pseudonyms(mut generate: impl FnMut() -> String) -> (String, String) {
    let first = generate();
    let mut second = generate();
    while second == first {
        second = generate();
    }
    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_pseudonyms_never_collide() {
        let mut draws = ["Lucky_Otter", "Lucky_Otter", "Lucky_Otter", "Quiet_Fox"].into_iter();
        let (a, b) = distinct_pseudonyms(|| draws.next().unwrap().to_string());
        assert_eq!(a, "Lucky_Otter");
        assert_eq!(b, "Quiet_Fox");

        let mut store = ContentStore::default();
        for peer in 0..200 {
            let session = store.start_or_get_chat_session("u0", &format!("peer{}", peer)).unwrap();
            let handles: Vec<_> = session.pseudonyms.values().collect();
            assert_ne!(handles[0], handles[1]);
        }
    }

    #[test]
    fn test_session_is_keyed_by_unordered_pair() {
        let mut store = ContentStore::default();
        let first = store.start_or_get_chat_session("u1", "u2").unwrap();
        let again = store.start_or_get_chat_session("u1", "u2").unwrap();
        let swapped = store.start_or_get_chat_session("u2", "u1").unwrap();
        assert_eq!(first.id, again.id);
        assert_eq!(first.id, swapped.id);
        assert_eq!(store.chat_sessions_for_user("u1").len(), 1);
    }

    #[test]
    fn test_pseudonyms_are_per_session_and_stable() {
        let mut store = ContentStore::default();
        let session = store.start_or_get_chat_session("u1", "u2").unwrap();
        let handle = session.pseudonym_of("u1").unwrap().to_string();

        for text in ["hi", "are you there?", "ok bye"] {
            let msg = store.send_message(&session.id, "u1", text, None).unwrap();
            assert_eq!(msg.sender_pseudonym, handle);
        }
        for msg in store.get_messages_for_chat_session(&session.id) {
            assert_eq!(msg.sender_pseudonym, handle);
        }
        assert_eq!(store.pseudonym_in_session(&session.id, "u1").as_deref(), Some(handle.as_str()));

        let other = store.start_or_get_chat_session("u1", "u3").unwrap();
        assert_ne!(other.id, session.id);
        assert!(other.pseudonym_of("u1").is_some());
    }

    #[test]
    fn test_transcript_is_chronological_and_preview_updates() {
        let mut store = ContentStore::default();
        let session = store.start_or_get_chat_session("u1", "u2").unwrap();
        assert!(store.get_messages_for_chat_session(&session.id).is_empty());

        store.send_message(&session.id, "u1", "first", Some("p9")).unwrap();
        let last = store.send_message(&session.id, "u2", "second", None).unwrap();

        let texts: Vec<_> = store
            .get_messages_for_chat_session(&session.id)
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, ["first", "second"]);

        let preview = store.get_chat_session(&session.id).unwrap().last_message.unwrap();
        assert_eq!(preview.id, last.id);
        assert_eq!(preview.text, "second");
    }

    #[test]
    fn test_unknown_session_is_a_contract_violation() {
        let mut store = ContentStore::default();
        let err = store.send_message("missing", "u1", "hello", None).unwrap_err();
        assert!(matches!(err, AppError::ContractViolation(_)));
        assert!(store.get_chat_session("missing").is_none());
        assert!(store.chat_sessions_for_user("u1").is_empty());
    }

    #[test]
    fn test_outsider_and_self_chat_are_rejected() {
        let mut store = ContentStore::default();
        let session = store.start_or_get_chat_session("u1", "u2").unwrap();
        let err = store.send_message(&session.id, "u3", "let me in", None).unwrap_err();
        assert!(matches!(err, AppError::ContractViolation(_)));

        let err = store.start_or_get_chat_session("u1", "u1").unwrap_err();
        assert!(matches!(err, AppError::ContractViolation(_)));
    }
}
