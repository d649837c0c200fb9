//! # Core Traits (Ports)
//!
//! Collaborators outside the store boundary. Any adapter must implement these
//! traits to be wired into the binary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Classification returned by a moderation backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationVerdict {
    pub is_hate_speech: bool,
    pub is_spam: bool,
    pub is_off_topic: bool,
    pub flag_reason: Option<String>,
}

impl ModerationVerdict {
    pub fn clean() -> Self {
        Self::default()
    }

    /// Content may be published only when no category fired.
    pub fn is_clean(&self) -> bool {
        !(self.is_hate_speech || self.is_spam || self.is_off_topic)
    }

    /// The reason to surface to the author; falls back to the category name.
    pub fn reason(&self) -> String {
        if let Some(reason) = self.flag_reason.as_deref().filter(|r| !r.is_empty()) {
            return reason.to_string();
        }
        if self.is_hate_speech {
            "hate speech".to_string()
        } else if self.is_spam {
            "spam".to_string()
        } else if self.is_off_topic {
            "off topic".to_string()
        } else {
            String::new()
        }
    }
}

/// Content classification contract. Called before anything is published.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ContentModerator: Send + Sync {
    /// Judges free text; an `Err` means the backend could not decide.
    async fn moderate(&self, text: &str) -> anyhow::Result<ModerationVerdict>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_reason_falls_back_to_category() {
        let verdict = ModerationVerdict { is_spam: true, ..Default::default() };
        assert!(!verdict.is_clean());
        assert_eq!(verdict.reason(), "spam");

        let explicit = ModerationVerdict {
            is_off_topic: true,
            flag_reason: Some("not about cooking".into()),
            ..Default::default()
        };
        assert_eq!(explicit.reason(), "not about cooking");
    }

    #[tokio::test]
    async fn test_mock_moderator_is_available() {
        let mut moderator = MockContentModerator::new();
        moderator
            .expect_moderate()
            .returning(|_| Ok(ModerationVerdict::clean()));
        let verdict = moderator.moderate("hello").await.unwrap();
        assert!(verdict.is_clean());
    }
}
