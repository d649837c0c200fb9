//! # moderation-adapters
//!
//! Local implementation of `ContentModerator`.
//! Matches configurable term lists per category and treats link-stuffed text
//! as spam. Suitable for development and as a fallback when no hosted
//! classifier is configured.

use async_trait::async_trait;
use domains::{ContentModerator, ModerationVerdict};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bhttps?://\S+").expect("link pattern is valid"));

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}']+").expect("word pattern is valid"));

/// Term lists and thresholds for [`BlocklistModerator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocklistRules {
    pub hate_terms: Vec<String>,
    pub spam_terms: Vec<String>,
    pub off_topic_terms: Vec<String>,
    /// More links than this in one text counts as spam
    pub max_links: usize,
}

impl Default for BlocklistRules {
    fn default() -> Self {
        Self {
            hate_terms: Vec::new(),
            spam_terms: vec![
                "buy now".to_string(),
                "free money".to_string(),
                "click here".to_string(),
            ],
            off_topic_terms: Vec::new(),
            max_links: 3,
        }
    }
}

pub struct BlocklistModerator {
    hate: Vec<Vec<String>>,
    spam: Vec<Vec<String>>,
    off_topic: Vec<Vec<String>>,
    max_links: usize,
}

fn words_of(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Each term becomes the lowercase word sequence it must match.
fn normalize(terms: &[String]) -> Vec<Vec<String>> {
    terms
        .iter()
        .map(|t| words_of(t))
        .filter(|t| !t.is_empty())
        .collect()
}

impl BlocklistModerator {
    pub fn new(rules: &BlocklistRules) -> Self {
        Self {
            hate: normalize(&rules.hate_terms),
            spam: normalize(&rules.spam_terms),
            off_topic: normalize(&rules.off_topic_terms),
            max_links: rules.max_links,
        }
    }

    /// Finds the first term whose words appear consecutively in `words`,
    /// whatever whitespace or punctuation separates them in the text.
    fn first_hit(terms: &[Vec<String>], words: &[String]) -> Option<String> {
        terms
            .iter()
            .find(|term| words.windows(term.len()).any(|w| w == term.as_slice()))
            .map(|term| term.join(" "))
    }

    /// Synchronous classification used by the async port.
    pub fn classify(&self, text: &str) -> ModerationVerdict {
        let words = words_of(text);

        let mut verdict = ModerationVerdict::clean();
        let mut reasons = Vec::new();

        if let Some(term) = Self::first_hit(&self.hate, &words) {
            verdict.is_hate_speech = true;
            reasons.push(format!("hate speech (\"{}\")", term));
        }
        let links = LINK_RE.find_iter(text).count();
        if links > self.max_links {
            verdict.is_spam = true;
            reasons.push(format!("spam ({} links)", links));
        } else if let Some(term) = Self::first_hit(&self.spam, &words) {
            verdict.is_spam = true;
            reasons.push(format!("spam (\"{}\")", term));
        }
        if let Some(term) = Self::first_hit(&self.off_topic, &words) {
            verdict.is_off_topic = true;
            reasons.push(format!("off topic (\"{}\")", term));
        }

        if !reasons.is_empty() {
            verdict.flag_reason = Some(reasons.join(", "));
        }
        verdict
    }
}

#[async_trait]
impl ContentModerator for BlocklistModerator {
    async fn moderate(&self, text: &str) -> anyhow::Result<ModerationVerdict> {
        let verdict = self.classify(text);
        debug!(clean = verdict.is_clean(), "blocklist verdict");
        Ok(verdict)
    }
}
