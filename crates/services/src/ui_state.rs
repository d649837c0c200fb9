//! Ephemeral interface flags. Nothing here touches content; it only shares the
//! store's single-writer, synchronous update discipline.

use serde::{Deserialize, Serialize};

/// Who the user is about to chat with, and which post prompted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTarget {
    pub user_id: String,
    pub post_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub create_post_open: bool,
    pub create_group_open: bool,
    /// Group preselected in the create-post dialog
    pub default_group_id: Option<String>,
    pub chat_target: Option<ChatTarget>,
}

impl UiState {
    /// Opens the create-post dialog, optionally preselecting a group.
    pub fn open_create_post(&mut self, group_id: Option<String>) {
        self.create_post_open = true;
        self.default_group_id = group_id;
    }

    pub fn close_create_post(&mut self) {
        self.create_post_open = false;
        self.default_group_id = None;
    }

    pub fn set_create_group_open(&mut self, open: bool) {
        self.create_group_open = open;
    }

    pub fn open_chat_with(&mut self, user_id: impl Into<String>, post_id: Option<String>) {
        self.chat_target = Some(ChatTarget { user_id: user_id.into(), post_id });
    }

    pub fn close_chat(&mut self) {
        self.chat_target = None;
    }
}
