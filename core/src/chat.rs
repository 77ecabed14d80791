// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat log: an append-only ordered sequence, cleared on game reset

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single chat entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique entry id
    pub id: Uuid,
    /// Display name of the sender
    pub sender: String,
    /// Message body
    pub text: String,
    /// When the entry was appended locally
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// System notices (join/leave etc.) rather than player chat
    pub system: bool,
}

/// Ordered chat history for one game
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a player message and return the stored entry
    pub fn push(&mut self, sender: &str, text: &str) -> ChatMessage {
        self.append(sender, text, false)
    }

    /// Append a system notice
    pub fn push_system(&mut self, text: &str) -> ChatMessage {
        self.append("system", text, true)
    }

    fn append(&mut self, sender: &str, text: &str, system: bool) -> ChatMessage {
        let message = ChatMessage {
            id: Uuid::new_v4(),
            sender: sender.to_string(),
            text: text.to_string(),
            timestamp: chrono::Utc::now(),
            system,
        };
        self.messages.push(message.clone());
        message
    }

    /// All entries in append order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop the history (game reset)
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
