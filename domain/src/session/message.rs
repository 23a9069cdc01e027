//! Messages exchanged with the chat-completion backend

use crate::conversation::{ConversationTurn, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single block of content within a chat message.
///
/// Chat-completion APIs with tool support model both requests and responses
/// as arrays of content blocks, mixing plain text, tool-use requests from
/// the model, and tool results sent back to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text { text: String },

    /// A tool invocation requested by the model.
    ///
    /// The API assigns the `id` and validates `name` and `input` against the
    /// declared tool set.
    ToolUse {
        id: String,
        name: String,
        input: HashMap<String, serde_json::Value>,
    },

    /// The result of a tool invocation, sent back to the model and matched
    /// by `tool_use_id`.
    ToolResult { tool_use_id: String, content: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Returns the text content if this is a `Text` block
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// A message in a chat-completion conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![ContentBlock::text(text)],
        }
    }

    /// An assistant message carrying arbitrary content blocks, used to echo
    /// the planner's own turn (text plus tool-use requests) back into the
    /// synthesis conversation.
    pub fn assistant_blocks(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// A user message carrying tool results
    pub fn tool_results(results: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: results,
        }
    }

    /// Convert a persisted conversation turn into a plain-text message
    pub fn from_turn(turn: &ConversationTurn) -> Self {
        Self {
            role: turn.role,
            content: vec![ContentBlock::text(turn.text.clone())],
        }
    }
}
