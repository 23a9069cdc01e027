//! Structured responses from the chat-completion backend

use super::message::ContentBlock;
use serde::{Deserialize, Serialize};

/// Reason the model stopped generating.
///
/// `ToolUse` is the pivot of the orchestration protocol: it means the planner
/// wants specialists consulted before it can answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response
    EndTurn,
    /// The model requested tool invocations
    ToolUse,
    /// Hit the token limit; the response may be truncated
    MaxTokens,
    /// Provider-specific stop reason
    Other(String),
}

/// A full (blocking-mode) response from the model.
///
/// May contain text blocks, tool-use blocks, or both.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
}

impl LlmResponse {
    /// Create a text-only response
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            stop_reason: Some(StopReason::EndTurn),
        }
    }

    /// Concatenate all `Text` content blocks
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// First `Text` block, if any.
    ///
    /// The specialist invoker uses this: a specialist's answer is the first
    /// text segment of its completion.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|b| b.as_text())
    }

    /// All `ToolUse` blocks as `(id, name, input)` tuples, in response order
    pub fn tool_uses(
        &self,
    ) -> Vec<(
        &str,
        &str,
        &std::collections::HashMap<String, serde_json::Value>,
    )> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => {
                    Some((id.as_str(), name.as_str(), input))
                }
                _ => None,
            })
            .collect()
    }

    pub fn has_tool_uses(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}
