//! Conversation history and request context types
//!
//! These are caller-supplied inputs. The engine never mutates them; it only
//! appends derived turns locally for the lifetime of one request.

use serde::{Deserialize, Serialize};

/// Who authored a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of prior conversation, as persisted by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Opaque context strings assembled by external collaborators.
///
/// Passed through unmodified to every model call within a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBundle {
    /// Client and matter background
    #[serde(default)]
    pub matter_context: String,
    /// Extracted text of documents attached to the matter
    #[serde(default)]
    pub document_context: String,
}

impl ContextBundle {
    pub fn new(matter_context: impl Into<String>, document_context: impl Into<String>) -> Self {
        Self {
            matter_context: matter_context.into(),
            document_context: document_context.into(),
        }
    }
}
