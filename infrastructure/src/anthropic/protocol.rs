//! Wire types for the Anthropic-style Messages API
//!
//! These structs mirror the HTTP request/response bodies exactly and are
//! converted to and from domain types at the gateway boundary.

use counsel_domain::{ChatMessage, ContentBlock, LlmResponse, Role, StopReason, ToolDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// API version sent with every request
pub const API_VERSION: &str = "2023-06-01";

/// `POST /v1/messages` request body
#[derive(Debug, Serialize)]
pub struct ApiRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ApiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ApiRequest {
    pub fn new(
        model: impl Into<String>,
        max_tokens: u32,
        system: String,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            system,
            messages: messages.into_iter().map(ApiMessage::from).collect(),
            tools: tools.into_iter().map(ApiTool::from).collect(),
            stream: None,
        }
    }

    pub fn streaming(mut self) -> Self {
        self.stream = Some(true);
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: Vec<ApiBlock>,
}

impl From<ChatMessage> for ApiMessage {
    fn from(message: ChatMessage) -> Self {
        Self {
            role: match message.role {
                Role::User => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: message.content.into_iter().map(ApiBlock::from).collect(),
        }
    }
}

/// One content block in a request or response body
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: HashMap<String, serde_json::Value>,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
    /// Block types this client does not consume (e.g. thinking)
    #[serde(other)]
    Unsupported,
}

impl From<ContentBlock> for ApiBlock {
    fn from(block: ContentBlock) -> Self {
        match block {
            ContentBlock::Text { text } => ApiBlock::Text { text },
            ContentBlock::ToolUse { id, name, input } => ApiBlock::ToolUse { id, name, input },
            ContentBlock::ToolResult {
                tool_use_id,
                content,
            } => ApiBlock::ToolResult {
                tool_use_id,
                content,
            },
        }
    }
}

impl ApiBlock {
    /// Convert to the domain block, dropping unsupported variants
    fn into_domain(self) -> Option<ContentBlock> {
        match self {
            ApiBlock::Text { text } => Some(ContentBlock::Text { text }),
            ApiBlock::ToolUse { id, name, input } => {
                Some(ContentBlock::ToolUse { id, name, input })
            }
            ApiBlock::ToolResult {
                tool_use_id,
                content,
            } => Some(ContentBlock::ToolResult {
                tool_use_id,
                content,
            }),
            ApiBlock::Unsupported => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiTool {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl From<ToolDefinition> for ApiTool {
    fn from(tool: ToolDefinition) -> Self {
        Self {
            name: tool.name,
            description: tool.description,
            input_schema: tool.input_schema,
        }
    }
}

/// `POST /v1/messages` (non-streaming) response body
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub content: Vec<ApiBlock>,
    pub stop_reason: Option<String>,
}

impl ApiResponse {
    pub fn into_domain(self) -> LlmResponse {
        LlmResponse {
            content: self
                .content
                .into_iter()
                .filter_map(ApiBlock::into_domain)
                .collect(),
            stop_reason: self.stop_reason.map(|reason| match reason.as_str() {
                "end_turn" => StopReason::EndTurn,
                "tool_use" => StopReason::ToolUse,
                "max_tokens" => StopReason::MaxTokens,
                other => StopReason::Other(other.to_string()),
            }),
        }
    }
}

/// Error body returned with non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

/// One server-sent event in a streaming response.
///
/// Only the variants the gateway acts on are modeled; everything else
/// (message_start, content_block_start, ping, ...) deserializes to `Other`
/// and is skipped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SseEvent {
    ContentBlockDelta { delta: SseDelta },
    MessageStop,
    Error { error: ApiErrorDetail },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SseDelta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}
