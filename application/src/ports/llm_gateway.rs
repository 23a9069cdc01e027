//! LLM Gateway port
//!
//! Defines the interface for communicating with the chat-completion backend.
//! The engine treats the backend as a black box with two modes: blocking
//! (full completion, optionally with tool declarations) and incremental
//! (token-by-token delivery, used only for synthesis).

use async_trait::async_trait;
use counsel_domain::{ChatMessage, LlmResponse, StreamEvent, ToolDefinition};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during gateway operations.
///
/// All of these surface to the caller as a single generic `error` event;
/// the detail here is for diagnostics only.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    #[error("Stream ended before completion signal")]
    StreamInterrupted,
}

/// One chat-completion request.
///
/// An empty `tools` list means a plain completion; a non-empty list lets the
/// model return tool-use requests instead of (or alongside) text.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDefinition>,
}

impl CompletionRequest {
    /// A plain completion with no tool declarations
    pub fn plain(system_prompt: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages,
            tools: Vec::new(),
        }
    }

    /// A completion that may return tool-use requests
    pub fn with_tools(
        system_prompt: impl Into<String>,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages,
            tools,
        }
    }
}

/// Handle for receiving streaming events from an incremental completion.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. Dropping the handle signals the
/// adapter's reader task to stop forwarding.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all deltas into a single string.
    ///
    /// Useful when streaming happens at the transport level but only the
    /// final text is needed.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed => return Ok(full_text),
                StreamEvent::Error(e) => return Err(GatewayError::RequestFailed(e)),
            }
        }
        // Channel closed without a completion signal
        Err(GatewayError::StreamInterrupted)
    }
}

/// Gateway for chat-completion calls.
///
/// This port defines how the application layer talks to the model provider.
/// Implementations (adapters) live in the infrastructure layer. Calls are
/// stateless from the provider's perspective; any retry policy belongs to
/// the adapter, never to the engine.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Blocking mode: send a request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<LlmResponse, GatewayError>;

    /// Incremental mode: send a request and receive the completion as a
    /// stream of text deltas
    async fn stream(&self, request: CompletionRequest) -> Result<StreamHandle, GatewayError>;
}
