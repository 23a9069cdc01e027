//! Chat-completion session types
//!
//! The request/response vocabulary shared between the orchestration engine
//! and the model gateway: messages built from content blocks, structured
//! responses that may carry tool-use requests, and streaming events for
//! incremental delivery.

mod message;
mod response;
mod stream;

pub use message::{ChatMessage, ContentBlock};
pub use response::{LlmResponse, StopReason};
pub use stream::StreamEvent;
