//! Anthropic Messages API adapter for the LLM gateway port

mod gateway;
mod protocol;
mod sse;

pub use gateway::{AnthropicConfig, AnthropicGateway};
