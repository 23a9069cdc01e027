//! Infrastructure layer - external adapters
//!
//! Implements the application layer's ports against concrete technology:
//! the Anthropic Messages API over HTTPS, and TOML configuration files.

pub mod anthropic;
pub mod config;

pub use anthropic::{AnthropicConfig, AnthropicGateway};
pub use config::{ConfigLoader, FileConfig};
