//! Domain layer for tax-counsel
//!
//! This crate contains the core entities, value objects, and events for the
//! multi-specialist orchestration protocol. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Orchestration
//!
//! One request runs a three-phase protocol:
//!
//! - **Planning**: the orchestrator model decides which specialists to consult
//! - **Fan-out**: all planned consultations run concurrently, all-or-nothing
//! - **Synthesis**: a final streaming call integrates the specialist answers
//!
//! ## Event stream
//!
//! Progress is exposed as an ordered sequence of [`OrchestratorEvent`]s whose
//! serde representation is the NDJSON wire format.

pub mod conversation;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod session;
pub mod specialist;
pub mod tool;

// Re-export commonly used types
pub use conversation::{ContextBundle, ConversationTurn, Role};
pub use core::DomainError;
pub use orchestration::{
    ComposedMessage, GENERIC_ERROR_MESSAGE, OrchestratorEvent, SpecialistCall, SpecialistResult,
};
pub use prompt::PromptTemplate;
pub use session::{ChatMessage, ContentBlock, LlmResponse, StopReason, StreamEvent};
pub use specialist::{SpecialistConfig, SpecialistId, SpecialistRegistry, TOOL_NAME_PREFIX};
pub use tool::{ToolDefinition, consultation_schema};
