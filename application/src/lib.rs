//! Application layer - use cases and ports
//!
//! Orchestrates domain logic behind technology-agnostic ports. The gateway
//! port is the only dependency the use cases have on the outside world;
//! adapters for it live in the infrastructure layer.

pub mod ports;
pub mod use_cases;

pub use ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway, StreamHandle};
pub use use_cases::invoke_specialist::{InvokeSpecialistError, InvokeSpecialistUseCase};
pub use use_cases::run_orchestrator::{
    OrchestratorRequest, RunOrchestratorError, RunOrchestratorUseCase,
};
