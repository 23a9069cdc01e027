//! Application use cases

pub mod invoke_specialist;
pub mod run_orchestrator;
