//! Specialist configuration and registry
//!
//! A specialist is a domain-scoped responder: a persona prompt plus a display
//! name, invocable by id. The registry is built once at process start and is
//! read-only for the lifetime of every request.

mod config;
mod registry;

pub use config::{SpecialistConfig, SpecialistId, TOOL_NAME_PREFIX};
pub use registry::SpecialistRegistry;
