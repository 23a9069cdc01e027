//! Orchestration protocol types
//!
//! Value objects and events for the plan → fan-out → synthesize protocol:
//!
//! - [`SpecialistCall`] - one planned consultation, produced by the planning phase
//! - [`SpecialistResult`] - one completed consultation
//! - [`OrchestratorEvent`] - progress/result events streamed to the caller
//! - [`ComposedMessage`] - the final content handed to persistence

mod composed;
mod events;
mod value_objects;

pub use composed::ComposedMessage;
pub use events::{GENERIC_ERROR_MESSAGE, OrchestratorEvent};
pub use value_objects::{SpecialistCall, SpecialistResult};
