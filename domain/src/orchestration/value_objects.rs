//! Orchestration value objects - immutable per-request types

use crate::specialist::SpecialistId;
use serde::{Deserialize, Serialize};

/// One planned specialist consultation.
///
/// Produced by the planning phase from a tool-use request; its lifetime is
/// the request that planned it. `id` is the API-assigned tool-use id, used
/// to match the result back into the synthesis conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistCall {
    /// Tool-use id assigned by the planning call
    pub id: String,
    /// The specialist to consult
    pub specialist: SpecialistId,
    /// Scoped question framed by the planner
    pub question: String,
    /// Brief client/matter context framed by the planner
    pub client_context: String,
}

/// One completed specialist consultation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistResult {
    pub specialist: SpecialistId,
    /// Display name of the specialist, for presentation
    pub name: String,
    /// The specialist's full text answer
    pub response: String,
}

impl SpecialistResult {
    pub fn new(
        specialist: SpecialistId,
        name: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            specialist,
            name: name.into(),
            response: response.into(),
        }
    }
}
