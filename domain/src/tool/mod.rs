//! Tool declarations handed to the planning model

use crate::specialist::SpecialistConfig;
use serde::{Deserialize, Serialize};

/// Declaration of a callable tool, as seen by the model.
///
/// In this system there is exactly one tool per specialist, and every tool
/// shares the same two-parameter consultation schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Build the consultation tool declaration for one specialist
    pub fn for_specialist(config: &SpecialistConfig) -> Self {
        Self {
            name: config.tool_name(),
            description: config.description.clone(),
            input_schema: consultation_schema(),
        }
    }
}

/// JSON schema for specialist consultation arguments: a scoped `question`
/// plus brief `client_context`.
pub fn consultation_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "question": {
                "type": "string",
                "description": "The specific question to ask the specialist. \
                                Be precise and include all relevant facts.",
            },
            "client_context": {
                "type": "string",
                "description": "Brief context about the client and matter \
                                (entity type, relevant facts, jurisdiction, scale).",
            },
        },
        "required": ["question", "client_context"],
    })
}
