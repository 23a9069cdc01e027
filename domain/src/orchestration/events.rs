//! Progress/result events streamed to the caller
//!
//! The serde representation of [`OrchestratorEvent`] is the wire format:
//! each event serializes to one JSON object with a `type` discriminant, and
//! the transport writes one object per line (NDJSON).

use crate::specialist::SpecialistId;
use serde::{Deserialize, Serialize};

/// Generic user-facing message carried by the `error` event.
///
/// Internal diagnostic detail is logged, never sent on the wire.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred during analysis.";

/// An event in the orchestration progress stream.
///
/// Events are immutable and ordered; each variant is emitted at most once
/// per request except `Text`, which repeats once per synthesis chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrchestratorEvent {
    /// The orchestrator is working between observable results
    OrchestratorThinking { text: String },

    /// A specialist consultation has been planned.
    ///
    /// Emitted eagerly for every planned call, in planner-returned order,
    /// before any consultation completes.
    SpecialistCalled {
        specialist: SpecialistId,
        name: String,
    },

    /// One chunk of synthesis text, in arrival order.
    ///
    /// Concatenating all `Text` payloads in emission order reconstructs the
    /// full synthesis text exactly.
    Text { text: String },

    /// A specialist's full answer, emitted after synthesis in fan-out order
    SpecialistDetail {
        specialist: SpecialistId,
        name: String,
        response: String,
    },

    /// Terminal: the request completed and a composed message exists
    Done,

    /// Terminal: the request failed; no composed message exists
    Error { message: String },
}

impl OrchestratorEvent {
    pub fn thinking(text: impl Into<String>) -> Self {
        OrchestratorEvent::OrchestratorThinking { text: text.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        OrchestratorEvent::Text { text: text.into() }
    }

    pub fn error() -> Self {
        OrchestratorEvent::Error {
            message: GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// Returns true if this event ends the stream
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrchestratorEvent::Done | OrchestratorEvent::Error { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_discriminants() {
        let cases = [
            (
                OrchestratorEvent::thinking("analyzing"),
                "orchestrator_thinking",
            ),
            (
                OrchestratorEvent::SpecialistCalled {
                    specialist: SpecialistId::new("individual"),
                    name: "Individual Tax Expert".to_string(),
                },
                "specialist_called",
            ),
            (OrchestratorEvent::text("chunk"), "text"),
            (
                OrchestratorEvent::SpecialistDetail {
                    specialist: SpecialistId::new("corporate"),
                    name: "Corporate Tax Expert".to_string(),
                    response: "Answer.".to_string(),
                },
                "specialist_detail",
            ),
            (OrchestratorEvent::Done, "done"),
            (OrchestratorEvent::error(), "error"),
        ];

        for (event, expected) in cases {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], expected);
        }
    }

    #[test]
    fn specialist_called_payload() {
        let event = OrchestratorEvent::SpecialistCalled {
            specialist: SpecialistId::new("partnership"),
            name: "Partnership Tax Expert (Jennifer Walsh)".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["specialist"], "partnership");
        assert_eq!(json["name"], "Partnership Tax Expert (Jennifer Walsh)");
    }

    #[test]
    fn done_serializes_bare() {
        assert_eq!(
            serde_json::to_string(&OrchestratorEvent::Done).unwrap(),
            r#"{"type":"done"}"#
        );
    }

    #[test]
    fn error_carries_generic_message() {
        let json = serde_json::to_value(OrchestratorEvent::error()).unwrap();
        assert_eq!(json["message"], GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn round_trip_through_wire_format() {
        let event = OrchestratorEvent::text("partial synthesis");
        let line = serde_json::to_string(&event).unwrap();
        let back: OrchestratorEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn terminal_events() {
        assert!(OrchestratorEvent::Done.is_terminal());
        assert!(OrchestratorEvent::error().is_terminal());
        assert!(!OrchestratorEvent::text("x").is_terminal());
    }
}
