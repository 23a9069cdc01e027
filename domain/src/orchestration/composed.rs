//! The final composed message handed to the persistence collaborator

use super::value_objects::SpecialistResult;
use serde::{Deserialize, Serialize};

/// Separator between the synthesis body and the specialist appendix, and
/// between individual appendix sections.
const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Heading that opens the specialist appendix.
const APPENDIX_HEADING: &str = "## Specialist Analysis Detail";

/// The final text to persist for one completed request.
///
/// Built exactly once, after the event stream reaches `done`; a failed or
/// cancelled request never produces one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedMessage {
    /// Full synthesis text (concatenation of all streamed chunks)
    synthesis: String,
    /// Specialist results, in fan-out (request) order
    details: Vec<SpecialistResult>,
}

impl ComposedMessage {
    pub fn new(synthesis: impl Into<String>, details: Vec<SpecialistResult>) -> Self {
        Self {
            synthesis: synthesis.into(),
            details,
        }
    }

    /// A direct answer from the planner, with no specialist appendix
    pub fn direct(synthesis: impl Into<String>) -> Self {
        Self::new(synthesis, Vec::new())
    }

    pub fn synthesis(&self) -> &str {
        &self.synthesis
    }

    pub fn details(&self) -> &[SpecialistResult] {
        &self.details
    }

    /// Render the persisted form: synthesis text, optionally followed by a
    /// delimited appendix with each specialist's full answer.
    pub fn render(&self) -> String {
        if self.details.is_empty() {
            return self.synthesis.clone();
        }

        let sections = self
            .details
            .iter()
            .map(|d| format!("### {}\n{}", d.name, d.response))
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR);

        format!(
            "{}{SECTION_SEPARATOR}{APPENDIX_HEADING}\n\n{}",
            self.synthesis, sections
        )
    }
}
