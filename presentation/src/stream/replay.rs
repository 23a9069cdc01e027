//! Reconstruction of a finished request from its event stream
//!
//! The event stream is the only transcript of a request. Replaying it must
//! recover exactly what a live consumer saw: the synthesis text is the
//! concatenation of all `text` payloads in order, and specialist details
//! arrive after the synthesis, in fan-out order.

use counsel_domain::{ComposedMessage, OrchestratorEvent, SpecialistResult};

/// Terminal condition of a replayed stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Ended with `done`; a composed message exists
    Completed,
    /// Ended with `error`; no composed message exists
    Failed,
    /// No terminal event seen (truncated transcript)
    Incomplete,
}

/// Folds an event sequence back into the persisted content
#[derive(Debug, Default)]
pub struct ReplayedStream {
    synthesis: String,
    details: Vec<SpecialistResult>,
    outcome: Option<ReplayOutcome>,
}

impl ReplayedStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a replay from a complete event sequence
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a OrchestratorEvent>) -> Self {
        let mut replay = Self::new();
        for event in events {
            replay.apply(event);
        }
        replay
    }

    /// Apply one event. Events after a terminal event are ignored.
    pub fn apply(&mut self, event: &OrchestratorEvent) {
        if self.outcome.is_some() {
            return;
        }
        match event {
            OrchestratorEvent::Text { text } => self.synthesis.push_str(text),
            OrchestratorEvent::SpecialistDetail {
                specialist,
                name,
                response,
            } => self.details.push(SpecialistResult::new(
                specialist.clone(),
                name.clone(),
                response.clone(),
            )),
            OrchestratorEvent::Done => self.outcome = Some(ReplayOutcome::Completed),
            OrchestratorEvent::Error { .. } => self.outcome = Some(ReplayOutcome::Failed),
            OrchestratorEvent::OrchestratorThinking { .. }
            | OrchestratorEvent::SpecialistCalled { .. } => {}
        }
    }

    pub fn outcome(&self) -> ReplayOutcome {
        self.outcome.unwrap_or(ReplayOutcome::Incomplete)
    }

    pub fn synthesis(&self) -> &str {
        &self.synthesis
    }

    /// The composed message this stream carried, if it completed
    pub fn into_composed(self) -> Option<ComposedMessage> {
        match self.outcome {
            Some(ReplayOutcome::Completed) => {
                Some(ComposedMessage::new(self.synthesis, self.details))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_domain::SpecialistId;

    fn detail(id: &str, name: &str, response: &str) -> OrchestratorEvent {
        OrchestratorEvent::SpecialistDetail {
            specialist: SpecialistId::new(id),
            name: name.to_string(),
            response: response.to_string(),
        }
    }

    #[test]
    fn replay_recovers_the_composed_message() {
        let events = vec![
            OrchestratorEvent::thinking("planning"),
            OrchestratorEvent::SpecialistCalled {
                specialist: SpecialistId::new("individual"),
                name: "Individual Tax Expert".to_string(),
            },
            OrchestratorEvent::thinking("synthesizing"),
            OrchestratorEvent::text("Integrated "),
            OrchestratorEvent::text("analysis."),
            detail("individual", "Individual Tax Expert", "Full answer."),
            OrchestratorEvent::Done,
        ];

        let replay = ReplayedStream::from_events(&events);
        assert_eq!(replay.outcome(), ReplayOutcome::Completed);
        assert_eq!(replay.synthesis(), "Integrated analysis.");

        let composed = replay.into_composed().unwrap();
        assert_eq!(composed.synthesis(), "Integrated analysis.");
        assert_eq!(composed.details().len(), 1);
        assert_eq!(composed.details()[0].response, "Full answer.");
    }

    #[test]
    fn failed_stream_yields_no_message() {
        let events = vec![
            OrchestratorEvent::thinking("planning"),
            OrchestratorEvent::text("Partial "),
            OrchestratorEvent::error(),
        ];

        let replay = ReplayedStream::from_events(&events);
        assert_eq!(replay.outcome(), ReplayOutcome::Failed);
        assert!(replay.into_composed().is_none());
    }

    #[test]
    fn truncated_stream_is_incomplete() {
        let events = vec![OrchestratorEvent::text("cut off")];
        let replay = ReplayedStream::from_events(&events);
        assert_eq!(replay.outcome(), ReplayOutcome::Incomplete);
        assert!(replay.into_composed().is_none());
    }

    #[test]
    fn events_after_terminal_are_ignored() {
        let mut replay = ReplayedStream::new();
        replay.apply(&OrchestratorEvent::Done);
        replay.apply(&OrchestratorEvent::text("stray"));
        assert_eq!(replay.synthesis(), "");
        assert_eq!(replay.outcome(), ReplayOutcome::Completed);
    }

    #[test]
    fn details_keep_arrival_order() {
        let events = vec![
            detail("individual", "A", "first"),
            detail("corporate", "B", "second"),
            OrchestratorEvent::Done,
        ];
        let composed = ReplayedStream::from_events(&events).into_composed().unwrap();
        assert_eq!(composed.details()[0].response, "first");
        assert_eq!(composed.details()[1].response, "second");
    }
}
