//! Streaming events for incremental (token-by-token) completions
//!
//! [`StreamEvent`] bridges infrastructure-level streaming (SSE chunks from
//! the provider) to the application layer. Only the synthesis call uses
//! incremental mode; planning and specialist calls are blocking.

/// An event in a streaming completion.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A text chunk from the model, in arrival order.
    ///
    /// Concatenating all deltas in order reconstructs the full completion
    /// text exactly; the terminal `Completed` event carries no text.
    Delta(String),
    /// The provider signalled a clean end of completion.
    Completed,
    /// An error occurred mid-stream; no `Completed` will follow.
    Error(String),
}

impl StreamEvent {
    /// Returns true if this event ends the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed | StreamEvent::Error(_))
    }
}
