//! NDJSON encoding and decoding of the orchestration event stream
//!
//! One JSON object per line. The writer flushes after every event so each
//! event is deliverable before the next one is produced. The decoder is
//! push-based and tolerant: partial lines are buffered across chunks and
//! malformed lines are skipped, never fatal.

use counsel_domain::OrchestratorEvent;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Error, Debug)]
pub enum NdjsonError {
    #[error("Failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write event: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes orchestration events to an async sink, one per line
pub struct NdjsonWriter<W: AsyncWrite + Unpin> {
    sink: W,
}

impl<W: AsyncWrite + Unpin> NdjsonWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Serialize, write, and flush one event
    pub async fn write(&mut self, event: &OrchestratorEvent) -> Result<(), NdjsonError> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');
        self.sink.write_all(&line).await?;
        self.sink.flush().await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Push-based NDJSON decoder.
///
/// Feed it transport chunks in arrival order; it returns the events of
/// every line completed by each chunk. A trailing fragment without a
/// newline stays buffered until the next chunk completes it.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: String,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &str) -> Vec<OrchestratorEvent> {
        self.buffer.push_str(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line = self.buffer[..newline].trim().to_string();
            self.buffer.drain(..newline + 1);

            if line.is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(event) => events.push(event),
                // Skip garbage lines; the stream stays usable.
                Err(_) => continue,
            }
        }
        events
    }

    /// True if a partial line is still buffered
    pub fn has_partial(&self) -> bool {
        !self.buffer.trim().is_empty()
    }
}
