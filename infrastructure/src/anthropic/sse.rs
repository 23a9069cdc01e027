//! Incremental parser for server-sent event byte streams
//!
//! The HTTP client yields arbitrary byte chunks; SSE frames (`data: {...}`
//! terminated by a blank line) can span chunk boundaries, and a chunk
//! boundary can fall inside a multibyte UTF-8 character. The parser buffers
//! raw bytes and decodes only complete frames, so partial characters stay
//! buffered until the bytes that finish them arrive.

/// Stateful SSE frame splitter
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes, returning the `data:` payloads of every
    /// frame completed by it.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut payloads = Vec::new();
        while let Some(frame_end) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let frame = String::from_utf8_lossy(&self.buffer[..frame_end]).into_owned();
            self.buffer.drain(..frame_end + 2);

            for line in frame.lines() {
                if let Some(data) = line.strip_prefix("data: ") {
                    payloads.push(data.to_string());
                }
                // `event:` and comment lines carry no payload; the JSON
                // body repeats the event type.
            }
        }
        payloads
    }
}
