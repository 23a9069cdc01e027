//! Event stream transport and replay

mod ndjson;
mod replay;

pub use ndjson::{NdjsonDecoder, NdjsonError, NdjsonWriter};
pub use replay::{ReplayOutcome, ReplayedStream};
