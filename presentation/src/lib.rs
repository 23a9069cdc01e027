//! Presentation layer - event stream transport and CLI surface

pub mod cli;
pub mod stream;

pub use cli::Cli;
pub use stream::{NdjsonDecoder, NdjsonError, NdjsonWriter, ReplayOutcome, ReplayedStream};
