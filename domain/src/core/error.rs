//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid specialist id: {0}")]
    InvalidSpecialistId(String),

    #[error("No specialists configured")]
    EmptyRegistry,

    #[error("Duplicate specialist id: {0}")]
    DuplicateSpecialist(String),
}
