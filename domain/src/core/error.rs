//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Topic cannot be blank")]
    BlankTopic,

    #[error("Persona name cannot be blank")]
    BlankPersonaName,

    #[error("Transcript entry {0} not found")]
    EntryNotFound(u64),

    #[error("A generation is already pending for entry {0}")]
    AlreadyPending(u64),
}
