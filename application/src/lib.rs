//! Application layer for roundtable
//!
//! This crate contains the turn orchestration engine: the credential pool,
//! the generation gateway, the agenda builder, the turn sequencer, and the
//! meeting controller, plus the ports they depend on. It depends only on
//! the domain layer.

pub mod agenda;
pub mod controller;
pub mod credential_pool;
pub mod error;
pub mod gateway;
pub mod ports;
pub mod sequencer;

// Re-export commonly used types
pub use agenda::AgendaBuilder;
pub use controller::{MeetingController, MeetingSnapshot};
pub use credential_pool::CredentialPool;
pub use error::MeetingError;
pub use gateway::GenerationGateway;
pub use ports::{
    generator::{GenerationRequest, GeneratorError, TextGenerator},
    observer::{MeetingObserver, NoObserver},
};
pub use sequencer::{TickOutcome, TurnSequencer};
