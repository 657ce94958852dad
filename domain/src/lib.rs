//! Domain layer for roundtable
//!
//! This crate contains the core entities and value objects for a simulated
//! panel discussion. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Meeting
//!
//! A meeting walks an agenda × persona grid: an orchestrator builds an
//! agenda for the topic, each persona takes a turn on each agenda point in
//! order, and the orchestrator closes with a summary.
//!
//! ## Transcript
//!
//! The append-only record of the meeting. While a generation call for an
//! entry is outstanding, that entry is *pending*; it is finalized in place
//! (by identity, not position) when the call resolves, or discarded if the
//! call is cancelled or fails.

pub mod core;
pub mod credential;
pub mod meeting;
pub mod persona;
pub mod prompt;
pub mod transcript;

// Re-export commonly used types
pub use crate::core::{error::DomainError, topic::Topic};
pub use credential::{Credential, CredentialId, CredentialStatus};
pub use meeting::MeetingPhase;
pub use persona::{Persona, PersonaId};
pub use prompt::{DiscussionPrompts, parse_agenda};
pub use transcript::{EntryId, EntryKind, Speaker, Transcript, TranscriptEntry};
