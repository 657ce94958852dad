//! Meeting observation port
//!
//! Defines the interface for reporting meeting progress to the caller.
//! Implementations live in the presentation layer and can display events
//! in various ways (console, TUI, web UI, ...).

use roundtable_domain::{MeetingPhase, TranscriptEntry};

/// Callback for meeting events
///
/// All methods default to no-ops so implementations only handle the events
/// they care about.
pub trait MeetingObserver: Send + Sync {
    /// A new entry was appended to the transcript (possibly still pending)
    fn on_entry(&self, _entry: &TranscriptEntry) {}

    /// A pending entry was finalized with its generated text
    fn on_entry_finalized(&self, _entry: &TranscriptEntry) {}

    /// The meeting moved to a new phase
    fn on_phase(&self, _phase: MeetingPhase) {}

    /// The meeting stopped on a failure; the message is human-readable
    fn on_error(&self, _message: &str) {}
}

/// No-op observer for headless use
pub struct NoObserver;

impl MeetingObserver for NoObserver {}
