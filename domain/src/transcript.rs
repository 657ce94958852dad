//! Meeting transcript
//!
//! Append-only during a run, except for the single pending entry: while a
//! generation call is outstanding the corresponding entry sits at the tail
//! with `pending = true`, and is later finalized or discarded *by identity*,
//! never by position.

use crate::core::error::DomainError;
use crate::persona::{Persona, PersonaId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a transcript entry, unique within one transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(u64);

impl EntryId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    /// A persona's contribution to the discussion
    PersonaTurn,
    /// Orchestrator housekeeping (agenda, topic changes, summary, closing)
    OrchestratorNotice,
    /// A human-submitted interjection
    UserInterjection,
}

/// Denormalized speaker snapshot
///
/// Captured when the entry is created so later persona edits (or deletion)
/// do not retroactively alter history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub persona_id: PersonaId,
    pub name: String,
    pub role: String,
}

impl From<&Persona> for Speaker {
    fn from(persona: &Persona) -> Self {
        Self {
            persona_id: persona.id().clone(),
            name: persona.name().to_string(),
            role: persona.role().to_string(),
        }
    }
}

/// One message in the meeting transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    /// `None` for orchestrator notices and user interjections
    pub speaker: Option<Speaker>,
    pub text: String,
    /// True only while a generation call for this entry is outstanding
    pub pending: bool,
    pub at: DateTime<Utc>,
}

impl TranscriptEntry {
    fn new(id: EntryId, kind: EntryKind, speaker: Option<Speaker>, text: String) -> Self {
        Self {
            id,
            kind,
            speaker,
            text,
            pending: false,
            at: Utc::now(),
        }
    }

    /// Display name of the entry's author
    pub fn author(&self) -> &str {
        match (&self.speaker, self.kind) {
            (Some(speaker), _) => &speaker.name,
            (None, EntryKind::UserInterjection) => "You",
            (None, _) => "Moderator",
        }
    }
}

/// The full record of a meeting
///
/// Invariant: at most one pending entry exists at a time, and it is always
/// the most recent entry.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    next_id: u64,
    pending: Option<EntryId>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a finalized orchestrator notice
    pub fn push_notice(&mut self, text: impl Into<String>) -> &TranscriptEntry {
        let id = self.allocate_id();
        self.entries.push(TranscriptEntry::new(
            id,
            EntryKind::OrchestratorNotice,
            None,
            text.into(),
        ));
        self.entries.last().unwrap()
    }

    /// Append a finalized user interjection
    pub fn push_interjection(&mut self, text: impl Into<String>) -> &TranscriptEntry {
        let id = self.allocate_id();
        self.entries.push(TranscriptEntry::new(
            id,
            EntryKind::UserInterjection,
            None,
            text.into(),
        ));
        self.entries.last().unwrap()
    }

    /// Append a pending persona-turn entry
    ///
    /// Fails if another entry is already pending.
    pub fn begin_turn(&mut self, speaker: Speaker) -> Result<&TranscriptEntry, DomainError> {
        self.begin_pending(EntryKind::PersonaTurn, Some(speaker))
    }

    /// Append a pending orchestrator entry (used for the closing summary)
    pub fn begin_notice(&mut self) -> Result<&TranscriptEntry, DomainError> {
        self.begin_pending(EntryKind::OrchestratorNotice, None)
    }

    fn begin_pending(
        &mut self,
        kind: EntryKind,
        speaker: Option<Speaker>,
    ) -> Result<&TranscriptEntry, DomainError> {
        if let Some(pending) = self.pending {
            return Err(DomainError::AlreadyPending(pending.value()));
        }
        let id = self.allocate_id();
        let mut entry = TranscriptEntry::new(id, kind, speaker, String::new());
        entry.pending = true;
        self.entries.push(entry);
        self.pending = Some(id);
        Ok(self.entries.last().unwrap())
    }

    /// Replace the pending entry's text and clear its pending flag
    pub fn finalize(
        &mut self,
        id: EntryId,
        text: impl Into<String>,
    ) -> Result<&TranscriptEntry, DomainError> {
        if self.pending != Some(id) {
            return Err(DomainError::EntryNotFound(id.value()));
        }
        let position = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(DomainError::EntryNotFound(id.value()))?;
        let entry = &mut self.entries[position];
        entry.text = text.into();
        entry.pending = false;
        self.pending = None;
        Ok(&self.entries[position])
    }

    /// Remove the pending entry, if any
    ///
    /// Used on cancellation or failure so the transcript is never left with
    /// an entry stuck "thinking".
    pub fn discard_pending(&mut self) -> Option<EntryId> {
        let id = self.pending.take()?;
        self.entries.retain(|e| e.id != id);
        Some(id)
    }

    pub fn pending_id(&self) -> Option<EntryId> {
        self.pending
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.pending = None;
    }

    /// Render finalized entries as prompt context, one line per entry
    pub fn rendered(&self) -> String {
        let mut out = String::new();
        for entry in self.entries.iter().filter(|e| !e.pending) {
            out.push_str(entry.author());
            out.push_str(": ");
            out.push_str(&entry.text);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speaker() -> Speaker {
        let persona = Persona::new("p1", "Alice", "CFO").unwrap();
        Speaker::from(&persona)
    }

    #[test]
    fn test_pending_lifecycle() {
        let mut transcript = Transcript::new();
        transcript.push_notice("Meeting started");

        let id = transcript.begin_turn(speaker()).unwrap().id;
        assert_eq!(transcript.pending_id(), Some(id));
        assert!(transcript.entries().last().unwrap().pending);

        let entry = transcript.finalize(id, "I think we should wait.").unwrap();
        assert!(!entry.pending);
        assert_eq!(entry.text, "I think we should wait.");
        assert_eq!(transcript.pending_id(), None);
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_only_one_pending_at_a_time() {
        let mut transcript = Transcript::new();
        let first = transcript.begin_turn(speaker()).unwrap().id;
        assert_eq!(
            transcript.begin_turn(speaker()).unwrap_err(),
            DomainError::AlreadyPending(first.value())
        );
    }

    #[test]
    fn test_discard_removes_entry() {
        let mut transcript = Transcript::new();
        transcript.push_notice("open");
        let id = transcript.begin_turn(speaker()).unwrap().id;
        assert_eq!(transcript.discard_pending(), Some(id));
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.pending_id(), None);
        // Second discard is a no-op
        assert_eq!(transcript.discard_pending(), None);
    }

    #[test]
    fn test_finalize_wrong_id_fails() {
        let mut transcript = Transcript::new();
        let id = transcript.begin_turn(speaker()).unwrap().id;
        let bogus = EntryId(id.value() + 100);
        assert!(transcript.finalize(bogus, "text").is_err());
        // Real pending entry is untouched
        assert_eq!(transcript.pending_id(), Some(id));
    }

    #[test]
    fn test_speaker_snapshot_is_denormalized() {
        let persona = Persona::new("p1", "Alice", "CFO").unwrap();
        let mut transcript = Transcript::new();
        let id = transcript.begin_turn(Speaker::from(&persona)).unwrap().id;
        transcript.finalize(id, "hello").unwrap();
        drop(persona);
        let entry = &transcript.entries()[0];
        let snapshot = entry.speaker.as_ref().unwrap();
        assert_eq!(snapshot.name, "Alice");
        assert_eq!(snapshot.role, "CFO");
    }

    #[test]
    fn test_rendered_skips_pending() {
        let mut transcript = Transcript::new();
        transcript.push_notice("Meeting started");
        transcript.push_interjection("What about costs?");
        transcript.begin_turn(speaker()).unwrap();

        let rendered = transcript.rendered();
        assert_eq!(rendered, "Moderator: Meeting started\nYou: What about costs?\n");
    }

    #[test]
    fn test_clear_resets_pending() {
        let mut transcript = Transcript::new();
        transcript.begin_turn(speaker()).unwrap();
        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.pending_id(), None);
    }
}
