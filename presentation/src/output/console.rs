//! Console meeting observer
//!
//! Renders transcript entries and phase changes as they happen.

use colored::Colorize;
use roundtable_application::MeetingObserver;
use roundtable_domain::{EntryKind, MeetingPhase, TranscriptEntry};

/// `MeetingObserver` that prints entries to stdout as they arrive
pub struct ConsoleObserver;

impl ConsoleObserver {
    pub fn new() -> Self {
        Self
    }

    fn heading(entry: &TranscriptEntry) -> String {
        match entry.kind {
            EntryKind::PersonaTurn => {
                let speaker = entry.speaker.as_ref();
                let name = speaker.map_or("?", |s| s.name.as_str());
                let role = speaker.map_or("", |s| s.role.as_str());
                if role.is_empty() {
                    format!("── {name} ──").yellow().bold().to_string()
                } else {
                    format!("── {name} ({role}) ──").yellow().bold().to_string()
                }
            }
            EntryKind::OrchestratorNotice => "── Moderator ──".cyan().bold().to_string(),
            EntryKind::UserInterjection => "── You ──".green().bold().to_string(),
        }
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl MeetingObserver for ConsoleObserver {
    fn on_entry(&self, entry: &TranscriptEntry) {
        if entry.pending {
            let name = entry.speaker.as_ref().map_or("Moderator", |s| s.name.as_str());
            println!("{}", format!("... {name} is thinking").dimmed());
            return;
        }
        println!("\n{}\n{}", Self::heading(entry), entry.text);
    }

    fn on_entry_finalized(&self, entry: &TranscriptEntry) {
        println!("\n{}\n{}", Self::heading(entry), entry.text);
    }

    fn on_phase(&self, phase: MeetingPhase) {
        println!("\n{}", format!("[{phase}]").magenta().bold());
    }

    fn on_error(&self, message: &str) {
        eprintln!("\n{} {}", "Error:".red().bold(), message);
    }
}
