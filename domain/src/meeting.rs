//! Meeting phase state machine

use serde::{Deserialize, Serialize};

/// Phase of a meeting run
///
/// `Stopped` is reachable from any non-terminal phase via cancellation;
/// `Failed` is reached on unrecoverable error. No further ticks are
/// scheduled once a terminal phase is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingPhase {
    /// Agenda has not been built yet
    AgendaPending,
    /// Personas are taking turns over the agenda grid
    Discussing,
    /// All agenda points covered; closing summary outstanding
    Summarizing,
    /// Meeting ran to completion
    Concluded,
    /// Meeting was cancelled by the user
    Stopped,
    /// Meeting aborted on an unrecoverable error
    Failed,
}

impl MeetingPhase {
    pub fn as_str(&self) -> &str {
        match self {
            MeetingPhase::AgendaPending => "agenda-pending",
            MeetingPhase::Discussing => "discussing",
            MeetingPhase::Summarizing => "summarizing",
            MeetingPhase::Concluded => "concluded",
            MeetingPhase::Stopped => "stopped",
            MeetingPhase::Failed => "failed",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            MeetingPhase::AgendaPending => "Building Agenda",
            MeetingPhase::Discussing => "Discussion",
            MeetingPhase::Summarizing => "Summary",
            MeetingPhase::Concluded => "Concluded",
            MeetingPhase::Stopped => "Stopped",
            MeetingPhase::Failed => "Failed",
        }
    }

    /// Terminal phases schedule no further ticks
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MeetingPhase::Concluded | MeetingPhase::Stopped | MeetingPhase::Failed
        )
    }
}

impl std::fmt::Display for MeetingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_phases() {
        assert!(MeetingPhase::Concluded.is_terminal());
        assert!(MeetingPhase::Stopped.is_terminal());
        assert!(MeetingPhase::Failed.is_terminal());
        assert!(!MeetingPhase::AgendaPending.is_terminal());
        assert!(!MeetingPhase::Discussing.is_terminal());
        assert!(!MeetingPhase::Summarizing.is_terminal());
    }

    #[test]
    fn test_as_str() {
        assert_eq!(MeetingPhase::Discussing.as_str(), "discussing");
        assert_eq!(MeetingPhase::Summarizing.to_string(), "Summary");
    }
}
