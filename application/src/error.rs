//! Meeting error taxonomy

use thiserror::Error;

/// Errors surfaced by the orchestration engine
///
/// Every variant except `Cancelled` stops the meeting; there is no
/// automatic resume.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeetingError {
    /// Zero usable credentials at call start
    #[error("No usable credentials available")]
    NoCredentials,

    /// Every usable credential hit its quota during one generation call
    #[error("All credentials are rate limited; try again after the cooldown")]
    AllThrottled,

    /// One credential failed with a non-quota error and was marked rejected
    #[error("Credential '{id}' was rejected: {reason}")]
    CredentialInvalid { id: String, reason: String },

    /// User-initiated stop; not an error condition
    #[error("Operation cancelled")]
    Cancelled,

    /// Start requested without the required inputs
    #[error("Cannot start meeting: {0}")]
    PreconditionFailed(String),
}

impl MeetingError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, MeetingError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_cancelled_check() {
        assert!(MeetingError::Cancelled.is_cancelled());
        assert!(!MeetingError::NoCredentials.is_cancelled());
        assert!(!MeetingError::AllThrottled.is_cancelled());
    }

    #[test]
    fn test_display_is_human_readable() {
        let error = MeetingError::CredentialInvalid {
            id: "c1".to_string(),
            reason: "401 Unauthorized".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Credential 'c1' was rejected: 401 Unauthorized"
        );
    }
}
