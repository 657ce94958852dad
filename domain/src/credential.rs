//! Credential entity and status

use serde::{Deserialize, Serialize};

/// Unique identifier for a credential
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialId(String);

impl CredentialId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a pooled credential
///
/// `Throttled` self-recovers to `Usable` after the pool's cooldown window;
/// `Rejected` is terminal until the credential is externally re-verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    Unverified,
    Verifying,
    Usable,
    Throttled,
    Rejected,
}

impl CredentialStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CredentialStatus::Unverified => "unverified",
            CredentialStatus::Verifying => "verifying",
            CredentialStatus::Usable => "usable",
            CredentialStatus::Throttled => "throttled",
            CredentialStatus::Rejected => "rejected",
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, CredentialStatus::Usable)
    }
}

impl std::fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authorization token for the generation backend (Entity)
///
/// Owned by the credential pool; the status field is the only mutation the
/// pool performs.
#[derive(Debug, Clone)]
pub struct Credential {
    id: CredentialId,
    secret: String,
    status: CredentialStatus,
}

impl Credential {
    pub fn new(
        id: impl Into<String>,
        secret: impl Into<String>,
        status: CredentialStatus,
    ) -> Self {
        Self {
            id: CredentialId::new(id),
            secret: secret.into(),
            status,
        }
    }

    /// A credential that may be drawn immediately
    pub fn usable(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::new(id, secret, CredentialStatus::Usable)
    }

    pub fn id(&self) -> &CredentialId {
        &self.id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn status(&self) -> CredentialStatus {
        self.status
    }

    pub fn set_status(&mut self, status: CredentialStatus) {
        self.status = status;
    }
}
