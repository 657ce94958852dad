//! Persona entity

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Unique identifier for a persona
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonaId(String);

impl PersonaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PersonaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A simulated discussion participant (Entity)
///
/// Immutable during a meeting. Transcript entries reference personas by id
/// but snapshot name and role at creation time, so later edits to a persona
/// do not retroactively alter history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    id: PersonaId,
    name: String,
    /// Free text shaping the persona's generated behavior
    role: String,
}

impl Persona {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::BlankPersonaName);
        }
        Ok(Self {
            id: PersonaId::new(id),
            name,
            role: role.into(),
        })
    }

    pub fn id(&self) -> &PersonaId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}
