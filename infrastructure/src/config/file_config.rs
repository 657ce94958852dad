//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain types on use.

use roundtable_domain::{DomainError, Persona};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("agenda_points cannot be 0")]
    InvalidAgendaPoints,

    #[error("at least one persona must be configured")]
    NoPersonas,

    #[error("at least one credential must be configured")]
    NoCredentials,

    #[error("invalid persona: {0}")]
    InvalidPersona(#[from] DomainError),
}

/// Meeting pacing configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMeetingConfig {
    /// Pause between ticks, in seconds
    pub turn_delay_seconds: u64,
    /// Number of agenda points requested from the backend
    pub agenda_points: usize,
}

impl Default for FileMeetingConfig {
    fn default() -> Self {
        Self {
            turn_delay_seconds: 5,
            agenda_points: 3,
        }
    }
}

/// Generation backend configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    /// Model name; empty means the adapter default
    pub model: String,
    /// API endpoint; empty means the adapter default
    pub endpoint: String,
    /// Credential secrets, rotated by the pool in this order
    pub credentials: Vec<String>,
}

/// One persona from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePersonaConfig {
    pub name: String,
    #[serde(default)]
    pub role: String,
}

impl FilePersonaConfig {
    /// Convert to a domain persona with a name-derived id
    pub fn to_persona(&self) -> Result<Persona, DomainError> {
        let id: String = self
            .name
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_whitespace() { '-' } else { c })
            .collect();
        Persona::new(id, self.name.trim(), self.role.trim())
    }
}

/// Root configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub meeting: FileMeetingConfig,
    pub generation: FileGenerationConfig,
    pub personas: Vec<FilePersonaConfig>,
}

impl FileConfig {
    /// Validate the configuration for running a meeting
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.meeting.agenda_points == 0 {
            return Err(ConfigValidationError::InvalidAgendaPoints);
        }
        if self.personas.is_empty() {
            return Err(ConfigValidationError::NoPersonas);
        }
        if self.generation.credentials.is_empty() {
            return Err(ConfigValidationError::NoCredentials);
        }
        for persona in &self.personas {
            persona.to_persona()?;
        }
        Ok(())
    }

    /// Convert the configured personas to domain personas
    pub fn personas(&self) -> Result<Vec<Persona>, ConfigValidationError> {
        self.personas
            .iter()
            .map(|p| p.to_persona().map_err(ConfigValidationError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> FileConfig {
        FileConfig {
            personas: vec![
                FilePersonaConfig {
                    name: "Alice Ng".to_string(),
                    role: "CFO".to_string(),
                },
                FilePersonaConfig {
                    name: "Bob".to_string(),
                    role: "Engineer".to_string(),
                },
            ],
            generation: FileGenerationConfig {
                credentials: vec!["sk-1".to_string()],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.meeting.turn_delay_seconds, 5);
        assert_eq!(config.meeting.agenda_points, 3);
        assert!(config.personas.is_empty());
        assert!(config.generation.credentials.is_empty());
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_zero_agenda_points_rejected() {
        let mut config = valid_config();
        config.meeting.agenda_points = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidAgendaPoints)
        ));
    }

    #[test]
    fn test_missing_personas_rejected() {
        let mut config = valid_config();
        config.personas.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::NoPersonas)
        ));
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let mut config = valid_config();
        config.generation.credentials.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::NoCredentials)
        ));
    }

    #[test]
    fn test_persona_id_derived_from_name() {
        let persona = valid_config().personas().unwrap().remove(0);
        assert_eq!(persona.id().as_str(), "alice-ng");
        assert_eq!(persona.name(), "Alice Ng");
    }

    #[test]
    fn test_toml_round_trip() {
        let toml = r#"
[meeting]
turn_delay_seconds = 2

[generation]
model = "gemini-2.5-flash"
credentials = ["sk-1", "sk-2"]

[[personas]]
name = "Alice"
role = "CFO"
"#;
        let config: FileConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.meeting.turn_delay_seconds, 2);
        // Unset fields keep their defaults
        assert_eq!(config.meeting.agenda_points, 3);
        assert_eq!(config.generation.credentials.len(), 2);
        assert_eq!(config.personas[0].name, "Alice");
    }
}
