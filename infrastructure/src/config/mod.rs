//! Configuration loading

pub mod file_config;
pub mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileGenerationConfig, FileMeetingConfig, FilePersonaConfig,
};
pub use loader::ConfigLoader;
