//! Text generation port
//!
//! Defines the single capability the engine consumes from its environment:
//! generate text given a prompt, a behavior profile, and a cancellation
//! signal. Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors a generation backend can report
///
/// The engine only cares about one distinction: `RateLimited` (transient,
/// credential-specific, rotation helps) versus everything else.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// Quota or rate limiting on the credential used for this call
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other failure (auth, transport, malformed response, ...)
    #[error("Generation failed: {0}")]
    Failed(String),

    /// The call observed the cancellation token
    #[error("Generation cancelled")]
    Cancelled,
}

/// One generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The user-visible prompt
    pub prompt: String,
    /// Behavior-shaping system profile (persona role, moderator voice, ...)
    pub system_profile: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, system_profile: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_profile: system_profile.into(),
        }
    }
}

/// Backend generation primitive
///
/// The secret of the credential selected for the attempt is passed per
/// call; the backend holds no credential state of its own.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
        secret: &str,
        cancel: &CancellationToken,
    ) -> Result<String, GeneratorError>;
}
