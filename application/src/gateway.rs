//! Generation gateway
//!
//! Drives one generation request through the credential pool: rotate on
//! quota errors, reject-and-stop on anything else, honor cancellation at
//! every attempt boundary.

use crate::credential_pool::CredentialPool;
use crate::error::MeetingError;
use crate::ports::generator::{GenerationRequest, GeneratorError, TextGenerator};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Gateway from prompt to generated text, via the credential pool
pub struct GenerationGateway<B: TextGenerator> {
    backend: Arc<B>,
    pool: CredentialPool,
}

impl<B: TextGenerator> GenerationGateway<B> {
    pub fn new(backend: Arc<B>, pool: CredentialPool) -> Self {
        Self { backend, pool }
    }

    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    /// Attempt generation, rotating across usable credentials
    ///
    /// The attempt budget is a snapshot of the usable count taken at call
    /// start; credentials recovering from cooldown mid-loop do not extend
    /// this call's budget. A non-quota failure marks the credential
    /// rejected and aborts immediately rather than rotating, so a
    /// misconfiguration is not masked as a retryable condition.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<String, MeetingError> {
        let budget = self.pool.usable_count();
        if budget == 0 {
            return Err(MeetingError::NoCredentials);
        }

        for attempt in 1..=budget {
            if cancel.is_cancelled() {
                return Err(MeetingError::Cancelled);
            }

            let Some(credential) = self.pool.next() else {
                // Everything usable at call start has been throttled since
                break;
            };
            debug!(credential = %credential.id(), attempt, budget, "Generation attempt");

            match self
                .backend
                .generate(request, credential.secret(), cancel)
                .await
            {
                Ok(text) => return Ok(text),
                Err(GeneratorError::RateLimited(reason)) => {
                    warn!(credential = %credential.id(), %reason, "Rate limited, rotating");
                    self.pool.mark_throttled(credential.id());
                }
                Err(GeneratorError::Cancelled) => return Err(MeetingError::Cancelled),
                Err(GeneratorError::Failed(reason)) => {
                    self.pool.mark_rejected(credential.id());
                    return Err(MeetingError::CredentialInvalid {
                        id: credential.id().to_string(),
                        reason,
                    });
                }
            }
        }

        Err(MeetingError::AllThrottled)
    }
}
