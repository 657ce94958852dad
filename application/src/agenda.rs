//! Agenda builder
//!
//! Thin consumer of the generation gateway: derives the ordered agenda for
//! a topic, once per meeting.

use crate::error::MeetingError;
use crate::gateway::GenerationGateway;
use crate::ports::generator::{GenerationRequest, TextGenerator};
use roundtable_domain::{DiscussionPrompts, Topic, parse_agenda};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Number of agenda points requested from the backend
pub const AGENDA_POINTS: usize = 3;

/// Builds the meeting agenda from the topic
pub struct AgendaBuilder {
    points: usize,
}

impl AgendaBuilder {
    pub fn new() -> Self {
        Self {
            points: AGENDA_POINTS,
        }
    }

    pub fn with_points(points: usize) -> Self {
        Self { points }
    }

    /// Derive the agenda; fails with the gateway's taxonomy
    ///
    /// Blank or single-character lines are discarded from the generated
    /// text. If nothing usable survives, the topic itself becomes the
    /// single agenda point so the meeting can still proceed.
    pub async fn build<B: TextGenerator>(
        &self,
        gateway: &GenerationGateway<B>,
        topic: &Topic,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, MeetingError> {
        let request = GenerationRequest::new(
            DiscussionPrompts::agenda_request(topic.content(), self.points),
            DiscussionPrompts::agenda_system(),
        );
        let raw = gateway.generate(&request, cancel).await?;
        debug!(raw_len = raw.len(), "Agenda text generated");

        let mut agenda = parse_agenda(&raw);
        if agenda.is_empty() {
            agenda = vec![topic.content().to_string()];
        }
        info!(points = agenda.len(), "Agenda built");
        Ok(agenda)
    }
}

impl Default for AgendaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential_pool::CredentialPool;
    use crate::ports::generator::GeneratorError;
    use async_trait::async_trait;
    use roundtable_domain::Credential;
    use std::sync::Arc;

    struct FixedBackend(&'static str);

    #[async_trait]
    impl TextGenerator for FixedBackend {
        async fn generate(
            &self,
            _request: &GenerationRequest,
            _secret: &str,
            _cancel: &CancellationToken,
        ) -> Result<String, GeneratorError> {
            Ok(self.0.to_string())
        }
    }

    fn gateway(backend: FixedBackend) -> GenerationGateway<FixedBackend> {
        let pool = CredentialPool::new();
        pool.add(Credential::usable("c1", "s1"));
        GenerationGateway::new(Arc::new(backend), pool)
    }

    #[tokio::test]
    async fn test_builds_filtered_agenda() {
        let gateway = gateway(FixedBackend("1. Pricing\n\n2. Timeline\nX\n3. Risks"));
        let topic = Topic::new("Product launch").unwrap();
        let agenda = AgendaBuilder::new()
            .build(&gateway, &topic, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(agenda, vec!["Pricing", "Timeline", "Risks"]);
    }

    #[tokio::test]
    async fn test_unusable_output_falls_back_to_topic() {
        let gateway = gateway(FixedBackend("\n.\n"));
        let topic = Topic::new("Product launch").unwrap();
        let agenda = AgendaBuilder::new()
            .build(&gateway, &topic, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(agenda, vec!["Product launch"]);
    }

    #[tokio::test]
    async fn test_gateway_errors_pass_through() {
        let backend = FixedBackend("unused");
        let empty = GenerationGateway::new(Arc::new(backend), CredentialPool::new());
        let topic = Topic::new("Product launch").unwrap();
        let result = AgendaBuilder::new()
            .build(&empty, &topic, &CancellationToken::new())
            .await;
        assert_eq!(result, Err(MeetingError::NoCredentials));
    }
}
