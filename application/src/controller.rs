//! Meeting controller
//!
//! The orchestration entry point: starts, stops, and resets meetings, owns
//! the cancellation token, and paces ticks with the inter-turn delay. At
//! most one generation call is outstanding at any time; ticks are strictly
//! serialized.

use crate::agenda::AgendaBuilder;
use crate::error::MeetingError;
use crate::gateway::GenerationGateway;
use crate::ports::generator::TextGenerator;
use crate::ports::observer::{MeetingObserver, NoObserver};
use crate::sequencer::{MeetingShared, SharedHandle, TickOutcome, TurnSequencer};
use roundtable_domain::{MeetingPhase, Persona, Topic, TranscriptEntry};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default pause between ticks; paces API usage and gives a human time to
/// read and interject
pub const TURN_DELAY: Duration = Duration::from_secs(5);

/// Read model exposed to the caller
#[derive(Debug, Clone, Serialize)]
pub struct MeetingSnapshot {
    pub transcript: Vec<TranscriptEntry>,
    pub phase: Option<MeetingPhase>,
    pub is_running: bool,
    pub is_awaiting_generation: bool,
    pub last_error: Option<String>,
}

/// Orchestrates meetings over an injected generation gateway
pub struct MeetingController<B: TextGenerator + 'static> {
    gateway: Arc<GenerationGateway<B>>,
    observer: Arc<dyn MeetingObserver>,
    turn_delay: Duration,
    agenda_points: usize,
    shared: SharedHandle,
    cancel: Mutex<Option<CancellationToken>>,
    /// Completion signal for the meeting task; `true` means no task in flight
    done: watch::Sender<bool>,
}

impl<B: TextGenerator + 'static> MeetingController<B> {
    pub fn new(gateway: Arc<GenerationGateway<B>>) -> Self {
        let (done, _) = watch::channel(true);
        Self {
            gateway,
            observer: Arc::new(NoObserver),
            turn_delay: TURN_DELAY,
            agenda_points: crate::agenda::AGENDA_POINTS,
            shared: Arc::new(Mutex::new(MeetingShared::default())),
            cancel: Mutex::new(None),
            done,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn MeetingObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_turn_delay(mut self, delay: Duration) -> Self {
        self.turn_delay = delay;
        self
    }

    pub fn with_agenda_points(mut self, points: usize) -> Self {
        self.agenda_points = points;
        self
    }

    /// Start a meeting on the given topic
    ///
    /// Rejects synchronously with `PreconditionFailed` when the topic is
    /// blank, the persona list is empty, no credential is usable, or a
    /// meeting is already running. On success the opening notice is
    /// appended and the first tick is scheduled.
    pub fn start(&self, topic: &str, personas: Vec<Persona>) -> Result<(), MeetingError> {
        let topic =
            Topic::new(topic).map_err(|e| MeetingError::PreconditionFailed(e.to_string()))?;
        if personas.is_empty() {
            return Err(MeetingError::PreconditionFailed(
                "at least one persona is required".to_string(),
            ));
        }
        if self.gateway.pool().usable_count() == 0 {
            return Err(MeetingError::PreconditionFailed(
                "no usable credential in the pool".to_string(),
            ));
        }

        let cancel = CancellationToken::new();
        {
            let mut shared = self.shared.lock().unwrap();
            if shared.running {
                return Err(MeetingError::PreconditionFailed(
                    "a meeting is already running".to_string(),
                ));
            }
            shared.running = true;
            shared.awaiting_generation = false;
            shared.last_error = None;
            shared.interjection = None;
        }
        *self.cancel.lock().unwrap() = Some(cancel.clone());

        info!(topic = %topic, personas = personas.len(), "Starting meeting");
        let opening = {
            let mut shared = self.shared.lock().unwrap();
            shared
                .transcript
                .push_notice(format!(
                    "Welcome to the roundtable. Today's topic: {topic}"
                ))
                .clone()
        };
        self.observer.on_entry(&opening);

        let sequencer = TurnSequencer::new(
            topic,
            personas,
            Arc::clone(&self.gateway),
            AgendaBuilder::with_points(self.agenda_points),
            Arc::clone(&self.observer),
            Arc::clone(&self.shared),
        );
        self.done.send_replace(false);
        let done = self.done.clone();
        let shared = Arc::clone(&self.shared);
        let observer = Arc::clone(&self.observer);
        let turn_delay = self.turn_delay;
        tokio::spawn(async move {
            Self::run_loop(sequencer, shared, observer, cancel, turn_delay).await;
            done.send_replace(true);
        });
        Ok(())
    }

    /// The meeting task: tick, pause, repeat until terminal
    async fn run_loop(
        mut sequencer: TurnSequencer<B>,
        shared: SharedHandle,
        observer: Arc<dyn MeetingObserver>,
        cancel: CancellationToken,
        turn_delay: Duration,
    ) {
        loop {
            match sequencer.tick(&cancel).await {
                Ok(TickOutcome::Continue) => {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            Self::finish(&mut sequencer, &shared, MeetingPhase::Stopped);
                            return;
                        }
                        _ = tokio::time::sleep(turn_delay) => {}
                    }
                }
                Ok(TickOutcome::Concluded) => {
                    shared.lock().unwrap().running = false;
                    info!("Meeting concluded");
                    return;
                }
                Err(e) if e.is_cancelled() => {
                    debug!("Meeting cancelled");
                    Self::finish(&mut sequencer, &shared, MeetingPhase::Stopped);
                    return;
                }
                Err(e) => {
                    let message = e.to_string();
                    warn!(error = %message, "Meeting failed");
                    {
                        let mut shared = shared.lock().unwrap();
                        shared.last_error = Some(message.clone());
                    }
                    Self::finish(&mut sequencer, &shared, MeetingPhase::Failed);
                    observer.on_error(&message);
                    return;
                }
            }
        }
    }

    /// Enter a terminal phase, discarding any half-written pending entry
    fn finish(sequencer: &mut TurnSequencer<B>, shared: &SharedHandle, phase: MeetingPhase) {
        {
            let mut shared = shared.lock().unwrap();
            shared.transcript.discard_pending();
            shared.awaiting_generation = false;
            shared.running = false;
        }
        sequencer.set_phase(phase);
    }

    /// Signal cancellation and wait for the meeting task to unwind
    ///
    /// A second call with no meeting in flight is a no-op.
    pub async fn stop(&self) {
        let cancel = self.cancel.lock().unwrap().take();
        if let Some(cancel) = cancel {
            info!("Stopping meeting");
            cancel.cancel();
        }
        self.join().await;
    }

    /// Stop the meeting and clear the transcript
    pub async fn reset(&self) {
        self.stop().await;
        let mut shared = self.shared.lock().unwrap();
        shared.transcript.clear();
        shared.interjection = None;
        shared.last_error = None;
        shared.phase = None;
    }

    /// Queue an interjection for the next persona turn
    ///
    /// At most one is held; submitting again before consumption overwrites
    /// the previous one (last-write-wins). Blank input is ignored.
    pub fn submit_interjection(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let mut shared = self.shared.lock().unwrap();
        if shared.interjection.is_some() {
            debug!("Replacing queued interjection");
        }
        shared.interjection = Some(text.to_string());
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().unwrap().running
    }

    /// Consistent snapshot of the meeting read model
    pub fn snapshot(&self) -> MeetingSnapshot {
        let shared = self.shared.lock().unwrap();
        MeetingSnapshot {
            transcript: shared.transcript.entries().to_vec(),
            phase: shared.phase,
            is_running: shared.running,
            is_awaiting_generation: shared.awaiting_generation,
            last_error: shared.last_error.clone(),
        }
    }

    /// Wait for the current meeting task to finish, if one is running
    ///
    /// Safe to call from multiple places; waiters all resolve when the
    /// task signals completion.
    pub async fn join(&self) {
        let mut done = self.done.subscribe();
        let _ = done.wait_for(|finished| *finished).await;
    }
}
