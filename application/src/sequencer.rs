//! Turn sequencer
//!
//! The meeting state machine: walks the agenda × persona grid one tick at
//! a time, interleaves user interjections, and drives the generation
//! gateway for agenda building, persona turns, and the closing summary.

use crate::agenda::AgendaBuilder;
use crate::error::MeetingError;
use crate::gateway::GenerationGateway;
use crate::ports::generator::{GenerationRequest, TextGenerator};
use crate::ports::observer::MeetingObserver;
use roundtable_domain::{
    DiscussionPrompts, MeetingPhase, Persona, Speaker, Topic, Transcript, TranscriptEntry,
};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// State shared between the running meeting task and the controller's
/// public surface (read model, interjection slot)
#[derive(Default)]
pub(crate) struct MeetingShared {
    pub(crate) transcript: Transcript,
    /// At most one queued interjection; a second submission before
    /// consumption overwrites the first
    pub(crate) interjection: Option<String>,
    pub(crate) phase: Option<MeetingPhase>,
    pub(crate) running: bool,
    pub(crate) awaiting_generation: bool,
    pub(crate) last_error: Option<String>,
}

pub(crate) type SharedHandle = Arc<Mutex<MeetingShared>>;

/// Result of one sequencer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Schedule another tick after the inter-turn delay
    Continue,
    /// The meeting ran to completion; no further ticks
    Concluded,
}

/// Drives meeting progress, one transition per tick
pub struct TurnSequencer<B: TextGenerator> {
    topic: Topic,
    personas: Vec<Persona>,
    gateway: Arc<GenerationGateway<B>>,
    builder: AgendaBuilder,
    observer: Arc<dyn MeetingObserver>,
    shared: SharedHandle,
    phase: MeetingPhase,
    agenda: Vec<String>,
    agenda_index: usize,
    /// `None` before the first turn
    speaker_index: Option<usize>,
}

impl<B: TextGenerator> TurnSequencer<B> {
    pub(crate) fn new(
        topic: Topic,
        personas: Vec<Persona>,
        gateway: Arc<GenerationGateway<B>>,
        builder: AgendaBuilder,
        observer: Arc<dyn MeetingObserver>,
        shared: SharedHandle,
    ) -> Self {
        let sequencer = Self {
            topic,
            personas,
            gateway,
            builder,
            observer,
            shared,
            phase: MeetingPhase::AgendaPending,
            agenda: Vec::new(),
            agenda_index: 0,
            speaker_index: None,
        };
        sequencer.shared.lock().unwrap().phase = Some(MeetingPhase::AgendaPending);
        sequencer
    }

    pub fn phase(&self) -> MeetingPhase {
        self.phase
    }

    /// Run one transition of the state machine
    pub async fn tick(&mut self, cancel: &CancellationToken) -> Result<TickOutcome, MeetingError> {
        if cancel.is_cancelled() {
            return Err(MeetingError::Cancelled);
        }
        match self.phase {
            MeetingPhase::AgendaPending => self.tick_agenda(cancel).await,
            MeetingPhase::Discussing => self.tick_turn(cancel).await,
            MeetingPhase::Summarizing => self.tick_summary(cancel).await,
            // Terminal phases schedule no work
            _ => Ok(TickOutcome::Concluded),
        }
    }

    /// Mark a phase transition and notify the observer
    pub(crate) fn set_phase(&mut self, phase: MeetingPhase) {
        debug!(from = self.phase.as_str(), to = phase.as_str(), "Phase transition");
        self.phase = phase;
        self.shared.lock().unwrap().phase = Some(phase);
        self.observer.on_phase(phase);
    }

    async fn tick_agenda(&mut self, cancel: &CancellationToken) -> Result<TickOutcome, MeetingError> {
        self.set_awaiting(true);
        let built = self
            .builder
            .build(self.gateway.as_ref(), &self.topic, cancel)
            .await;
        self.set_awaiting(false);
        let agenda = built?;

        let listing = agenda
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, item))
            .collect::<Vec<_>>()
            .join("\n");
        self.agenda = agenda;
        self.agenda_index = 0;
        self.speaker_index = None;

        let entry = {
            let mut shared = self.shared.lock().unwrap();
            shared
                .transcript
                .push_notice(format!("Agenda for this discussion:\n{listing}"))
                .clone()
        };
        self.observer.on_entry(&entry);
        self.set_phase(MeetingPhase::Discussing);
        Ok(TickOutcome::Continue)
    }

    async fn tick_turn(&mut self, cancel: &CancellationToken) -> Result<TickOutcome, MeetingError> {
        if self.personas.is_empty() {
            return Err(MeetingError::PreconditionFailed(
                "no personas to take turns".to_string(),
            ));
        }

        // Advance the grid: next speaker, wrapping into the next agenda point
        let (next_speaker, next_agenda, entering_point) = match self.speaker_index {
            None => (0, self.agenda_index, true),
            Some(s) if s + 1 >= self.personas.len() => (0, self.agenda_index + 1, true),
            Some(s) => (s + 1, self.agenda_index, false),
        };
        if next_agenda >= self.agenda.len() {
            self.set_phase(MeetingPhase::Summarizing);
            return Ok(TickOutcome::Continue);
        }
        self.speaker_index = Some(next_speaker);
        self.agenda_index = next_agenda;
        let persona = self.personas[next_speaker].clone();
        let agenda_item = self.agenda[next_agenda].clone();

        // Consume the queued interjection, if any, into this turn
        let interjection = self.shared.lock().unwrap().interjection.take();

        let (entry_id, prompt, appended) = {
            let mut shared = self.shared.lock().unwrap();
            let mut appended: Vec<TranscriptEntry> = Vec::new();
            if let Some(text) = interjection.as_deref() {
                appended.push(shared.transcript.push_interjection(text).clone());
            }
            if entering_point {
                appended.push(
                    shared
                        .transcript
                        .push_notice(format!("Moving on to: {agenda_item}"))
                        .clone(),
                );
            }
            let prompt = DiscussionPrompts::turn_prompt(
                self.topic.content(),
                &agenda_item,
                &shared.transcript.rendered(),
                interjection.as_deref(),
            );
            let pending = shared
                .transcript
                .begin_turn(Speaker::from(&persona))
                .map_err(|e| MeetingError::PreconditionFailed(e.to_string()))?;
            appended.push(pending.clone());
            (pending.id, prompt, appended)
        };
        for entry in &appended {
            self.observer.on_entry(entry);
        }

        info!(speaker = persona.name(), agenda_item = %agenda_item, "Persona turn");
        let request = GenerationRequest::new(
            prompt,
            DiscussionPrompts::persona_system(persona.name(), persona.role()),
        );
        self.set_awaiting(true);
        let result = self.gateway.generate(&request, cancel).await;
        self.set_awaiting(false);

        match result {
            Ok(text) => {
                let entry = {
                    let mut shared = self.shared.lock().unwrap();
                    shared
                        .transcript
                        .finalize(entry_id, text)
                        .map_err(|e| MeetingError::PreconditionFailed(e.to_string()))?
                        .clone()
                };
                self.observer.on_entry_finalized(&entry);
                Ok(TickOutcome::Continue)
            }
            Err(e) => {
                self.shared.lock().unwrap().transcript.discard_pending();
                Err(e)
            }
        }
    }

    async fn tick_summary(&mut self, cancel: &CancellationToken) -> Result<TickOutcome, MeetingError> {
        let (entry_id, prompt, appended) = {
            let mut shared = self.shared.lock().unwrap();
            let notice = shared
                .transcript
                .push_notice("That covers the agenda. Time to wrap up.")
                .clone();
            let prompt = DiscussionPrompts::summary_prompt(
                self.topic.content(),
                &shared.transcript.rendered(),
            );
            let pending = shared
                .transcript
                .begin_notice()
                .map_err(|e| MeetingError::PreconditionFailed(e.to_string()))?
                .clone();
            (pending.id, prompt, vec![notice, pending])
        };
        for entry in &appended {
            self.observer.on_entry(entry);
        }

        info!("Generating closing summary");
        let request = GenerationRequest::new(prompt, DiscussionPrompts::summary_system());
        self.set_awaiting(true);
        let result = self.gateway.generate(&request, cancel).await;
        self.set_awaiting(false);

        match result {
            Ok(text) => {
                let (summary, closing) = {
                    let mut shared = self.shared.lock().unwrap();
                    let summary = shared
                        .transcript
                        .finalize(entry_id, text)
                        .map_err(|e| MeetingError::PreconditionFailed(e.to_string()))?
                        .clone();
                    let closing = shared
                        .transcript
                        .push_notice("Meeting adjourned. Thanks for joining.")
                        .clone();
                    (summary, closing)
                };
                self.observer.on_entry_finalized(&summary);
                self.observer.on_entry(&closing);
                self.set_phase(MeetingPhase::Concluded);
                Ok(TickOutcome::Concluded)
            }
            Err(e) => {
                self.shared.lock().unwrap().transcript.discard_pending();
                Err(e)
            }
        }
    }

    fn set_awaiting(&self, awaiting: bool) {
        self.shared.lock().unwrap().awaiting_generation = awaiting;
    }
}
