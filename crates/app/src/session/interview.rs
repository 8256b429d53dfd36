//! The interview session state machine.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use intervox_foundation::{Analysis, PhaseTracker, Question, SessionError, SessionPhase};
use intervox_llm::{collect_stream, parse_analysis, prompt, ResponseStream};
use intervox_stt::{SpeechInput, TranscriptBuffer, TranscriptEvent};
use intervox_tts::{SpeakOutcome, SpeechOutput, SpeechOutputError};

use super::metrics::SessionMetrics;
use super::turn::TurnStrategy;
use super::{SessionCommand, SessionConfig, SessionNotice};

/// Provider and stream results funneled back onto the control task.
///
/// Each event carries the turn epoch it was spawned under; an event whose
/// epoch no longer matches the session's is dropped on receipt, so late
/// callbacks from a cancelled turn or an abandoned analysis cannot mutate
/// newer state.
#[derive(Debug)]
pub(crate) enum TurnEvent {
    SpeechFinished {
        epoch: u64,
        outcome: Result<SpeakOutcome, SpeechOutputError>,
    },
    ListenReady {
        epoch: u64,
    },
    Transcript {
        epoch: u64,
        event: TranscriptEvent,
    },
    AnalysisDone {
        epoch: u64,
        result: Result<Analysis, SessionError>,
    },
}

impl TurnEvent {
    fn epoch(&self) -> u64 {
        match self {
            TurnEvent::SpeechFinished { epoch, .. }
            | TurnEvent::ListenReady { epoch }
            | TurnEvent::Transcript { epoch, .. }
            | TurnEvent::AnalysisDone { epoch, .. } => *epoch,
        }
    }
}

/// Command surface of a running session.
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    join: JoinHandle<()>,
}

impl SessionHandle {
    pub async fn send(&self, command: SessionCommand) {
        if self.commands.send(command).await.is_err() {
            warn!(target: "session", "Session control loop is gone; dropping {command:?}");
        }
    }

    pub async fn start(&self) {
        self.send(SessionCommand::Start).await;
    }

    pub async fn submit(&self) {
        self.send(SessionCommand::Submit).await;
    }

    pub async fn cancel(&self) {
        self.send(SessionCommand::Cancel).await;
    }

    pub async fn listen(&self) {
        self.send(SessionCommand::Listen).await;
    }

    pub async fn end_early(&self) {
        self.send(SessionCommand::EndEarly).await;
    }

    pub async fn retry_analysis(&self) {
        self.send(SessionCommand::RetryAnalysis).await;
    }

    /// Close the command channel and wait for the control loop to finish.
    pub async fn shutdown(self) {
        drop(self.commands);
        let _ = self.join.await;
    }
}

/// Owns one interview from the first spoken question to the terminal review.
///
/// The microphone and the speaker are exclusive shared resources: at most
/// one of {output speaking, input capturing} is active at any instant, and
/// the holder is fully released before the other is acquired.
pub struct InterviewSession {
    config: SessionConfig,
    strategy: Box<dyn TurnStrategy>,
    questions: Vec<Question>,
    index: usize,
    responses: Vec<String>,
    analysis: Option<Analysis>,
    buffer: TranscriptBuffer,
    phase: PhaseTracker,
    epoch: u64,
    input: Arc<dyn SpeechInput>,
    output: Arc<dyn SpeechOutput>,
    llm: Arc<dyn ResponseStream>,
    events_tx: mpsc::Sender<TurnEvent>,
    notices: mpsc::Sender<SessionNotice>,
    metrics: Arc<SessionMetrics>,
    forwarder: Option<JoinHandle<()>>,
}

impl InterviewSession {
    pub(crate) fn new(
        config: SessionConfig,
        questions: Vec<Question>,
        input: Arc<dyn SpeechInput>,
        output: Arc<dyn SpeechOutput>,
        llm: Arc<dyn ResponseStream>,
        strategy: Box<dyn TurnStrategy>,
        notices: mpsc::Sender<SessionNotice>,
    ) -> (Self, mpsc::Receiver<TurnEvent>) {
        let (events_tx, events_rx) = mpsc::channel(64);
        let session = Self {
            config,
            strategy,
            questions,
            index: 0,
            responses: Vec::new(),
            analysis: None,
            buffer: TranscriptBuffer::new(),
            phase: PhaseTracker::new(),
            epoch: 0,
            input,
            output,
            llm,
            events_tx,
            notices,
            metrics: Arc::new(SessionMetrics::default()),
            forwarder: None,
        };
        (session, events_rx)
    }

    /// Spawn the control loop and return its command surface.
    pub fn spawn(
        config: SessionConfig,
        questions: Vec<Question>,
        input: Arc<dyn SpeechInput>,
        output: Arc<dyn SpeechOutput>,
        llm: Arc<dyn ResponseStream>,
        strategy: Box<dyn TurnStrategy>,
        notices: mpsc::Sender<SessionNotice>,
    ) -> SessionHandle {
        let (commands_tx, commands_rx) = mpsc::channel(16);
        let (session, events_rx) =
            Self::new(config, questions, input, output, llm, strategy, notices);
        let join = tokio::spawn(session.run(commands_rx, events_rx));
        SessionHandle {
            commands: commands_tx,
            join,
        }
    }

    /// Serialized control loop: every transition happens here.
    pub(crate) async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut events: mpsc::Receiver<TurnEvent>,
    ) {
        info!(
            target: "session",
            "Session control loop starting ({} questions for {})",
            self.questions.len(),
            self.config.job_title
        );
        loop {
            tokio::select! {
                maybe_command = commands.recv() => match maybe_command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                Some(event) = events.recv() => self.handle_event(event).await,
            }
        }
        // Release whatever device is still held.
        self.stop_forwarder();
        let _ = self.input.stop().await;
        let _ = self.output.stop_immediately().await;
        info!(target: "session", "Session control loop stopped");
    }

    pub(crate) async fn handle_command(&mut self, command: SessionCommand) {
        debug!(target: "session", "Command {command:?} in phase {:?}", self.phase.current());
        match command {
            SessionCommand::Start => self.start().await,
            SessionCommand::Submit => self.submit().await,
            SessionCommand::Cancel => self.cancel().await,
            SessionCommand::Listen => self.listen().await,
            SessionCommand::EndEarly => self.end_early().await,
            SessionCommand::RetryAnalysis => self.retry_analysis(),
        }
    }

    pub(crate) async fn handle_event(&mut self, event: TurnEvent) {
        if event.epoch() != self.epoch {
            self.metrics.stale_events.fetch_add(1, Ordering::Relaxed);
            debug!(target: "session", "Dropping stale event from epoch {}", event.epoch());
            return;
        }
        match event {
            TurnEvent::SpeechFinished { outcome, .. } => self.on_speech_finished(outcome).await,
            TurnEvent::ListenReady { .. } => {
                if self.phase.current() == SessionPhase::AiSpeaking {
                    self.begin_recording().await;
                }
            }
            TurnEvent::Transcript { event, .. } => self.on_transcript(event).await,
            TurnEvent::AnalysisDone { result, .. } => self.on_analysis_done(result),
        }
    }

    async fn start(&mut self) {
        if self.phase.current() != SessionPhase::Ready {
            warn!(target: "session", "Ignoring start in phase {:?}", self.phase.current());
            return;
        }
        if self.config.job_title.trim().is_empty() || self.questions.is_empty() {
            self.surface(SessionError::InvalidConfiguration(
                "A job title and at least one question are required.".to_string(),
            ));
            return;
        }
        if self.transition(SessionPhase::AiSpeaking) {
            self.metrics.turns_started.fetch_add(1, Ordering::Relaxed);
            self.speak_current_question();
        }
    }

    fn speak_current_question(&self) {
        let epoch = self.epoch;
        let text = self.questions[self.index].text.clone();
        let output = Arc::clone(&self.output);
        let events = self.events_tx.clone();
        info!(target: "session", "Speaking question {} of {}", self.index + 1, self.questions.len());
        tokio::spawn(async move {
            let outcome = output.speak(&text).await;
            let _ = events.send(TurnEvent::SpeechFinished { epoch, outcome }).await;
        });
    }

    async fn on_speech_finished(&mut self, outcome: Result<SpeakOutcome, SpeechOutputError>) {
        if self.phase.current() != SessionPhase::AiSpeaking {
            return;
        }
        match outcome {
            Ok(SpeakOutcome::Completed) => {
                if !self.strategy.should_auto_listen() {
                    self.transition(SessionPhase::WaitingForUserInput);
                    return;
                }
                // The output provider has released the audio session; wait out
                // the configured settle time before taking the microphone.
                let debounce = self.config.listen_debounce;
                let epoch = self.epoch;
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    if !debounce.is_zero() {
                        tokio::time::sleep(debounce).await;
                    }
                    let _ = events.send(TurnEvent::ListenReady { epoch }).await;
                });
            }
            // The cancel path has already transitioned and bumped the epoch;
            // an interruption seen here means nothing is left to do.
            Ok(SpeakOutcome::Interrupted) => {}
            Err(e) => {
                self.surface(e.into());
                self.transition(SessionPhase::WaitingForUserInput);
            }
        }
    }

    async fn begin_recording(&mut self) {
        match self.input.start().await {
            Ok(mut rx) => {
                self.buffer.clear();
                if self.transition(SessionPhase::Recording) {
                    let epoch = self.epoch;
                    let events = self.events_tx.clone();
                    self.forwarder = Some(tokio::spawn(async move {
                        while let Some(event) = rx.recv().await {
                            if events.send(TurnEvent::Transcript { epoch, event }).await.is_err() {
                                break;
                            }
                        }
                    }));
                }
            }
            Err(e) => {
                // Fatal to starting this turn, never auto-retried: rest where
                // the user can retry manually.
                if self.phase.current() == SessionPhase::AiSpeaking {
                    self.transition(SessionPhase::WaitingForUserInput);
                }
                self.surface(e.into());
            }
        }
    }

    async fn on_transcript(&mut self, event: TranscriptEvent) {
        if self.phase.current() != SessionPhase::Recording {
            return;
        }
        match event {
            TranscriptEvent::Partial { text, .. } | TranscriptEvent::Final { text, .. } => {
                self.buffer.update(&text);
                self.notify(SessionNotice::Transcript(text));
            }
            TranscriptEvent::Error { code, message } => {
                self.surface(SessionError::DeviceUnavailable(format!("{code}: {message}")));
                // End the turn; collected responses and the partial hypothesis
                // survive for a manual submit or retry.
                self.epoch += 1;
                self.stop_forwarder();
                let _ = self.input.stop().await;
                self.transition(SessionPhase::WaitingForUserInput);
            }
        }
    }

    async fn submit(&mut self) {
        let phase = self.phase.current();
        if !matches!(
            phase,
            SessionPhase::Recording | SessionPhase::WaitingForUserInput
        ) {
            warn!(target: "session", "Ignoring submit in phase {phase:?}");
            return;
        }
        let Some(text) = self.buffer.take_trimmed() else {
            debug!(target: "session", "Ignoring submit with blank transcript");
            self.metrics.blank_submits.fetch_add(1, Ordering::Relaxed);
            return;
        };

        if self.responses.len() > self.index {
            self.responses[self.index] = text;
        } else {
            self.responses.push(text);
        }
        self.metrics.submissions.fetch_add(1, Ordering::Relaxed);
        info!(target: "session", "Recorded response for question {}", self.index + 1);

        // Release the microphone before any further transition.
        self.epoch += 1;
        self.stop_forwarder();
        if let Err(e) = self.input.stop().await {
            self.surface(e.into());
        }

        if self.index + 1 == self.questions.len() {
            if self.transition(SessionPhase::Processing) {
                self.request_analysis();
            }
        } else {
            self.index += 1;
            if self.transition(SessionPhase::Ready) && self.strategy.should_auto_advance() {
                self.start().await;
            }
        }
    }

    async fn cancel(&mut self) {
        match self.phase.current() {
            SessionPhase::Recording => {
                self.epoch += 1;
                self.stop_forwarder();
                self.buffer.clear();
                if let Err(e) = self.input.stop().await {
                    self.surface(e.into());
                }
                self.metrics.cancels.fetch_add(1, Ordering::Relaxed);
                self.transition(SessionPhase::WaitingForUserInput);
            }
            SessionPhase::AiSpeaking => {
                self.epoch += 1;
                // Interrupt playback before the transition.
                if let Err(e) = self.output.stop_immediately().await {
                    self.surface(e.into());
                }
                self.metrics.cancels.fetch_add(1, Ordering::Relaxed);
                self.transition(SessionPhase::WaitingForUserInput);
            }
            phase => warn!(target: "session", "Ignoring cancel in phase {phase:?}"),
        }
    }

    async fn listen(&mut self) {
        if self.phase.current() != SessionPhase::WaitingForUserInput {
            warn!(target: "session", "Ignoring listen in phase {:?}", self.phase.current());
            return;
        }
        self.epoch += 1;
        self.begin_recording().await;
    }

    async fn end_early(&mut self) {
        let phase = self.phase.current();
        match phase {
            SessionPhase::Reviewing => {
                warn!(target: "session", "Ignoring end_early: session already reviewing");
            }
            // The analysis request is already in flight over the full
            // response set; let it land.
            SessionPhase::Processing => {
                self.transition(SessionPhase::Reviewing);
            }
            _ => {
                self.epoch += 1;
                self.stop_forwarder();
                if phase == SessionPhase::AiSpeaking {
                    if let Err(e) = self.output.stop_immediately().await {
                        self.surface(e.into());
                    }
                }
                if phase == SessionPhase::Recording {
                    if let Err(e) = self.input.stop().await {
                        self.surface(e.into());
                    }
                }
                // The unanswered question is simply omitted.
                self.buffer.clear();
                self.transition(SessionPhase::Reviewing);
                if self.responses.is_empty() {
                    self.surface(SessionError::InvalidConfiguration(
                        "No responses were collected; there is nothing to analyze.".to_string(),
                    ));
                } else {
                    self.request_analysis();
                }
            }
        }
    }

    fn request_analysis(&self) {
        let answered = self.responses.len();
        let analysis_prompt =
            prompt::analysis_prompt(&self.questions[..answered], &self.responses);
        let epoch = self.epoch;
        let llm = Arc::clone(&self.llm);
        let events = self.events_tx.clone();
        self.metrics.analysis_requests.fetch_add(1, Ordering::Relaxed);
        info!(target: "session", "Requesting analysis over {answered} response(s)");
        tokio::spawn(async move {
            let result = async {
                let rx = llm.generate(&analysis_prompt).await?;
                let text = collect_stream(rx).await?;
                parse_analysis(&text)
            }
            .await
            .map_err(SessionError::from);
            let _ = events.send(TurnEvent::AnalysisDone { epoch, result }).await;
        });
    }

    fn on_analysis_done(&mut self, result: Result<Analysis, SessionError>) {
        if self.analysis.is_some() {
            return;
        }
        if self.phase.current() == SessionPhase::Processing {
            self.transition(SessionPhase::Reviewing);
        }
        match result {
            Ok(analysis) => {
                info!(target: "session", "Analysis ready (overall {:.1})", analysis.overall_score);
                self.notify(SessionNotice::AnalysisReady(analysis.clone()));
                self.analysis = Some(analysis);
            }
            // The session stays in Reviewing with no analysis; retry is
            // user-initiated.
            Err(e) => self.surface(e),
        }
    }

    fn retry_analysis(&mut self) {
        if self.phase.current() == SessionPhase::Reviewing
            && self.analysis.is_none()
            && !self.responses.is_empty()
        {
            self.metrics.analysis_retries.fetch_add(1, Ordering::Relaxed);
            self.request_analysis();
        } else {
            warn!(target: "session", "Ignoring retry_analysis: nothing to retry");
        }
    }

    fn transition(&mut self, phase: SessionPhase) -> bool {
        match self.phase.transition(phase) {
            Ok(()) => {
                self.notify(SessionNotice::Phase(phase));
                true
            }
            Err(e) => {
                self.surface(e);
                false
            }
        }
    }

    fn stop_forwarder(&mut self) {
        if let Some(handle) = self.forwarder.take() {
            handle.abort();
        }
    }

    fn surface(&self, error: SessionError) {
        warn!(target: "session", "{error}");
        self.metrics.errors.fetch_add(1, Ordering::Relaxed);
        self.notify(SessionNotice::Error {
            message: error.user_message(),
        });
    }

    fn notify(&self, notice: SessionNotice) {
        if let Err(e) = self.notices.try_send(notice) {
            debug!(target: "session", "Dropping notice: {e}");
        }
    }

    // Observers, used by the runtime and by tests.

    pub fn phase(&self) -> SessionPhase {
        self.phase.current()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn transcript(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn metrics(&self) -> Arc<SessionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// `responses.len() <= index + 1 <= questions.len()` holds after every
    /// transition.
    pub fn length_invariant_holds(&self) -> bool {
        self.responses.len() <= self.index + 1 && self.index + 1 <= self.questions.len()
    }
}
