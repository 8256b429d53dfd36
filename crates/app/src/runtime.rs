//! Session bootstrap: question generation plus control-loop spawn.

use std::sync::Arc;

use intervox_foundation::{QuestionPlan, SessionError};
use intervox_llm::ResponseStream;
use intervox_stt::SpeechInput;
use intervox_tts::SpeechOutput;
use tokio::sync::mpsc;
use tracing::info;

use crate::entitlement::EntitlementGate;
use crate::session::{
    generate_questions, ConversationalTurns, InterviewSession, ManualTurns, SessionConfig,
    SessionHandle, SessionNotice, TurnStrategy,
};

const NOTICE_CHANNEL_CAPACITY: usize = 256;

/// Everything needed to launch one interview.
pub struct RuntimeOptions {
    pub config: SessionConfig,
    pub plan: QuestionPlan,
    pub conversational: bool,
}

/// A launched session: its command surface plus the outbound notice stream.
pub struct SessionRuntime {
    pub handle: SessionHandle,
    pub notices: mpsc::Receiver<SessionNotice>,
}

/// Generate the question list, then spawn the session control loop.
pub async fn launch(
    options: RuntimeOptions,
    input: Arc<dyn SpeechInput>,
    output: Arc<dyn SpeechOutput>,
    llm: Arc<dyn ResponseStream>,
    gate: &dyn EntitlementGate,
) -> Result<SessionRuntime, SessionError> {
    let questions = generate_questions(&options.config, &options.plan, llm.as_ref(), gate).await?;

    let strategy: Box<dyn TurnStrategy> = if options.conversational {
        Box::new(ConversationalTurns)
    } else {
        Box::new(ManualTurns)
    };

    let (notices_tx, notices_rx) = mpsc::channel(NOTICE_CHANNEL_CAPACITY);
    let handle = InterviewSession::spawn(
        options.config,
        questions,
        input,
        output,
        llm,
        strategy,
        notices_tx,
    );
    info!(target: "runtime", "Session launched");
    Ok(SessionRuntime {
        handle,
        notices: notices_rx,
    })
}
