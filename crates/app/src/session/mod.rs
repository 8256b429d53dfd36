//! The conversational interview session.
//!
//! The session owns the question list, the collected responses, and the
//! state machine that sequences speaking a question, listening for the
//! answer, and deciding whether to advance or analyze. All state mutation
//! happens on one control task; provider and stream results are funneled
//! back onto it as epoch-tagged events.

pub mod interview;
pub mod metrics;
pub mod setup;
pub mod turn;


pub use interview::{InterviewSession, SessionHandle};
pub use metrics::SessionMetrics;
pub use setup::generate_questions;
pub use turn::{ConversationalTurns, ManualTurns, TurnStrategy};

use intervox_foundation::{Analysis, SessionPhase};
use std::time::Duration;

/// Static configuration of one interview session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub job_title: String,
    pub experience_level: String,
    /// Resume-analysis summary, read once at startup to bias question
    /// generation. `None` for candidates without an analyzed resume.
    pub resume_summary: Option<String>,
    /// Pause between the end of question playback and the start of capture,
    /// giving the shared audio session time to settle. Not load-bearing for
    /// correctness; zero is valid.
    pub listen_debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            job_title: String::new(),
            experience_level: "mid-level".to_string(),
            resume_summary: None,
            listen_debounce: Duration::from_millis(500),
        }
    }
}

/// Commands accepted by the session control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Speak the current question, then (conversationally) start listening.
    Start,
    /// Record the trimmed transcript as the current question's response.
    Submit,
    /// Discard the current turn's transcript or interrupt playback.
    Cancel,
    /// Re-start capture for the same question after a cancel or an error.
    Listen,
    /// Force the session into review over the responses collected so far.
    EndEarly,
    /// Re-request the analysis after a failed attempt.
    RetryAnalysis,
}

/// Outbound events for the presentation layer.
#[derive(Debug, Clone)]
pub enum SessionNotice {
    Phase(SessionPhase),
    /// Best current hypothesis for the active listening turn.
    Transcript(String),
    /// Banner-ready error text.
    Error { message: String },
    AnalysisReady(Analysis),
}
