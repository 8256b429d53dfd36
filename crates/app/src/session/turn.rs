//! Turn-taking policy.

/// How turns flow between the AI interviewer and the candidate.
///
/// Injected at construction; replaces the conversational-vs-manual split
/// with composition instead of an override chain.
pub trait TurnStrategy: Send + Sync {
    /// Begin capture automatically once the question has been spoken.
    fn should_auto_listen(&self) -> bool;

    /// Speak the next question immediately after a submit.
    fn should_auto_advance(&self) -> bool;
}

/// Fully automatic flow: speak, listen, advance.
pub struct ConversationalTurns;

impl TurnStrategy for ConversationalTurns {
    fn should_auto_listen(&self) -> bool {
        true
    }

    fn should_auto_advance(&self) -> bool {
        true
    }
}

/// Every step is user-initiated.
pub struct ManualTurns;

impl TurnStrategy for ManualTurns {
    fn should_auto_listen(&self) -> bool {
        false
    }

    fn should_auto_advance(&self) -> bool {
        false
    }
}
