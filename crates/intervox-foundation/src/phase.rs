use crate::error::SessionError;
use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use std::sync::Arc;

/// Lifecycle phases of an interview session.
///
/// `Reviewing` is terminal: a new session must be created to start over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Resting between questions; the next `start` speaks the current question.
    Ready,
    /// The output provider is speaking the current question.
    AiSpeaking,
    /// The input provider holds the microphone and transcript chunks arrive.
    Recording,
    /// Resting after a cancel or a provider failure; the same question may be retried.
    WaitingForUserInput,
    /// The final response was submitted and the analysis request is in flight.
    Processing,
    /// Terminal. The analysis, if any, is attached to the session.
    Reviewing,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Reviewing)
    }
}

/// Tracks the session phase and broadcasts transitions to subscribers.
pub struct PhaseTracker {
    phase: Arc<RwLock<SessionPhase>>,
    phase_tx: Sender<SessionPhase>,
    phase_rx: Receiver<SessionPhase>,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    pub fn new() -> Self {
        let (phase_tx, phase_rx) = crossbeam_channel::unbounded();
        Self {
            phase: Arc::new(RwLock::new(SessionPhase::Ready)),
            phase_tx,
            phase_rx,
        }
    }

    pub fn transition(&self, new_phase: SessionPhase) -> Result<(), SessionError> {
        let mut current = self.phase.write();

        let valid = matches!(
            (&*current, &new_phase),
            (SessionPhase::Ready, SessionPhase::AiSpeaking)
                | (SessionPhase::AiSpeaking, SessionPhase::Recording)
                | (SessionPhase::AiSpeaking, SessionPhase::WaitingForUserInput)
                | (SessionPhase::Recording, SessionPhase::WaitingForUserInput)
                | (SessionPhase::Recording, SessionPhase::Ready)
                | (SessionPhase::Recording, SessionPhase::Processing)
                | (SessionPhase::WaitingForUserInput, SessionPhase::Recording)
                | (SessionPhase::WaitingForUserInput, SessionPhase::Ready)
                | (SessionPhase::WaitingForUserInput, SessionPhase::Processing)
                | (SessionPhase::Processing, SessionPhase::Reviewing)
        ) || (!current.is_terminal() && new_phase == SessionPhase::Reviewing);

        if !valid {
            return Err(SessionError::Internal(format!(
                "Invalid phase transition: {:?} -> {:?}",
                *current, new_phase
            )));
        }

        tracing::info!(target: "session", "Phase transition: {:?} -> {:?}", *current, new_phase);
        *current = new_phase;
        let _ = self.phase_tx.send(new_phase);
        Ok(())
    }

    pub fn current(&self) -> SessionPhase {
        *self.phase.read()
    }

    pub fn subscribe(&self) -> Receiver<SessionPhase> {
        self.phase_rx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_turn_cycle_is_valid() {
        let tracker = PhaseTracker::new();
        for phase in [
            SessionPhase::AiSpeaking,
            SessionPhase::Recording,
            SessionPhase::Ready,
            SessionPhase::AiSpeaking,
            SessionPhase::Recording,
            SessionPhase::Processing,
            SessionPhase::Reviewing,
        ] {
            tracker.transition(phase).unwrap();
        }
        assert_eq!(tracker.current(), SessionPhase::Reviewing);
    }

    #[test]
    fn cancel_path_returns_to_waiting() {
        let tracker = PhaseTracker::new();
        tracker.transition(SessionPhase::AiSpeaking).unwrap();
        tracker.transition(SessionPhase::Recording).unwrap();
        tracker.transition(SessionPhase::WaitingForUserInput).unwrap();
        tracker.transition(SessionPhase::Recording).unwrap();
        assert_eq!(tracker.current(), SessionPhase::Recording);
    }

    #[test]
    fn end_early_reaches_reviewing_from_any_active_phase() {
        for setup in [
            vec![],
            vec![SessionPhase::AiSpeaking],
            vec![SessionPhase::AiSpeaking, SessionPhase::Recording],
            vec![SessionPhase::AiSpeaking, SessionPhase::WaitingForUserInput],
        ] {
            let tracker = PhaseTracker::new();
            for phase in setup {
                tracker.transition(phase).unwrap();
            }
            tracker.transition(SessionPhase::Reviewing).unwrap();
            assert!(tracker.current().is_terminal());
        }
    }

    #[test]
    fn reviewing_is_terminal() {
        let tracker = PhaseTracker::new();
        tracker.transition(SessionPhase::Reviewing).unwrap();
        assert!(tracker.transition(SessionPhase::Ready).is_err());
        assert!(tracker.transition(SessionPhase::AiSpeaking).is_err());
        assert!(tracker.transition(SessionPhase::Reviewing).is_err());
    }

    #[test]
    fn skipping_speech_is_rejected() {
        let tracker = PhaseTracker::new();
        assert!(tracker.transition(SessionPhase::Recording).is_err());
        assert_eq!(tracker.current(), SessionPhase::Ready);
    }

    #[test]
    fn subscribers_observe_transitions() {
        let tracker = PhaseTracker::new();
        let rx = tracker.subscribe();
        tracker.transition(SessionPhase::AiSpeaking).unwrap();
        tracker.transition(SessionPhase::Recording).unwrap();
        assert_eq!(rx.try_recv().unwrap(), SessionPhase::AiSpeaking);
        assert_eq!(rx.try_recv().unwrap(), SessionPhase::Recording);
    }
}
