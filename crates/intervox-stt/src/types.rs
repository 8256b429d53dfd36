//! Transcript event types emitted by speech-input providers.

/// Incremental recognition result for one listening turn.
///
/// Each `Partial`/`Final` carries the best current full-utterance hypothesis,
/// not a delta: consumers should overwrite, not append.
#[derive(Debug, Clone)]
pub enum TranscriptEvent {
    /// Ongoing hypothesis for the current utterance.
    Partial { utterance_id: u64, text: String },
    /// The utterance completed; `text` is the final hypothesis.
    Final { utterance_id: u64, text: String },
    /// Recognition failed mid-turn. The turn should end.
    Error { code: String, message: String },
}

impl TranscriptEvent {
    /// The hypothesis text, if this event carries one.
    pub fn text(&self) -> Option<&str> {
        match self {
            TranscriptEvent::Partial { text, .. } | TranscriptEvent::Final { text, .. } => {
                Some(text)
            }
            TranscriptEvent::Error { .. } => None,
        }
    }
}
