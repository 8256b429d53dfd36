//! The speech-input capability interface.

use async_trait::async_trait;
use intervox_foundation::SessionError;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::types::TranscriptEvent;

/// Errors that can occur in speech-input providers.
#[derive(Debug, Error)]
pub enum SpeechInputError {
    #[error("Microphone or speech-recognition permission denied")]
    PermissionDenied,

    #[error("Recognizer unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Capture already active")]
    AlreadyActive,

    #[error("Recognition engine error: {0}")]
    Engine(String),
}

impl From<SpeechInputError> for SessionError {
    fn from(err: SpeechInputError) -> Self {
        match err {
            SpeechInputError::PermissionDenied => SessionError::PermissionDenied {
                resource: "microphone".to_string(),
            },
            SpeechInputError::DeviceUnavailable(msg) => SessionError::DeviceUnavailable(msg),
            SpeechInputError::AlreadyActive => {
                SessionError::Internal("speech input already active".to_string())
            }
            SpeechInputError::Engine(msg) => SessionError::DeviceUnavailable(msg),
        }
    }
}

/// A streaming speech-to-text capability.
///
/// At most one capture may be active per provider instance. Implementations
/// must fully tear down their device tap before `stop` returns, so the
/// caller can hand the audio session to a speech-output turn immediately
/// afterwards.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    /// Begin capturing. Events for the new turn arrive on the returned
    /// channel; the channel closes when capture stops.
    async fn start(&self) -> Result<mpsc::Receiver<TranscriptEvent>, SpeechInputError>;

    /// Stop capturing and release the device. Idempotent: safe to call from
    /// any state, a no-op when not capturing.
    async fn stop(&self) -> Result<(), SpeechInputError>;
}
