//! Error types for speech output.

use intervox_foundation::SessionError;
use thiserror::Error;

/// Speech-output error types
#[derive(Error, Debug)]
pub enum SpeechOutputError {
    /// Engine is not available or not installed
    #[error("Speech engine not available: {0}")]
    EngineNotAvailable(String),

    /// Synthesis or playback failed mid-turn
    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    /// Invalid text input
    #[error("Invalid text input: {0}")]
    InvalidInput(String),

    /// IO error (process spawning, device handles)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SpeechOutputError> for SessionError {
    fn from(err: SpeechOutputError) -> Self {
        match err {
            SpeechOutputError::EngineNotAvailable(msg) => SessionError::DeviceUnavailable(msg),
            SpeechOutputError::Synthesis(msg) => SessionError::DeviceUnavailable(msg),
            SpeechOutputError::InvalidInput(msg) => SessionError::Internal(msg),
            SpeechOutputError::Io(e) => SessionError::DeviceUnavailable(e.to_string()),
        }
    }
}

/// Result type for speech-output operations
pub type SpeechOutputResult<T> = Result<T, SpeechOutputError>;
