//! Error types for the LLM collaborator.

use intervox_foundation::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Response stream failed: {0}")]
    Stream(String),

    #[error("Failed to parse model response: {0}")]
    Parse(String),

    #[error("Client configuration error: {0}")]
    Configuration(String),
}

impl From<LlmError> for SessionError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(msg) => SessionError::Parse(msg),
            LlmError::Http(e) => SessionError::Stream(e.to_string()),
            LlmError::Stream(msg) => SessionError::Stream(msg),
            LlmError::Configuration(msg) => SessionError::InvalidConfiguration(msg),
        }
    }
}
