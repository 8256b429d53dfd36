//! Speech-input abstraction layer for Intervox
//!
//! This crate provides the capability interface the session uses to capture
//! a candidate's spoken answer: the [`SpeechInput`] trait, the transcript
//! event types it emits, and the per-turn [`TranscriptBuffer`].

use std::sync::atomic::{AtomicU64, Ordering};

pub mod buffer;
pub mod provider;
pub mod push;
pub mod scripted;
pub mod types;

pub use buffer::TranscriptBuffer;
pub use provider::{SpeechInput, SpeechInputError};
pub use push::PushSpeechInput;
pub use scripted::ScriptedSpeechInput;
pub use types::TranscriptEvent;

/// Generates unique utterance IDs
static UTTERANCE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique utterance ID
pub fn next_utterance_id() -> u64 {
    UTTERANCE_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}
