//! Speech-output abstraction layer for Intervox
//!
//! This crate provides the capability interface the session uses to speak a
//! question aloud: the [`SpeechOutput`] trait, fixed voice settings, and the
//! error types engines report.

use std::sync::atomic::{AtomicU64, Ordering};

pub mod engine;
pub mod error;
pub mod null;
pub mod types;

pub use engine::{SpeakOutcome, SpeechOutput};
pub use error::{SpeechOutputError, SpeechOutputResult};
pub use null::NullSpeechOutput;
pub use types::VoiceSettings;

/// Generates unique synthesis IDs
static SYNTHESIS_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique synthesis ID
pub fn next_synthesis_id() -> u64 {
    SYNTHESIS_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}
