//! Speech-output engine interface.

use async_trait::async_trait;

use crate::error::SpeechOutputResult;
use crate::types::VoiceSettings;

/// How a `speak` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Playback ran to the end of the text.
    Completed,
    /// `stop_immediately` cut the playback off.
    Interrupted,
}

/// A text-to-speech capability.
///
/// `speak` resolves exactly once per call. A call interrupted by
/// `stop_immediately` resolves `Interrupted` rather than `Completed`; the
/// engine must have released the audio device by the time either resolves,
/// so the caller can start a capture turn immediately afterwards.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    /// Speak the given text to completion or interruption.
    async fn speak(&self, text: &str) -> SpeechOutputResult<SpeakOutcome>;

    /// Interrupt any in-flight synthesis. Idempotent; a no-op when idle.
    async fn stop_immediately(&self) -> SpeechOutputResult<()>;

    /// The fixed voice configuration of this engine.
    fn voice(&self) -> &VoiceSettings;
}
