//! Engine-less speech output.

use async_trait::async_trait;
use tracing::info;

use crate::engine::{SpeakOutcome, SpeechOutput};
use crate::error::SpeechOutputResult;
use crate::types::VoiceSettings;
use crate::next_synthesis_id;

/// Logs the text and completes immediately.
///
/// Keeps environments without an installed engine (CI, the text-only demo)
/// running with the same session wiring.
#[derive(Default)]
pub struct NullSpeechOutput {
    voice: VoiceSettings,
}

impl NullSpeechOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SpeechOutput for NullSpeechOutput {
    async fn speak(&self, text: &str) -> SpeechOutputResult<SpeakOutcome> {
        let synthesis_id = next_synthesis_id();
        info!(target: "tts", "[{synthesis_id}] (silent) {text}");
        Ok(SpeakOutcome::Completed)
    }

    async fn stop_immediately(&self) -> SpeechOutputResult<()> {
        Ok(())
    }

    fn voice(&self) -> &VoiceSettings {
        &self.voice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn speak_always_completes() {
        let out = NullSpeechOutput::new();
        let outcome = out.speak("Tell me about yourself.").await.unwrap();
        assert_eq!(outcome, SpeakOutcome::Completed);
    }

    #[tokio::test]
    async fn stop_is_a_noop() {
        let out = NullSpeechOutput::new();
        out.stop_immediately().await.unwrap();
        out.stop_immediately().await.unwrap();
    }

    #[test]
    fn default_voice_settings() {
        let out = NullSpeechOutput::new();
        assert_eq!(out.voice().speech_rate, 180);
        assert!(out.voice().voice.is_none());
    }
}
