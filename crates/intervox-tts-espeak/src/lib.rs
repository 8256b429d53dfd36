//! eSpeak speech-output engine for Intervox

use async_trait::async_trait;
use intervox_tts::{
    next_synthesis_id, SpeakOutcome, SpeechOutput, SpeechOutputError, SpeechOutputResult,
    VoiceSettings,
};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

mod tests;

/// Speaks through the `espeak`/`espeak-ng` command-line synthesizer.
///
/// Playback goes straight to the system audio device; `stop_immediately`
/// kills the child process, which releases the device before returning.
pub struct EspeakSpeech {
    voice: VoiceSettings,
    command: Mutex<Option<String>>,
    current: AsyncMutex<Option<Child>>,
}

impl EspeakSpeech {
    pub fn new(voice: VoiceSettings) -> Self {
        Self {
            voice,
            command: Mutex::new(None),
            current: AsyncMutex::new(None),
        }
    }

    /// Check whether espeak or espeak-ng is installed.
    pub async fn is_available() -> bool {
        Self::probe_command().await.is_some()
    }

    async fn probe_command() -> Option<String> {
        for candidate in ["espeak", "espeak-ng"] {
            if Command::new(candidate)
                .arg("--version")
                .output()
                .await
                .is_ok()
            {
                return Some(candidate.to_string());
            }
        }
        None
    }

    async fn resolve_command(&self) -> SpeechOutputResult<String> {
        if let Some(cmd) = self.command.lock().clone() {
            return Ok(cmd);
        }
        match Self::probe_command().await {
            Some(cmd) => {
                debug!(target: "tts", "Using speech command: {cmd}");
                *self.command.lock() = Some(cmd.clone());
                Ok(cmd)
            }
            None => Err(SpeechOutputError::EngineNotAvailable(
                "espeak not found. Please install espeak or espeak-ng.".to_string(),
            )),
        }
    }

    /// Map the fixed voice settings onto espeak flags.
    fn build_args(&self, text: &str) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(voice_id) = &self.voice.voice {
            args.push("-v".to_string());
            args.push(voice_id.clone());
        }

        args.push("-s".to_string());
        args.push(self.voice.speech_rate.to_string());

        let pitch_value = ((self.voice.pitch * 50.0) as i64).clamp(0, 99);
        args.push("-p".to_string());
        args.push(pitch_value.to_string());

        let volume_value = ((self.voice.volume * 200.0) as i64).clamp(0, 200);
        args.push("-a".to_string());
        args.push(volume_value.to_string());

        args.push(text.to_string());
        args
    }
}

#[async_trait]
impl SpeechOutput for EspeakSpeech {
    async fn speak(&self, text: &str) -> SpeechOutputResult<SpeakOutcome> {
        if text.trim().is_empty() {
            return Err(SpeechOutputError::InvalidInput(
                "empty text input".to_string(),
            ));
        }

        let cmd = self.resolve_command().await?;
        let synthesis_id = next_synthesis_id();

        {
            let mut guard = self.current.lock().await;
            if guard.is_some() {
                return Err(SpeechOutputError::Synthesis(
                    "another synthesis is in progress".to_string(),
                ));
            }
            let child = Command::new(&cmd)
                .args(self.build_args(text))
                .kill_on_drop(true)
                .spawn()?;
            debug!(target: "tts", "[{synthesis_id}] speaking {} chars", text.len());
            *guard = Some(child);
        }

        loop {
            tokio::time::sleep(Duration::from_millis(15)).await;
            let mut guard = self.current.lock().await;
            match guard.as_mut() {
                // stop_immediately reaped the child.
                None => return Ok(SpeakOutcome::Interrupted),
                Some(child) => match child.try_wait() {
                    Ok(Some(status)) => {
                        *guard = None;
                        if status.success() {
                            debug!(target: "tts", "[{synthesis_id}] playback complete");
                            return Ok(SpeakOutcome::Completed);
                        }
                        return Err(SpeechOutputError::Synthesis(format!(
                            "espeak exited with {status}"
                        )));
                    }
                    Ok(None) => continue,
                    Err(e) => {
                        *guard = None;
                        return Err(SpeechOutputError::Io(e));
                    }
                },
            }
        }
    }

    async fn stop_immediately(&self) -> SpeechOutputResult<()> {
        let mut guard = self.current.lock().await;
        if let Some(mut child) = guard.take() {
            if let Err(e) = child.kill().await {
                warn!(target: "tts", "Failed to kill espeak child: {e}");
            }
        }
        Ok(())
    }

    fn voice(&self) -> &VoiceSettings {
        &self.voice
    }
}
