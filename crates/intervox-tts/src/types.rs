//! Voice configuration for speech-output engines.

use serde::{Deserialize, Serialize};

/// Fixed voice configuration. Set at engine construction, not session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Engine-specific voice identifier, `None` for the engine default.
    pub voice: Option<String>,
    /// Speech rate in words per minute.
    pub speech_rate: u32,
    /// Pitch multiplier, 1.0 is the engine default.
    pub pitch: f32,
    /// Volume in 0.0..=1.0.
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice: None,
            speech_rate: 180,
            pitch: 1.0,
            volume: 0.8,
        }
    }
}
