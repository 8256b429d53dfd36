//! Application configuration, loaded from a TOML file.

use std::path::Path;

use intervox_foundation::SessionError;
use intervox_tts::VoiceSettings;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Top-level configuration. Every field has a default, so a missing or
/// partial file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub voice: VoiceSettings,
    pub llm: LlmSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// OpenAI-compatible API root, without a trailing slash.
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key. The key itself never lives
    /// in the config file.
    pub api_key_env: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Speak, listen, and advance automatically; `false` makes every step
    /// user-initiated.
    pub conversational: bool,
    /// Pause between question playback ending and capture starting.
    pub listen_debounce_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            conversational: true,
            listen_debounce_ms: 500,
        }
    }
}

impl AppConfig {
    /// Load from a TOML file. A missing file yields the defaults; a present
    /// but malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            info!(target: "config", "No config file at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            SessionError::InvalidConfiguration(format!(
                "failed to read {}: {e}",
                path.display()
            ))
        })?;
        let config: Self = toml::from_str(&text).map_err(|e| {
            SessionError::InvalidConfiguration(format!(
                "failed to parse {}: {e}",
                path.display()
            ))
        })?;
        info!(target: "config", "Loaded config from {}", path.display());
        Ok(config)
    }
}
