use serde::{Deserialize, Serialize};

/// Speech platform selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpeechProviderConfig {
    /// HTTP text-to-speech service. `speak` resolves when the service
    /// reports the utterance finished.
    Remote {
        api_url: String,
        api_key: Option<String>,
    },
    /// Renders nothing and completes immediately. The degradation target
    /// when no voice is available, and the default for tests.
    Silent,
}

/// Narration service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NarrationConfig {
    pub provider: SpeechProviderConfig,
    /// BCP 47 tag narrated for `Primary` segments.
    pub base_language: String,
    /// BCP 47 tag narrated for `Foreign` (Latin-script) segments.
    pub foreign_language: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Pause between consecutive segments. Not inserted after the last one.
    pub inter_segment_pause_ms: u64,
    /// The platform voice list may be populated asynchronously; playback
    /// retries this many times before proceeding voiceless.
    pub voice_list_retry_attempts: u32,
    pub voice_list_retry_interval_ms: u64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            provider: SpeechProviderConfig::Silent,
            base_language: "vi-VN".to_string(),
            foreign_language: "en-US".to_string(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            inter_segment_pause_ms: 150,
            voice_list_retry_attempts: 5,
            voice_list_retry_interval_ms: 200,
        }
    }
}

impl NarrationConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything absent or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let provider = match std::env::var("NARRATION_PROVIDER")
            .map(|v| v.to_lowercase())
            .as_deref()
        {
            Ok("remote") => SpeechProviderConfig::Remote {
                api_url: std::env::var("TTS_API_URL")
                    .unwrap_or_else(|_| "http://localhost:5000".to_string()),
                api_key: std::env::var("TTS_API_KEY").ok(),
            },
            _ => SpeechProviderConfig::Silent,
        };

        Self {
            provider,
            base_language: std::env::var("NARRATION_BASE_LANGUAGE")
                .unwrap_or(defaults.base_language),
            foreign_language: std::env::var("NARRATION_FOREIGN_LANGUAGE")
                .unwrap_or(defaults.foreign_language),
            rate: env_parsed("NARRATION_RATE", defaults.rate),
            pitch: env_parsed("NARRATION_PITCH", defaults.pitch),
            volume: env_parsed("NARRATION_VOLUME", defaults.volume),
            inter_segment_pause_ms: env_parsed(
                "NARRATION_SEGMENT_PAUSE_MS",
                defaults.inter_segment_pause_ms,
            ),
            voice_list_retry_attempts: env_parsed(
                "NARRATION_VOICE_RETRY_ATTEMPTS",
                defaults.voice_list_retry_attempts,
            ),
            voice_list_retry_interval_ms: env_parsed(
                "NARRATION_VOICE_RETRY_INTERVAL_MS",
                defaults.voice_list_retry_interval_ms,
            ),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
