pub mod remote;
pub mod silent;

use crate::config::SpeechProviderConfig;
use crate::error::NarrationResult;
use crate::voice::Voice;
use async_trait::async_trait;
use std::sync::Arc;

/// One utterance handed to the speech platform.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct UtteranceRequest {
    pub text: String,
    pub language_tag: String,
    pub voice_id: Option<String>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// The process-wide speech output channel.
///
/// `speak` resolves at the natural end of the utterance; the sequencer
/// relies on that to keep segments strictly ordered. `cancel_all` stops
/// whatever is in flight on the shared audio device.
#[async_trait]
pub trait SpeechPlatform: Send + Sync {
    /// The available voices. May legitimately be empty while the platform
    /// is still enumerating; callers re-query rather than block.
    async fn list_voices(&self) -> NarrationResult<Vec<Voice>>;

    /// Speak one utterance to completion.
    async fn speak(&self, request: &UtteranceRequest) -> NarrationResult<()>;

    /// Stop any in-flight playback. Best-effort and idempotent.
    async fn cancel_all(&self);
}

/// Create a platform instance based on configuration.
pub fn create_platform(config: &SpeechProviderConfig) -> NarrationResult<Arc<dyn SpeechPlatform>> {
    match config {
        SpeechProviderConfig::Remote { .. } => {
            Ok(Arc::new(remote::RemoteTtsPlatform::new(config)?))
        }
        SpeechProviderConfig::Silent => Ok(Arc::new(silent::SilentPlatform)),
    }
}
