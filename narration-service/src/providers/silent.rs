use crate::error::NarrationResult;
use crate::providers::{SpeechPlatform, UtteranceRequest};
use crate::voice::Voice;
use async_trait::async_trait;

/// Platform that renders nothing and completes immediately.
///
/// Used when no real speech output is configured and as the degradation
/// target when voice selection fails: the pipeline keeps its sequencing
/// semantics, the user sees text only.
pub struct SilentPlatform;

#[async_trait]
impl SpeechPlatform for SilentPlatform {
    async fn list_voices(&self) -> NarrationResult<Vec<Voice>> {
        Ok(Vec::new())
    }

    async fn speak(&self, _request: &UtteranceRequest) -> NarrationResult<()> {
        Ok(())
    }

    async fn cancel_all(&self) {}
}
