/// HTTP text-to-speech platform.
///
/// Talks to a speech service exposing `GET /voices`, `POST /speak` (which
/// responds only once the utterance has finished rendering/playing), and
/// `POST /cancel`. Cancellation of an in-flight utterance is achieved by
/// dropping the `speak` request future and calling `cancel_all`.
use crate::config::SpeechProviderConfig;
use crate::error::{NarrationError, NarrationResult};
use crate::providers::{SpeechPlatform, UtteranceRequest};
use crate::voice::Voice;
use async_trait::async_trait;
use tracing::debug;

pub struct RemoteTtsPlatform {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl RemoteTtsPlatform {
    pub fn new(config: &SpeechProviderConfig) -> NarrationResult<Self> {
        match config {
            SpeechProviderConfig::Remote { api_url, api_key } => Ok(Self {
                client: reqwest::Client::new(),
                api_url: api_url.trim_end_matches('/').to_string(),
                api_key: api_key.clone(),
            }),
            other => Err(NarrationError::Config(format!(
                "Remote platform built from non-remote config: {other:?}"
            ))),
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl SpeechPlatform for RemoteTtsPlatform {
    async fn list_voices(&self) -> NarrationResult<Vec<Voice>> {
        let response = self
            .request(self.client.get(format!("{}/voices", self.api_url)))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn speak(&self, request: &UtteranceRequest) -> NarrationResult<()> {
        debug!(
            language = %request.language_tag,
            voice = request.voice_id.as_deref().unwrap_or("default"),
            chars = request.text.len(),
            "Sending utterance"
        );
        self.request(self.client.post(format!("{}/speak", self.api_url)))
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn cancel_all(&self) {
        let result = self
            .request(self.client.post(format!("{}/cancel", self.api_url)))
            .send()
            .await;
        if let Err(error) = result {
            debug!(%error, "Cancel request failed");
        }
    }
}
