/// HTTP OCR provider.
///
/// Uploads the captured frame to an OCR service and keeps the readings the
/// service is reasonably confident about, in the order the service emits
/// them (top-to-bottom of the label, most plausible first).
use crate::config::OcrProviderConfig;
use crate::error::{ScanError, ScanResult};
use crate::providers::OcrProvider;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

pub struct RemoteOcrProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    min_confidence: f32,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    results: Vec<OcrReading>,
}

#[derive(Debug, Deserialize)]
struct OcrReading {
    text: String,
    confidence: f32,
}

impl RemoteOcrProvider {
    pub fn new(config: &OcrProviderConfig) -> ScanResult<Self> {
        match config {
            OcrProviderConfig::Remote {
                api_url,
                api_key,
                min_confidence,
            } => Ok(Self {
                client: reqwest::Client::new(),
                api_url: api_url.trim_end_matches('/').to_string(),
                api_key: api_key.clone(),
                min_confidence: *min_confidence,
            }),
            other => Err(ScanError::Config(format!(
                "Remote provider built from non-remote config: {other:?}"
            ))),
        }
    }
}

#[async_trait]
impl OcrProvider for RemoteOcrProvider {
    async fn recognize(&self, image: &[u8]) -> ScanResult<Vec<String>> {
        let part = reqwest::multipart::Part::bytes(image.to_vec()).file_name("frame.jpg");
        let form = reqwest::multipart::Form::new().part("image", part);

        let mut request = self
            .client
            .post(format!("{}/ocr", self.api_url))
            .multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response: OcrResponse = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let candidates: Vec<String> = response
            .results
            .into_iter()
            .filter(|reading| reading.confidence >= self.min_confidence)
            .map(|reading| reading.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();
        debug!(candidates = candidates.len(), "Recognition finished");
        Ok(candidates)
    }
}
