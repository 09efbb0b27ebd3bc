use serde::{Deserialize, Serialize};

/// Readings below this confidence are dropped by the remote OCR provider.
/// Empirically tuned against the label photos the service sees.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.3;

/// OCR provider selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OcrProviderConfig {
    /// HTTP OCR service accepting an image upload and returning candidate
    /// readings with confidences.
    Remote {
        api_url: String,
        api_key: Option<String>,
        min_confidence: f32,
    },
    /// Canned candidates, for development and tests.
    Fixed { candidates: Vec<String> },
}

/// Scan service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    pub provider: OcrProviderConfig,
    /// With more than one plausible reading, pause in
    /// `ReviewingCandidates` for explicit user confirmation instead of
    /// resolving immediately.
    pub confirm_candidates: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            provider: OcrProviderConfig::Remote {
                api_url: "http://localhost:8000".to_string(),
                api_key: None,
                min_confidence: DEFAULT_MIN_CONFIDENCE,
            },
            confirm_candidates: true,
        }
    }
}

impl ScanConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything absent or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let min_confidence = std::env::var("OCR_MIN_CONFIDENCE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MIN_CONFIDENCE);

        let provider = match std::env::var("OCR_PROVIDER")
            .map(|v| v.to_lowercase())
            .as_deref()
        {
            Ok("fixed") => OcrProviderConfig::Fixed {
                candidates: std::env::var("OCR_FIXED_CANDIDATES")
                    .map(|v| v.split(';').map(|c| c.trim().to_string()).collect())
                    .unwrap_or_default(),
            },
            _ => OcrProviderConfig::Remote {
                api_url: std::env::var("OCR_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8000".to_string()),
                api_key: std::env::var("OCR_API_KEY").ok(),
                min_confidence,
            },
        };

        Self {
            provider,
            confirm_candidates: std::env::var("SCAN_CONFIRM_CANDIDATES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.confirm_candidates),
        }
    }
}
