pub mod fixed;
pub mod remote;

use crate::config::OcrProviderConfig;
use crate::error::ScanResult;
use async_trait::async_trait;
use std::sync::Arc;

/// The recognition collaborator: an opaque upstream producer of zero or
/// more candidate readings for a captured frame, ordered most plausible
/// first.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> ScanResult<Vec<String>>;
}

/// Create a provider instance based on configuration.
pub fn create_provider(config: &OcrProviderConfig) -> ScanResult<Arc<dyn OcrProvider>> {
    match config {
        OcrProviderConfig::Remote { .. } => Ok(Arc::new(remote::RemoteOcrProvider::new(config)?)),
        OcrProviderConfig::Fixed { candidates } => {
            Ok(Arc::new(fixed::FixedOcrProvider::new(candidates.clone())))
        }
    }
}
