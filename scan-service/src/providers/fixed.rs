use crate::error::ScanResult;
use crate::providers::OcrProvider;
use async_trait::async_trait;

/// Provider that returns the same candidates for every frame. Development
/// and test stand-in for a real OCR service.
pub struct FixedOcrProvider {
    candidates: Vec<String>,
}

impl FixedOcrProvider {
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }
}

#[async_trait]
impl OcrProvider for FixedOcrProvider {
    async fn recognize(&self, _image: &[u8]) -> ScanResult<Vec<String>> {
        Ok(self.candidates.clone())
    }
}
