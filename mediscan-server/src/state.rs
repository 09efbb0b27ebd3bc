use drug_lookup_service::DrugStore;
use narration_service::Narrator;
use scan_service::{OcrProvider, ScanConfig, ScanSession};
use std::sync::Arc;

/// Shared server state: the read-only catalog, the process-wide narrator,
/// and the recognition collaborator.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DrugStore>,
    pub narrator: Arc<Narrator>,
    pub recognizer: Arc<dyn OcrProvider>,
    pub scan_config: ScanConfig,
}

impl AppState {
    pub fn new(
        store: Arc<DrugStore>,
        narrator: Arc<Narrator>,
        recognizer: Arc<dyn OcrProvider>,
        scan_config: ScanConfig,
    ) -> Self {
        Self {
            store,
            narrator,
            recognizer,
            scan_config,
        }
    }

    /// A fresh session over the given recognition source. HTTP is
    /// stateless here: each scan request drives one ephemeral session.
    pub fn new_session(&self, recognizer: Arc<dyn OcrProvider>) -> ScanSession {
        // Confirmation round-trips are handled client-side over separate
        // requests, so sessions never pause in ReviewingCandidates.
        let config = ScanConfig {
            confirm_candidates: false,
            ..self.scan_config.clone()
        };
        ScanSession::new(
            Arc::clone(&self.store),
            recognizer,
            Arc::clone(&self.narrator),
            &config,
        )
    }
}
