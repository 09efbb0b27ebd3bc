//! End-to-end scan scenarios over an in-memory catalog, a canned OCR
//! provider, and a recording speech platform.

use async_trait::async_trait;
use drug_lookup_service::{DrugStore, MatchStage, RawDrugRow};
use narration_service::{
    NarrationConfig, NarrationResult, Narrator, SpeechPlatform, UtteranceRequest, Voice,
};
use parking_lot::Mutex;
use scan_service::providers::fixed::FixedOcrProvider;
use scan_service::{ScanConfig, ScanError, ScanSession, ScanState};
use std::sync::Arc;
use tokio::time::{sleep, Duration};

/// Speech platform that completes every utterance immediately and records
/// what was spoken.
struct RecordingPlatform {
    utterances: Mutex<Vec<UtteranceRequest>>,
}

impl RecordingPlatform {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            utterances: Mutex::new(Vec::new()),
        })
    }

    fn narrated_text(&self) -> String {
        self.utterances
            .lock()
            .iter()
            .map(|u| u.text.as_str())
            .collect()
    }
}

#[async_trait]
impl SpeechPlatform for RecordingPlatform {
    async fn list_voices(&self) -> NarrationResult<Vec<Voice>> {
        Ok(vec![Voice {
            id: "linh".to_string(),
            language_tag: "vi-VN".to_string(),
            display_name: "Linh (Vietnam)".to_string(),
        }])
    }

    async fn speak(&self, request: &UtteranceRequest) -> NarrationResult<()> {
        self.utterances.lock().push(request.clone());
        Ok(())
    }

    async fn cancel_all(&self) {}
}

fn catalog() -> Arc<DrugStore> {
    let panadol = RawDrugRow {
        drug_name: Some("Panadol Extra".to_string()),
        active_ingredient: Some("Paracetamol 500mg; Caffeine 65mg".to_string()),
        category: Some("Giảm đau, hạ sốt".to_string()),
        is_prescription: Some("0".to_string()),
        indications: Some("Điều trị đau nhẹ đến vừa.".to_string()),
        ..RawDrugRow::default()
    };
    let amoxicillin = RawDrugRow {
        drug_name: Some("Amoxicillin 500mg".to_string()),
        active_ingredient: Some("Amoxicillin".to_string()),
        category: Some("Kháng sinh".to_string()),
        is_prescription: Some("1".to_string()),
        indications: Some("Nhiễm khuẩn đường hô hấp.".to_string()),
        ..RawDrugRow::default()
    };
    Arc::new(DrugStore::from_records(
        [panadol, amoxicillin]
            .into_iter()
            .filter_map(RawDrugRow::into_record),
    ))
}

fn harness(
    candidates: &[&str],
    confirm_candidates: bool,
) -> (ScanSession, Arc<RecordingPlatform>) {
    let platform = RecordingPlatform::new();
    let narration_config = NarrationConfig {
        inter_segment_pause_ms: 0,
        voice_list_retry_attempts: 1,
        voice_list_retry_interval_ms: 1,
        ..NarrationConfig::default()
    };
    let narrator = Arc::new(Narrator::new(narration_config, platform.clone()));
    let recognizer = Arc::new(FixedOcrProvider::new(
        candidates.iter().map(|c| c.to_string()).collect(),
    ));
    let config = ScanConfig {
        confirm_candidates,
        ..ScanConfig::default()
    };
    let session = ScanSession::new(catalog(), recognizer, narrator, &config);
    (session, platform)
}

async fn wait_for_narration(platform: &RecordingPlatform, needle: &str) -> String {
    for _ in 0..500 {
        let text = platform.narrated_text();
        if text.contains(needle) {
            return text;
        }
        sleep(Duration::from_millis(2)).await;
    }
    panic!(
        "narration never contained {needle:?}; got {:?}",
        platform.narrated_text()
    );
}

#[tokio::test]
async fn clean_label_resolves_and_narrates_full_detail() {
    let (session, platform) = harness(&["Panadol Extra", "garbled123"], false);

    session.begin_capture().unwrap();
    let state = session.submit_frame(b"frame").await.unwrap();

    match state {
        ScanState::Resolved { record, stage } => {
            assert_eq!(record.name, "Panadol Extra");
            assert_eq!(stage, MatchStage::Exact);
        }
        other => panic!("expected Resolved, got {other:?}"),
    }

    let narrated = wait_for_narration(&platform, "Panadol Extra").await;
    assert!(narrated.contains("Paracetamol 500mg"));
    assert!(narrated.contains("Giảm đau, hạ sốt"));
}

#[tokio::test]
async fn prescription_match_blocks_clinical_detail() {
    let (session, platform) = harness(&["amoxicillin 500"], false);

    session.begin_capture().unwrap();
    let state = session.submit_frame(b"frame").await.unwrap();

    match state {
        ScanState::PrescriptionBlocked { name } => assert_eq!(name, "Amoxicillin 500mg"),
        other => panic!("expected PrescriptionBlocked, got {other:?}"),
    }

    let narrated = wait_for_narration(&platform, "kê đơn").await;
    assert!(narrated.contains("Amoxicillin 500mg"));
    // The reduced disclosure never narrates clinical fields.
    assert!(!narrated.contains("Nhiễm khuẩn"));
}

#[tokio::test]
async fn empty_recognition_is_a_clean_not_found() {
    let (session, platform) = harness(&[], false);

    session.begin_capture().unwrap();
    let state = session.submit_frame(b"frame").await.unwrap();

    match state {
        ScanState::NotFound { recognized } => assert_eq!(recognized, None),
        other => panic!("expected NotFound, got {other:?}"),
    }
    wait_for_narration(&platform, "thử lại").await;
}

#[tokio::test]
async fn unmatched_text_reports_the_recognized_reference() {
    let (session, platform) = harness(&["zzz qqq"], false);

    session.begin_capture().unwrap();
    let state = session.submit_frame(b"frame").await.unwrap();

    match state {
        ScanState::NotFound { recognized } => {
            assert_eq!(recognized.as_deref(), Some("zzz qqq"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    wait_for_narration(&platform, "zzz qqq").await;
}

#[tokio::test]
async fn multiple_candidates_pause_for_confirmation() {
    let (session, _platform) = harness(&["Panadol Extr@", "Panadol Extra"], true);
    let states = session.subscribe();

    session.begin_capture().unwrap();
    let state = session.submit_frame(b"frame").await.unwrap();

    match &state {
        ScanState::ReviewingCandidates {
            candidates,
            selected,
        } => {
            assert_eq!(candidates.len(), 2);
            assert_eq!(selected, "Panadol Extr@");
        }
        other => panic!("expected ReviewingCandidates, got {other:?}"),
    }

    // The user picks the second reading.
    let state = session.confirm_candidate("Panadol Extra").unwrap();
    assert!(matches!(state, ScanState::Resolved { .. }));
    assert!(matches!(&*states.borrow(), ScanState::Resolved { .. }));

    session.dismiss();
    assert!(matches!(session.state(), ScanState::Idle));
}

#[tokio::test]
async fn out_of_order_operations_are_rejected() {
    let (session, _platform) = harness(&["Panadol Extra"], false);

    let error = session.submit_frame(b"frame").await.unwrap_err();
    assert!(matches!(
        error,
        ScanError::InvalidTransition {
            operation: "submit_frame",
            ..
        }
    ));

    session.begin_capture().unwrap();
    let error = session.begin_capture().unwrap_err();
    assert!(matches!(error, ScanError::InvalidTransition { .. }));

    let error = session.confirm_candidate("Panadol").unwrap_err();
    assert!(matches!(error, ScanError::InvalidTransition { .. }));
}
