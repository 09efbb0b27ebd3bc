use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};
use crate::providers::OcrProvider;
use drug_lookup_service::{DrugMatcher, DrugRecord, DrugStore, MatchResult, MatchStage};
use narration_service::{MessageCatalog, Narrator};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Where a scan attempt currently stands, with whatever payload the UI
/// needs to render it.
///
/// `Resolved`, `PrescriptionBlocked`, and `NotFound` are the terminal
/// outcomes; the user always ends in one of them, never in a raw failure.
/// A prescription match deliberately carries the name only - the reduced
/// disclosure for gated records.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScanState {
    Idle,
    Capturing,
    AwaitingRecognition,
    ReviewingCandidates {
        candidates: Vec<String>,
        selected: String,
    },
    Resolving {
        candidate: String,
    },
    Resolved {
        record: DrugRecord,
        stage: MatchStage,
    },
    PrescriptionBlocked {
        name: String,
    },
    NotFound {
        recognized: Option<String>,
    },
}

impl ScanState {
    pub fn name(&self) -> &'static str {
        match self {
            ScanState::Idle => "Idle",
            ScanState::Capturing => "Capturing",
            ScanState::AwaitingRecognition => "AwaitingRecognition",
            ScanState::ReviewingCandidates { .. } => "ReviewingCandidates",
            ScanState::Resolving { .. } => "Resolving",
            ScanState::Resolved { .. } => "Resolved",
            ScanState::PrescriptionBlocked { .. } => "PrescriptionBlocked",
            ScanState::NotFound { .. } => "NotFound",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScanState::Resolved { .. }
                | ScanState::PrescriptionBlocked { .. }
                | ScanState::NotFound { .. }
        )
    }
}

/// One scan attempt: recognized text in, matched record (or a clean
/// failure) out, narrated along the way.
///
/// The session drives the whole control flow - recognition, optional
/// candidate confirmation, the matching cascade, prescription gating, and
/// narration of the outcome - and publishes every state change on a watch
/// channel for the UI. Narration is fire-and-forget from the session's
/// point of view: a narration problem can shorten or silence playback but
/// never fails the resolution.
///
/// Not re-entrant; one session per scan attempt, driven from one task.
pub struct ScanSession {
    matcher: DrugMatcher<Arc<DrugStore>>,
    recognizer: Arc<dyn OcrProvider>,
    narrator: Arc<Narrator>,
    messages: MessageCatalog,
    confirm_candidates: bool,
    state_tx: watch::Sender<ScanState>,
}

impl ScanSession {
    pub fn new(
        store: Arc<DrugStore>,
        recognizer: Arc<dyn OcrProvider>,
        narrator: Arc<Narrator>,
        config: &ScanConfig,
    ) -> Self {
        let messages = MessageCatalog::for_language(narrator.base_language());
        let (state_tx, _) = watch::channel(ScanState::Idle);
        Self {
            matcher: DrugMatcher::new(store),
            recognizer,
            narrator,
            messages,
            confirm_candidates: config.confirm_candidates,
            state_tx,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> ScanState {
        self.state_tx.borrow().clone()
    }

    /// Observe state changes. The receiver sees the current state
    /// immediately and every transition thereafter.
    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.state_tx.subscribe()
    }

    /// `Idle -> Capturing`: the camera is live.
    pub fn begin_capture(&self) -> ScanResult<()> {
        self.expect_state("begin_capture", |s| matches!(s, ScanState::Idle))?;
        self.transition(ScanState::Capturing);
        Ok(())
    }

    /// `Capturing -> AwaitingRecognition -> ...`: a frame was captured and
    /// submitted to the recognition collaborator.
    ///
    /// Zero candidates resolve straight to `NotFound`; several plausible
    /// candidates pause in `ReviewingCandidates` when confirmation is
    /// enabled; otherwise the full ordered candidate list goes to the
    /// matcher at once.
    pub async fn submit_frame(&self, image: &[u8]) -> ScanResult<ScanState> {
        self.expect_state("submit_frame", |s| matches!(s, ScanState::Capturing))?;
        self.transition(ScanState::AwaitingRecognition);

        let candidates = self.recognizer.recognize(image).await?;
        debug!(candidates = candidates.len(), "Recognition returned");

        if candidates.is_empty() {
            self.narrator
                .narrate(&self.messages.no_candidates(), self.narrator.base_language());
            return Ok(self.transition(ScanState::NotFound { recognized: None }));
        }

        if self.confirm_candidates && candidates.len() > 1 {
            let selected = candidates
                .first()
                .cloned()
                .unwrap_or_default();
            return Ok(self.transition(ScanState::ReviewingCandidates {
                candidates,
                selected,
            }));
        }

        Ok(self.resolve(candidates))
    }

    /// `ReviewingCandidates -> Resolving -> ...`: the user confirmed (or
    /// edited) exactly one candidate.
    pub fn confirm_candidate(&self, text: &str) -> ScanResult<ScanState> {
        self.expect_state("confirm_candidate", |s| {
            matches!(s, ScanState::ReviewingCandidates { .. })
        })?;
        Ok(self.resolve(vec![text.to_string()]))
    }

    /// Run the cascade and narrate the outcome.
    fn resolve(&self, candidates: Vec<String>) -> ScanState {
        let first = candidates.first().cloned().unwrap_or_default();
        self.transition(ScanState::Resolving { candidate: first });

        let base_language = self.narrator.base_language().to_string();
        match self.matcher.resolve(&candidates) {
            MatchResult::Resolved {
                record,
                candidate,
                stage,
            } => {
                info!(
                    drug = %record.name,
                    ?stage,
                    matched_candidate = %candidate,
                    prescription = record.is_prescription,
                    "Scan resolved"
                );
                if record.is_prescription {
                    // Controlled disclosure: the gated outcome narrates the
                    // name and warning only, never clinical detail.
                    self.narrator.narrate(
                        &self.messages.prescription_blocked(&record.name),
                        &base_language,
                    );
                    self.transition(ScanState::PrescriptionBlocked { name: record.name })
                } else {
                    self.narrator
                        .narrate(&self.messages.resolved(&record), &base_language);
                    self.transition(ScanState::Resolved { record, stage })
                }
            }
            MatchResult::NotFound { last_candidate } => {
                info!("Scan exhausted the matching cascade");
                let reference = last_candidate.clone().unwrap_or_default();
                self.narrator
                    .narrate(&self.messages.not_found(&reference), &base_language);
                self.transition(ScanState::NotFound {
                    recognized: last_candidate,
                })
            }
        }
    }

    /// Back to `Idle` from anywhere: explicit dismissal or the owning
    /// context tearing down. Always cancels the active narration job.
    pub fn dismiss(&self) {
        self.narrator.cancel_current();
        self.transition(ScanState::Idle);
    }

    fn expect_state(
        &self,
        operation: &'static str,
        allowed: impl Fn(&ScanState) -> bool,
    ) -> ScanResult<()> {
        let current = self.state_tx.borrow();
        if allowed(&current) {
            Ok(())
        } else {
            Err(ScanError::InvalidTransition {
                operation,
                state: current.name(),
            })
        }
    }

    fn transition(&self, next: ScanState) -> ScanState {
        debug!(from = self.state_tx.borrow().name(), to = next.name(), "Scan state change");
        self.state_tx.send_replace(next.clone());
        next
    }
}
