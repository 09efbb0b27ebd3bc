use crate::config::NarrationConfig;
use crate::error::NarrationResult;
use crate::providers::{create_platform, SpeechPlatform, UtteranceRequest};
use crate::segmenter::{segment, LanguageClass, TextSegment};
use crate::voice::{select_voice, Voice};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lifecycle of one narration job. No resume from the terminal states; a
/// fresh `narrate` call creates a new job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Idle,
    Playing,
    Cancelled,
    Completed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Cancelled | JobStatus::Completed)
    }
}

/// Cancellable handle to one playback job.
///
/// Clones observe and control the same job. `cancel` performs the
/// bookkeeping transition synchronously; the in-flight utterance is told
/// to stop on the playback task's next poll, and no further segment starts
/// after the request, even one already queued on the current turn.
#[derive(Clone)]
pub struct NarrationHandle {
    id: Uuid,
    status_tx: Arc<watch::Sender<JobStatus>>,
    status_rx: watch::Receiver<JobStatus>,
    cancel_tx: Arc<watch::Sender<bool>>,
}

impl NarrationHandle {
    fn new(initial: JobStatus) -> Self {
        let (status_tx, status_rx) = watch::channel(initial);
        let (cancel_tx, _) = watch::channel(false);
        Self {
            id: Uuid::new_v4(),
            status_tx: Arc::new(status_tx),
            status_rx,
            cancel_tx: Arc::new(cancel_tx),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> JobStatus {
        *self.status_rx.borrow()
    }

    /// Request cancellation. The status transition happens before this
    /// returns; terminal jobs are inert and unaffected.
    pub fn cancel(&self) {
        let transitioned = self.status_tx.send_if_modified(|status| {
            if status.is_terminal() {
                false
            } else {
                *status = JobStatus::Cancelled;
                true
            }
        });
        if transitioned {
            debug!(job_id = %self.id, "Narration job cancelled");
            let _ = self.cancel_tx.send(true);
        }
    }

    /// Wait for the job to reach a terminal status.
    pub async fn finished(&self) -> JobStatus {
        let mut rx = self.status_rx.clone();
        loop {
            let status = *rx.borrow_and_update();
            if status.is_terminal() {
                return status;
            }
            if rx.changed().await.is_err() {
                return *rx.borrow();
            }
        }
    }
}

/// The narration engine: segmentation, voice assignment, and strictly
/// sequential playback over the single process-wide speech channel.
///
/// Owns the current-job slot. Starting a new job first cancels the active
/// one, so at most one playback job exists at a time; the owning context
/// tearing the narrator down cancels whatever is still playing.
pub struct Narrator {
    config: NarrationConfig,
    platform: Arc<dyn SpeechPlatform>,
    current: Mutex<Option<NarrationHandle>>,
}

impl Narrator {
    pub fn new(config: NarrationConfig, platform: Arc<dyn SpeechPlatform>) -> Self {
        Self {
            config,
            platform,
            current: Mutex::new(None),
        }
    }

    /// Build the narrator with the platform named in the configuration.
    pub fn from_config(config: NarrationConfig) -> NarrationResult<Self> {
        let platform = create_platform(&config.provider)?;
        Ok(Self::new(config, platform))
    }

    /// The base language narrated for `Primary` segments by default.
    pub fn base_language(&self) -> &str {
        &self.config.base_language
    }

    /// Start narrating a message, cancelling any active job first.
    ///
    /// The message is split into language segments and each is spoken in
    /// original order with the voice selected for its language; the job
    /// advances only on natural utterance completion. Must be called from
    /// within a Tokio runtime. Never fails: playback trouble degrades to a
    /// shorter (or silent) narration, observable on the returned handle.
    pub fn narrate(&self, message: &str, base_language: &str) -> NarrationHandle {
        self.cancel_current();

        let segments = segment(message);
        if segments.is_empty() {
            return NarrationHandle::new(JobStatus::Completed);
        }

        let handle = NarrationHandle::new(JobStatus::Playing);
        info!(
            job_id = %handle.id,
            segments = segments.len(),
            base_language,
            "Starting narration job"
        );

        tokio::spawn(run_playback(
            Arc::clone(&self.platform),
            self.config.clone(),
            base_language.to_string(),
            segments,
            Arc::clone(&handle.status_tx),
            handle.cancel_tx.subscribe(),
        ));

        *self.current.lock() = Some(handle.clone());
        handle
    }

    /// Cancel the active job, if any.
    pub fn cancel_current(&self) {
        if let Some(handle) = self.current.lock().take() {
            handle.cancel();
        }
    }
}

impl Drop for Narrator {
    fn drop(&mut self) {
        if let Some(handle) = self.current.get_mut().take() {
            handle.cancel();
        }
    }
}

/// The playback task: voice-list readiness, then one utterance per segment
/// in order, with the inter-segment pause between them.
async fn run_playback(
    platform: Arc<dyn SpeechPlatform>,
    config: NarrationConfig,
    base_language: String,
    segments: Vec<TextSegment>,
    status_tx: Arc<watch::Sender<JobStatus>>,
    mut cancel_rx: watch::Receiver<bool>,
) {
    let cancelled = || *status_tx.borrow() == JobStatus::Cancelled;

    // The platform may still be enumerating voices when we start. Bounded
    // retry, then proceed voiceless rather than hang.
    let mut voices: Vec<Voice> = Vec::new();
    let attempts = config.voice_list_retry_attempts.max(1);
    for attempt in 1..=attempts {
        if cancelled() {
            return;
        }
        match platform.list_voices().await {
            Ok(list) if !list.is_empty() => {
                voices = list;
                break;
            }
            Ok(_) => debug!(attempt, "Voice list not ready"),
            Err(error) => debug!(attempt, %error, "Voice list unavailable"),
        }
        if attempt < attempts {
            tokio::select! {
                biased;
                _ = cancel_rx.changed() => return,
                _ = sleep(Duration::from_millis(config.voice_list_retry_interval_ms)) => {}
            }
        }
    }
    if voices.is_empty() {
        warn!("No platform voice available; narrating without an explicit voice");
    }

    let total = segments.len();
    for (index, seg) in segments.into_iter().enumerate() {
        if cancelled() {
            return;
        }

        let language = match seg.class {
            LanguageClass::Primary => base_language.as_str(),
            LanguageClass::Foreign => config.foreign_language.as_str(),
        };
        let request = UtteranceRequest {
            text: seg.text,
            language_tag: language.to_string(),
            voice_id: select_voice(language, &voices),
            rate: config.rate,
            pitch: config.pitch,
            volume: config.volume,
        };

        tokio::select! {
            biased;
            _ = cancel_rx.changed() => {
                // Stop the in-flight utterance on the shared channel.
                platform.cancel_all().await;
                return;
            }
            result = platform.speak(&request) => {
                if let Err(error) = result {
                    warn!(%error, segment = index, "Utterance failed; ending narration early");
                    break;
                }
            }
        }

        if index + 1 < total && config.inter_segment_pause_ms > 0 {
            tokio::select! {
                biased;
                _ = cancel_rx.changed() => return,
                _ = sleep(Duration::from_millis(config.inter_segment_pause_ms)) => {}
            }
        }
    }

    status_tx.send_if_modified(|status| {
        if *status == JobStatus::Playing {
            *status = JobStatus::Completed;
            true
        } else {
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NarrationResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    /// Platform whose utterance completion is driven by the test through a
    /// semaphore, standing in for the real platform's "utterance ended"
    /// callback.
    struct ScriptedPlatform {
        voices: Mutex<Vec<Voice>>,
        utterances: Mutex<Vec<UtteranceRequest>>,
        completions: Semaphore,
        auto_complete: bool,
        list_calls: AtomicUsize,
        cancel_calls: AtomicUsize,
    }

    impl ScriptedPlatform {
        fn new(auto_complete: bool) -> Arc<Self> {
            Arc::new(Self {
                voices: Mutex::new(vec![Voice {
                    id: "linh".to_string(),
                    language_tag: "vi-VN".to_string(),
                    display_name: "Linh (Vietnam)".to_string(),
                }]),
                utterances: Mutex::new(Vec::new()),
                completions: Semaphore::new(0),
                auto_complete,
                list_calls: AtomicUsize::new(0),
                cancel_calls: AtomicUsize::new(0),
            })
        }

        fn manual() -> Arc<Self> {
            Self::new(false)
        }

        fn auto() -> Arc<Self> {
            Self::new(true)
        }

        fn without_voices(self: Arc<Self>) -> Arc<Self> {
            self.voices.lock().clear();
            self
        }

        fn spoken(&self) -> usize {
            self.utterances.lock().len()
        }

        fn complete_one(&self) {
            self.completions.add_permits(1);
        }
    }

    #[async_trait]
    impl SpeechPlatform for ScriptedPlatform {
        async fn list_voices(&self) -> NarrationResult<Vec<Voice>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.voices.lock().clone())
        }

        async fn speak(&self, request: &UtteranceRequest) -> NarrationResult<()> {
            self.utterances.lock().push(request.clone());
            if !self.auto_complete {
                // Held until the test releases a completion; dropped when
                // the sequencer aborts the utterance.
                let permit = self.completions.acquire().await;
                permit.map(|p| p.forget()).ok();
            }
            Ok(())
        }

        async fn cancel_all(&self) {
            self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn test_config() -> NarrationConfig {
        NarrationConfig {
            inter_segment_pause_ms: 0,
            voice_list_retry_attempts: 2,
            voice_list_retry_interval_ms: 1,
            ..NarrationConfig::default()
        }
    }

    async fn wait_until(description: &str, condition: impl Fn() -> bool) {
        for _ in 0..500 {
            if condition() {
                return;
            }
            sleep(Duration::from_millis(2)).await;
        }
        panic!("timed out waiting for: {description}");
    }

    const MIXED: &str = "Paracetamol 500mg giúp hạ sốt";

    #[tokio::test]
    async fn segments_play_strictly_in_order() {
        let platform = ScriptedPlatform::manual();
        let narrator = Narrator::new(test_config(), platform.clone());

        let handle = narrator.narrate(MIXED, "vi-VN");
        wait_until("first utterance", || platform.spoken() == 1).await;

        // The second segment must not start before the first completes.
        sleep(Duration::from_millis(20)).await;
        assert_eq!(platform.spoken(), 1);
        assert_eq!(handle.status(), JobStatus::Playing);

        platform.complete_one();
        wait_until("second utterance", || platform.spoken() == 2).await;
        platform.complete_one();

        assert_eq!(handle.finished().await, JobStatus::Completed);
        let utterances = platform.utterances.lock().clone();
        assert_eq!(utterances[0].text, "Paracetamol 500mg ");
        assert_eq!(utterances[0].language_tag, "en-US");
        assert_eq!(utterances[1].text, "giúp hạ sốt");
        assert_eq!(utterances[1].language_tag, "vi-VN");
        assert_eq!(utterances[1].voice_id.as_deref(), Some("linh"));
    }

    #[tokio::test]
    async fn cancel_mid_utterance_stops_playback() {
        let platform = ScriptedPlatform::manual();
        let narrator = Narrator::new(test_config(), platform.clone());

        let handle = narrator.narrate(MIXED, "vi-VN");
        wait_until("first utterance", || platform.spoken() == 1).await;

        handle.cancel();
        assert_eq!(handle.status(), JobStatus::Cancelled);
        assert_eq!(handle.finished().await, JobStatus::Cancelled);

        // The in-flight utterance is stopped and no further speak happens.
        wait_until("platform told to stop", || {
            platform.cancel_calls.load(Ordering::SeqCst) == 1
        })
        .await;
        sleep(Duration::from_millis(20)).await;
        assert_eq!(platform.spoken(), 1);
    }

    #[tokio::test]
    async fn cancel_is_inert_on_terminal_jobs() {
        let platform = ScriptedPlatform::auto();
        let narrator = Narrator::new(test_config(), platform.clone());

        let handle = narrator.narrate("giúp hạ sốt", "vi-VN");
        assert_eq!(handle.finished().await, JobStatus::Completed);
        handle.cancel();
        assert_eq!(handle.status(), JobStatus::Completed);
    }

    #[tokio::test]
    async fn empty_message_completes_without_audio() {
        let platform = ScriptedPlatform::manual();
        let narrator = Narrator::new(test_config(), platform.clone());

        let handle = narrator.narrate("", "vi-VN");
        assert_eq!(handle.status(), JobStatus::Completed);
        assert_eq!(platform.spoken(), 0);
        assert_eq!(platform.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_voice_list_degrades_after_bounded_retry() {
        let platform = ScriptedPlatform::auto().without_voices();
        let narrator = Narrator::new(test_config(), platform.clone());

        let handle = narrator.narrate("giúp hạ sốt", "vi-VN");
        assert_eq!(handle.finished().await, JobStatus::Completed);

        assert_eq!(platform.list_calls.load(Ordering::SeqCst), 2);
        let utterances = platform.utterances.lock().clone();
        assert_eq!(utterances.len(), 1);
        assert_eq!(utterances[0].voice_id, None);
    }

    #[tokio::test]
    async fn starting_a_new_job_cancels_the_previous_one() {
        let platform = ScriptedPlatform::manual();
        let narrator = Narrator::new(test_config(), platform.clone());

        let first = narrator.narrate(MIXED, "vi-VN");
        wait_until("first utterance", || platform.spoken() == 1).await;

        let second = narrator.narrate("giúp hạ sốt", "vi-VN");
        assert_eq!(first.status(), JobStatus::Cancelled);

        wait_until("second job speaks", || platform.spoken() == 2).await;
        platform.complete_one();
        assert_eq!(second.finished().await, JobStatus::Completed);
    }
}
