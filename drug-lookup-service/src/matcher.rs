use crate::record::{normalize, DrugRecord};
use crate::store::RecordSource;
use serde::Serialize;

/// Keyword-stage tokens at or below this length are discarded as too noisy
/// to be discriminative. Empirically tuned; kept configurable rather than
/// treated as an invariant.
pub const KEYWORD_MIN_TOKEN_LEN: usize = 3;

/// One recognized string competing to be resolved. Ephemeral, created per
/// scan attempt.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub raw: String,
    pub normalized: String,
}

impl MatchCandidate {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            normalized: normalize(raw),
        }
    }
}

/// Which stage of the cascade produced a hit. Recorded for diagnostics and
/// tests, never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    Exact,
    Substring,
    Keyword,
}

/// Outcome of the matching cascade.
#[derive(Debug, Clone)]
pub enum MatchResult {
    Resolved {
        record: DrugRecord,
        candidate: String,
        stage: MatchStage,
    },
    NotFound {
        last_candidate: Option<String>,
    },
}

impl MatchResult {
    pub fn is_resolved(&self) -> bool {
        matches!(self, MatchResult::Resolved { .. })
    }
}

/// Deterministic three-stage matching cascade over a record source.
///
/// Recognized text is typically one of: a verbatim but re-cased product
/// name, a truncated fragment of one, or a few legible tokens in noise.
/// Each stage targets one of those failure modes, ordered from highest to
/// lowest confidence so a weak keyword hit can never shadow a clean exact
/// match. The stage is the outer loop: every candidate is tried at a stage
/// before the cascade weakens.
///
/// Within a stage, record insertion order is the tie-break (see
/// [`crate::store::DrugStore`]).
pub struct DrugMatcher<S> {
    source: S,
}

impl<S: RecordSource> DrugMatcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Resolve an ordered sequence of candidates to a single best record.
    ///
    /// Total over its domain: an empty candidate list returns `NotFound`
    /// without touching the record source, and candidates that normalize to
    /// nothing never match (an empty needle would otherwise be a substring
    /// of every name).
    pub fn resolve(&self, candidates: &[String]) -> MatchResult {
        if candidates.is_empty() {
            return MatchResult::NotFound {
                last_candidate: None,
            };
        }

        let candidates: Vec<MatchCandidate> =
            candidates.iter().map(|c| MatchCandidate::new(c)).collect();
        let records = self.source.records();

        // Stage 1: exact name equality.
        for candidate in &candidates {
            if candidate.normalized.is_empty() {
                continue;
            }
            for record in records {
                if record.normalized_name() == candidate.normalized {
                    return resolved(record, candidate, MatchStage::Exact);
                }
            }
        }

        // Stage 2: candidate contained in the name. This direction favors
        // short, noisy fragments matching inside a longer catalog name.
        for candidate in &candidates {
            if candidate.normalized.is_empty() {
                continue;
            }
            for record in records {
                if record.normalized_name().contains(&candidate.normalized) {
                    return resolved(record, candidate, MatchStage::Substring);
                }
            }
        }

        // Stage 3: individual tokens, short ones discarded.
        for candidate in &candidates {
            for token in candidate.normalized.split_whitespace() {
                if token.chars().count() <= KEYWORD_MIN_TOKEN_LEN {
                    continue;
                }
                for record in records {
                    if record.normalized_name().contains(token) {
                        return resolved(record, candidate, MatchStage::Keyword);
                    }
                }
            }
        }

        MatchResult::NotFound {
            last_candidate: candidates.last().map(|c| c.raw.clone()),
        }
    }
}

fn resolved(record: &DrugRecord, candidate: &MatchCandidate, stage: MatchStage) -> MatchResult {
    MatchResult::Resolved {
        record: record.clone(),
        candidate: candidate.raw.clone(),
        stage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawDrugRow;
    use crate::store::DrugStore;
    use std::cell::Cell;

    fn record(name: &str) -> DrugRecord {
        RawDrugRow {
            drug_name: Some(name.to_string()),
            ..RawDrugRow::default()
        }
        .into_record()
        .unwrap()
    }

    fn store(names: &[&str]) -> DrugStore {
        DrugStore::from_records(names.iter().map(|n| record(n)))
    }

    /// Record source that counts accesses, for the no-store-access
    /// assertion on empty input.
    struct CountingSource {
        records: Vec<DrugRecord>,
        accesses: Cell<usize>,
    }

    impl RecordSource for CountingSource {
        fn records(&self) -> &[DrugRecord] {
            self.accesses.set(self.accesses.get() + 1);
            &self.records
        }
    }

    fn owned(candidates: &[&str]) -> Vec<String> {
        candidates.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let matcher = DrugMatcher::new(store(&["Panadol Extra"]));
        let result = matcher.resolve(&owned(&["PANADOL extra"]));
        match result {
            MatchResult::Resolved { record, stage, .. } => {
                assert_eq!(record.name, "Panadol Extra");
                assert_eq!(stage, MatchStage::Exact);
            }
            other => panic!("expected resolution, got {other:?}"),
        }
    }

    #[test]
    fn exact_stage_beats_substring_stage() {
        // "Panadol" is an exact match for the second record and a
        // substring-stage match for the first; Exact must win even though
        // the substring record comes earlier in the store.
        let matcher = DrugMatcher::new(store(&["Panadol Extra", "Panadol"]));
        let result = matcher.resolve(&owned(&["panadol"]));
        match result {
            MatchResult::Resolved { record, stage, .. } => {
                assert_eq!(record.name, "Panadol");
                assert_eq!(stage, MatchStage::Exact);
            }
            other => panic!("expected resolution, got {other:?}"),
        }
    }

    #[test]
    fn stage_is_outer_loop_across_candidates() {
        // The second candidate matches exactly, the first only by
        // substring. All candidates must be tried at the Exact stage before
        // the cascade weakens, so the second candidate wins.
        let matcher = DrugMatcher::new(store(&["Amoxicillin 500mg", "Aspirin pH8"]));
        let result = matcher.resolve(&owned(&["amoxicillin", "aspirin ph8"]));
        match result {
            MatchResult::Resolved {
                record,
                candidate,
                stage,
            } => {
                assert_eq!(record.name, "Aspirin pH8");
                assert_eq!(candidate, "aspirin ph8");
                assert_eq!(stage, MatchStage::Exact);
            }
            other => panic!("expected resolution, got {other:?}"),
        }
    }

    #[test]
    fn substring_matches_fragment_inside_name() {
        let matcher = DrugMatcher::new(store(&["Amoxicillin 500mg"]));
        let result = matcher.resolve(&owned(&["amoxicillin 500"]));
        match result {
            MatchResult::Resolved { stage, .. } => assert_eq!(stage, MatchStage::Substring),
            other => panic!("expected resolution, got {other:?}"),
        }
    }

    #[test]
    fn keyword_stage_discards_short_tokens() {
        // "ph8" is 3 characters and must be discarded; "extra" survives.
        let matcher = DrugMatcher::new(store(&["Panadol Extra"]));
        let result = matcher.resolve(&owned(&["ph8 extra strength label"]));
        match result {
            MatchResult::Resolved { record, stage, .. } => {
                assert_eq!(record.name, "Panadol Extra");
                assert_eq!(stage, MatchStage::Keyword);
            }
            other => panic!("expected resolution, got {other:?}"),
        }
    }

    #[test]
    fn insertion_order_breaks_ties_within_a_stage() {
        let matcher = DrugMatcher::new(store(&["Panadol Cold & Flu", "Panadol Extra"]));
        let result = matcher.resolve(&owned(&["panadol"]));
        match result {
            MatchResult::Resolved { record, stage, .. } => {
                assert_eq!(record.name, "Panadol Cold & Flu");
                assert_eq!(stage, MatchStage::Substring);
            }
            other => panic!("expected resolution, got {other:?}"),
        }
    }

    #[test]
    fn empty_candidates_return_not_found_without_store_access() {
        let source = CountingSource {
            records: vec![record("Panadol Extra")],
            accesses: Cell::new(0),
        };
        let matcher = DrugMatcher::new(&source);
        let result = matcher.resolve(&[]);
        match result {
            MatchResult::NotFound { last_candidate } => assert_eq!(last_candidate, None),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert_eq!(source.accesses.get(), 0);
    }

    #[test]
    fn whitespace_only_candidates_never_match() {
        let matcher = DrugMatcher::new(store(&["Panadol Extra"]));
        let result = matcher.resolve(&owned(&["   ", ""]));
        match result {
            MatchResult::NotFound { last_candidate } => {
                assert_eq!(last_candidate.as_deref(), Some(""));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn exhausted_cascade_reports_last_candidate() {
        let matcher = DrugMatcher::new(store(&["Panadol Extra"]));
        let result = matcher.resolve(&owned(&["garbled123", "qzx"]));
        match result {
            MatchResult::NotFound { last_candidate } => {
                assert_eq!(last_candidate.as_deref(), Some("qzx"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
