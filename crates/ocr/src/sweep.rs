use std::sync::Arc;
use std::time::Duration;

use idscan_core::{DocumentKind, NameLines, RecognitionCandidate, RecognitionConfig, RecognitionMode};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::extract::FieldExtractor;
use crate::recognizer::{OcrBackend, OcrError, Recognition, RecognizeOptions};
use crate::types::ProcessedImage;

/// Every candidate a sweep produced, in mode order, plus the winner.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    pub best: Option<RecognitionCandidate>,
    pub candidates: Vec<RecognitionCandidate>,
}

impl SweepOutcome {
    /// Normalized text of the winning mode, or `""` when no mode yielded a name.
    pub fn best_text(&self) -> &str {
        self.best.as_ref().map(|c| c.text.as_str()).unwrap_or("")
    }
}

/// Runs the OCR engine once per configured recognition mode and keeps the
/// most confident result that still yields a name.
pub struct SweepEngine<R: OcrBackend> {
    backend: Arc<R>,
    cfg: RecognitionConfig,
    name_lines: NameLines,
}

impl<R: OcrBackend> SweepEngine<R> {
    pub fn new(backend: Arc<R>, cfg: RecognitionConfig, name_lines: NameLines) -> Self {
        Self { backend, cfg, name_lines }
    }

    pub async fn sweep(&self, processed: &ProcessedImage, kind: DocumentKind) -> SweepOutcome {
        let png: Arc<[u8]> = Arc::from(processed.png.as_slice());
        let results = if self.cfg.concurrent {
            self.recognize_concurrently(png).await
        } else {
            self.recognize_sequentially(png).await
        };

        let extractor = FieldExtractor::new(kind).with_name_lines(self.name_lines);
        let candidates: Vec<RecognitionCandidate> = results
            .into_iter()
            .map(|(mode, result)| score(&extractor, mode, result))
            .collect();
        let best = select_best(&candidates).cloned();

        match &best {
            Some(b) => debug!(%kind, mode = %b.mode, confidence = b.confidence, "sweep selected candidate"),
            None => debug!(%kind, "no recognition mode produced a name"),
        }
        SweepOutcome { best, candidates }
    }

    async fn recognize_sequentially(
        &self,
        png: Arc<[u8]>,
    ) -> Vec<(RecognitionMode, Result<Recognition, OcrError>)> {
        let mut results = Vec::with_capacity(self.cfg.modes.len());
        for &mode in &self.cfg.modes {
            let result = recognize_bounded(
                Arc::clone(&self.backend),
                Arc::clone(&png),
                RecognizeOptions::for_mode(&self.cfg, mode),
                self.timeout(),
            )
            .await;
            results.push((mode, result));
        }
        results
    }

    /// All modes in flight at once. Results are put back into mode order so
    /// selection is independent of completion order.
    async fn recognize_concurrently(
        &self,
        png: Arc<[u8]>,
    ) -> Vec<(RecognitionMode, Result<Recognition, OcrError>)> {
        let mut set = JoinSet::new();
        for (idx, &mode) in self.cfg.modes.iter().enumerate() {
            let backend = Arc::clone(&self.backend);
            let png = Arc::clone(&png);
            let options = RecognizeOptions::for_mode(&self.cfg, mode);
            let timeout = self.timeout();
            set.spawn(async move { (idx, recognize_bounded(backend, png, options, timeout).await) });
        }

        let mut slots: Vec<Option<Result<Recognition, OcrError>>> =
            self.cfg.modes.iter().map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, result)) => slots[idx] = Some(result),
                Err(e) => warn!(error = %e, "recognition task did not complete"),
            }
        }

        self.cfg
            .modes
            .iter()
            .zip(slots)
            .map(|(&mode, slot)| {
                let result = slot.unwrap_or_else(|| Err(OcrError::Join("task lost".into())));
                (mode, result)
            })
            .collect()
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.cfg.timeout_ms)
    }
}

/// One engine call on the blocking pool, bounded by `timeout`.
async fn recognize_bounded<R: OcrBackend>(
    backend: Arc<R>,
    png: Arc<[u8]>,
    options: RecognizeOptions,
    timeout: Duration,
) -> Result<Recognition, OcrError> {
    let task = tokio::task::spawn_blocking(move || backend.recognize(&png, &options));
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(OcrError::Join(e.to_string())),
        Err(_) => Err(OcrError::Timeout(timeout)),
    }
}

fn score(
    extractor: &FieldExtractor,
    mode: RecognitionMode,
    result: Result<Recognition, OcrError>,
) -> RecognitionCandidate {
    match result {
        Ok(rec) => {
            let text = normalize_text(&rec.text);
            let name = extractor.name(&text);
            debug!(
                kind = %extractor.kind(),
                %mode,
                confidence = ?rec.confidence,
                name = ?name,
                lines = text.lines().count(),
                "recognition candidate"
            );
            RecognitionCandidate::new(mode, text, rec.confidence, name)
        }
        Err(e) => {
            warn!(kind = %extractor.kind(), %mode, error = %e, "recognition failed; scoring mode as empty");
            RecognitionCandidate::failed(mode)
        }
    }
}

/// Pick the candidate with a name and the strictly highest confidence.
///
/// The running best starts at confidence 0, so a named candidate reporting 0
/// never wins. On equal confidence the earlier candidate is kept.
pub fn select_best(candidates: &[RecognitionCandidate]) -> Option<&RecognitionCandidate> {
    let mut best: Option<&RecognitionCandidate> = None;
    let mut best_confidence = 0.0f32;
    for c in candidates {
        if c.is_eligible() && c.confidence > best_confidence {
            best = Some(c);
            best_confidence = c.confidence;
        }
    }
    best
}

/// Drop characters outside printable ASCII (newlines survive), then collapse
/// runs of spaces and runs of newlines to one.
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars().filter(|c| *c == '\n' || (' '..='~').contains(c)) {
        if (c == ' ' || c == '\n') && out.ends_with(c) {
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::{MockRecognizer, ScriptedRecognizer};
    use RecognitionMode::*;

    fn processed() -> ProcessedImage {
        ProcessedImage { png: b"png".to_vec(), width: 10, height: 10, artifact: None }
    }

    fn engine<R: OcrBackend>(backend: R, cfg: RecognitionConfig) -> SweepEngine<R> {
        SweepEngine::new(Arc::new(backend), cfg, NameLines::Recognized)
    }

    fn candidate(mode: RecognitionMode, confidence: f32, name: Option<&str>) -> RecognitionCandidate {
        RecognitionCandidate::new(mode, format!("{mode}"), Some(confidence), name.map(str::to_string))
    }

    // ── normalize_text ────────────────────────────────────────────────────────

    #[test]
    fn normalize_strips_non_printable_and_collapses() {
        let raw = "RAMESH\u{00A0}  KUMAR\r\n\n\n1234\t5678 \u{2014} 9012\x07\n";
        assert_eq!(normalize_text(raw), "RAMESH KUMAR\n12345678 9012\n");
    }

    #[test]
    fn normalize_collapses_spaces_left_by_stripping() {
        assert_eq!(normalize_text("A \u{1} B"), "A B");
    }

    #[test]
    fn normalize_is_a_fixed_point() {
        for raw in ["  a  \n\n\n b \u{00e9}\n", "", "\n\n", "plain text"] {
            let once = normalize_text(raw);
            assert_eq!(normalize_text(&once), once);
        }
    }

    // ── select_best ───────────────────────────────────────────────────────────

    #[test]
    fn named_candidate_beats_more_confident_unnamed_one() {
        let candidates = vec![candidate(AutoOsd, 85.0, None), candidate(SingleLine, 60.0, Some("RAMESH KUMAR"))];
        assert_eq!(select_best(&candidates).unwrap().mode, SingleLine);
    }

    #[test]
    fn ties_go_to_the_earliest_mode() {
        let candidates = vec![
            candidate(SingleBlock, 70.0, Some("ASHA RAO")),
            candidate(SparseText, 70.0, Some("ASHA RA0")),
        ];
        assert_eq!(select_best(&candidates).unwrap().mode, SingleBlock);
    }

    #[test]
    fn zero_confidence_never_wins() {
        let candidates = vec![candidate(Auto, 0.0, Some("ASHA RAO"))];
        assert!(select_best(&candidates).is_none());
    }

    #[test]
    fn selection_has_maximum_confidence_among_named() {
        let candidates = vec![
            candidate(AutoOsd, 40.0, Some("A B C")),
            candidate(SingleLine, 95.0, None),
            candidate(SingleBlock, 72.5, Some("D E F")),
            candidate(SparseText, 72.5, Some("G H I")),
            candidate(Auto, 10.0, Some("J K L")),
        ];
        let best = select_best(&candidates).unwrap();
        let max = candidates
            .iter()
            .filter(|c| c.is_eligible())
            .map(|c| c.confidence)
            .fold(0.0f32, f32::max);
        assert_eq!(best.confidence, max);
        assert_eq!(best.mode, SingleBlock);
    }

    #[test]
    fn empty_candidate_list_has_no_winner() {
        assert!(select_best(&[]).is_none());
    }

    // ── sweep ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn sweep_prefers_named_candidate_over_higher_confidence() {
        let backend = ScriptedRecognizer::new()
            .on(AutoOsd, "1234 5678\n99", Some(85.0))
            .on(SingleLine, "RAMESH KUMAR\n1234 5678 9012", Some(60.0));
        let out = engine(backend, RecognitionConfig::default())
            .sweep(&processed(), DocumentKind::Aadhaar)
            .await;

        assert_eq!(out.best_text(), "RAMESH KUMAR\n1234 5678 9012");
        assert_eq!(out.best.as_ref().unwrap().mode, SingleLine);
        assert_eq!(out.candidates.len(), 8);
    }

    #[tokio::test]
    async fn sweep_visits_modes_in_configured_order() {
        let backend = ScriptedRecognizer::new()
            .on(RawLine, "SUNITA SHARMA", Some(50.0))
            .on(AutoOsd, "RAVI SHARMA", Some(50.0));
        let out = engine(backend, RecognitionConfig::default())
            .sweep(&processed(), DocumentKind::Pan)
            .await;

        let order: Vec<RecognitionMode> = out.candidates.iter().map(|c| c.mode).collect();
        assert_eq!(order, RecognitionMode::SWEEP_ORDER.to_vec());
        assert_eq!(out.best_text(), "RAVI SHARMA");
    }

    #[tokio::test]
    async fn failing_modes_do_not_abort_the_sweep() {
        let backend = ScriptedRecognizer::new()
            .fail(AutoOsd, "engine crashed")
            .on(RawLine, "KAVYA IYER\nABCDE1234F", Some(41.0));
        let out = engine(backend, RecognitionConfig::default())
            .sweep(&processed(), DocumentKind::Pan)
            .await;

        assert_eq!(out.best.as_ref().unwrap().mode, RawLine);
        let failed = &out.candidates[0];
        assert_eq!(failed.mode, AutoOsd);
        assert!(failed.text.is_empty());
        assert_eq!(failed.confidence, 0.0);
    }

    #[tokio::test]
    async fn sweep_without_names_returns_empty_text() {
        let out = engine(MockRecognizer::new("12 34\n!!"), RecognitionConfig::default())
            .sweep(&processed(), DocumentKind::Aadhaar)
            .await;
        assert!(out.best.is_none());
        assert_eq!(out.best_text(), "");
    }

    #[tokio::test]
    async fn missing_confidence_counts_as_zero() {
        let backend = MockRecognizer::new("RAMESH KUMAR").with_confidence(None);
        let out = engine(backend, RecognitionConfig::default())
            .sweep(&processed(), DocumentKind::Aadhaar)
            .await;
        assert!(out.candidates.iter().all(|c| c.confidence == 0.0));
        assert_eq!(out.best_text(), "");
    }

    #[tokio::test]
    async fn slow_mode_times_out_and_scores_empty() {
        let backend = ScriptedRecognizer::new()
            .stall(AutoOsd, Duration::from_millis(400), "SLOW NAME", Some(99.0))
            .on(SingleLine, "FAST NAME", Some(30.0));
        let cfg = RecognitionConfig {
            modes: vec![AutoOsd, SingleLine],
            timeout_ms: 50,
            ..RecognitionConfig::default()
        };
        let out = engine(backend, cfg).sweep(&processed(), DocumentKind::Aadhaar).await;

        assert_eq!(out.candidates[0].text, "");
        assert_eq!(out.best_text(), "FAST NAME");
    }

    #[tokio::test]
    async fn concurrent_sweep_matches_sequential() {
        let script = || {
            ScriptedRecognizer::new()
                .stall(AutoOsd, Duration::from_millis(30), "FIRST NAME", Some(70.0))
                .on(SingleLine, "SECOND NAME", Some(70.0))
                .on(SparseText, "1234", Some(95.0))
                .fail(Auto, "boom")
        };
        let sequential = engine(script(), RecognitionConfig::default())
            .sweep(&processed(), DocumentKind::Aadhaar)
            .await;
        let concurrent_cfg = RecognitionConfig { concurrent: true, ..RecognitionConfig::default() };
        let concurrent = engine(script(), concurrent_cfg)
            .sweep(&processed(), DocumentKind::Aadhaar)
            .await;

        assert_eq!(concurrent.candidates, sequential.candidates);
        assert_eq!(concurrent.best_text(), "FIRST NAME");
        assert_eq!(sequential.best_text(), "FIRST NAME");
    }
}
