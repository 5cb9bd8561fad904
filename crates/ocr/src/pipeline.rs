use std::path::{Path, PathBuf};
use std::sync::Arc;

use idscan_core::{DocumentKind, DocumentOutcome, ScanConfig, ScanReport};
use tracing::{info, info_span, warn, Instrument};

use crate::extract::FieldExtractor;
use crate::preprocess::{self, PreprocessError};
use crate::recognizer::OcrBackend;
use crate::sweep::SweepEngine;
use crate::types::{DocumentImage, ProcessedImage};

/// Orchestrates, per document: size guard → preprocess → recognition sweep → extract.
///
/// The OCR backend is injected and shared between the two documents of a
/// request; nothing else is shared.
pub struct IdentityPipeline<R: OcrBackend> {
    config: ScanConfig,
    sweep: SweepEngine<R>,
    artifact_dir: Option<PathBuf>,
}

impl<R: OcrBackend> IdentityPipeline<R> {
    pub fn new(recognizer: R, config: ScanConfig) -> Self {
        let sweep = SweepEngine::new(
            Arc::new(recognizer),
            config.recognition.clone(),
            config.extraction.name_lines,
        );
        Self { config, sweep, artifact_dir: None }
    }

    /// Also write every processed image under `dir`.
    pub fn with_artifact_dir(mut self, dir: PathBuf) -> Self {
        self.artifact_dir = Some(dir);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Process both document slots of a request concurrently.
    pub async fn process(
        &self,
        aadhaar: Option<DocumentImage>,
        pan: Option<DocumentImage>,
    ) -> ScanReport {
        let (aadhaar, pan) = tokio::join!(
            self.process_document(aadhaar, DocumentKind::Aadhaar),
            self.process_document(pan, DocumentKind::Pan),
        );
        ScanReport { aadhaar, pan }
    }

    /// Like [`process`](Self::process), reading each image from disk first.
    pub async fn process_paths(&self, aadhaar: Option<&Path>, pan: Option<&Path>) -> ScanReport {
        let (aadhaar, pan) = tokio::join!(
            self.process_path(aadhaar, DocumentKind::Aadhaar),
            self.process_path(pan, DocumentKind::Pan),
        );
        ScanReport { aadhaar, pan }
    }

    /// An unreadable file is treated like a degenerate image.
    pub async fn process_path(&self, path: Option<&Path>, kind: DocumentKind) -> DocumentOutcome {
        let Some(path) = path else {
            return DocumentOutcome::NotSubmitted;
        };
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let image = DocumentImage::from_bytes(bytes).with_source(path);
                self.process_document(Some(image), kind).await
            }
            Err(e) => {
                warn!(%kind, path = %path.display(), error = %e, "could not read document image");
                DocumentOutcome::TooSmall
            }
        }
    }

    pub async fn process_document(
        &self,
        image: Option<DocumentImage>,
        kind: DocumentKind,
    ) -> DocumentOutcome {
        let Some(image) = image else {
            return DocumentOutcome::NotSubmitted;
        };
        let hash = image.content_hash();
        let short_hash = hash[..12].to_string();
        let span = info_span!("document", %kind, hash = %short_hash);

        async move {
            info!(
                width = image.width(),
                height = image.height(),
                source = ?image.source(),
                "processing document"
            );

            let processed = match self.preprocess(image, hash).await {
                Ok(p) => p,
                Err(e) => {
                    warn!(error = %e, "skipping OCR");
                    return DocumentOutcome::TooSmall;
                }
            };

            let sweep = self.sweep.sweep(&processed, kind).await;
            let fields = FieldExtractor::new(kind)
                .with_name_lines(self.config.extraction.name_lines)
                .extract(sweep.best_text());

            info!(
                best_mode = ?sweep.best.as_ref().map(|b| b.mode),
                name_found = fields.name.is_some(),
                number_found = fields.identifier_number.is_some(),
                "document parsed"
            );
            DocumentOutcome::Parsed(fields)
        }
        .instrument(span)
        .await
    }

    async fn preprocess(
        &self,
        image: DocumentImage,
        hash: String,
    ) -> Result<ProcessedImage, PreprocessError> {
        let cfg = self.config.preprocess.clone();
        let artifact_dir = self.artifact_dir.clone();

        // Image filters are CPU-bound; keep them off the async workers.
        let task = tokio::task::spawn_blocking(move || -> Result<ProcessedImage, PreprocessError> {
            let mut processed = preprocess::prepare_for_ocr(&image, &cfg)?;
            if let Some(dir) = artifact_dir {
                match preprocess::materialize(&mut processed, &dir, &hash) {
                    Ok(()) => info!(artifact = ?processed.artifact, "processed image saved"),
                    Err(e) => warn!(error = %e, "could not save processed image"),
                }
            }
            Ok(processed)
        });
        task.await.map_err(|e| PreprocessError::Io(std::io::Error::other(e)))?
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
