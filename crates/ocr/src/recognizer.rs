use std::collections::HashMap;
use std::time::Duration;

use idscan_core::{RecognitionConfig, RecognitionMode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available: rebuild with the `tesseract` feature or use `idscan parse`")]
    NotAvailable,
    #[error("OCR call exceeded {0:?}")]
    Timeout(Duration),
    #[error("OCR worker failed: {0}")]
    Join(String),
}

/// Per-call engine settings. One of these is built for every sweep mode.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizeOptions {
    pub language: String,
    pub char_whitelist: String,
    pub preserve_interword_spaces: bool,
    pub mode: RecognitionMode,
}

impl RecognizeOptions {
    pub fn for_mode(cfg: &RecognitionConfig, mode: RecognitionMode) -> Self {
        Self {
            language: cfg.language.clone(),
            char_whitelist: cfg.char_whitelist.clone(),
            preserve_interword_spaces: cfg.preserve_interword_spaces,
            mode,
        }
    }
}

/// Raw engine output for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub text: String,
    /// Mean confidence on a 0 to 100 scale, if the engine reported one.
    pub confidence: Option<f32>,
}

impl Recognition {
    pub fn new(text: impl Into<String>, confidence: Option<f32>) -> Self {
        Self { text: text.into(), confidence }
    }
}

/// Abstraction over an OCR backend.
/// Implementations accept PNG bytes and return the recognized text with a confidence score.
pub trait OcrBackend: Send + Sync + 'static {
    fn recognize(&self, image_png: &[u8], options: &RecognizeOptions)
        -> Result<Recognition, OcrError>;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set string for every mode. Lets the pipeline run
/// without Tesseract installed.
pub struct MockRecognizer {
    pub text: String,
    pub confidence: Option<f32>,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), confidence: Some(90.0) }
    }

    pub fn with_confidence(mut self, confidence: Option<f32>) -> Self {
        self.confidence = confidence;
        self
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_png: &[u8], _options: &RecognizeOptions) -> Result<Recognition, OcrError> {
        Ok(Recognition::new(self.text.clone(), self.confidence))
    }
}

/// Plays back a fixed result per recognition mode. Modes without a script
/// entry fail with an engine error.
#[derive(Default)]
pub struct ScriptedRecognizer {
    script: HashMap<RecognitionMode, ScriptedResult>,
}

enum ScriptedResult {
    Text(Recognition),
    Fail(String),
    Stall(Duration, Recognition),
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, mode: RecognitionMode, text: impl Into<String>, confidence: Option<f32>) -> Self {
        self.script.insert(mode, ScriptedResult::Text(Recognition::new(text, confidence)));
        self
    }

    pub fn fail(mut self, mode: RecognitionMode, message: impl Into<String>) -> Self {
        self.script.insert(mode, ScriptedResult::Fail(message.into()));
        self
    }

    /// Block for `delay` before answering; used to exercise timeouts.
    pub fn stall(
        mut self,
        mode: RecognitionMode,
        delay: Duration,
        text: impl Into<String>,
        confidence: Option<f32>,
    ) -> Self {
        self.script
            .insert(mode, ScriptedResult::Stall(delay, Recognition::new(text, confidence)));
        self
    }
}

impl OcrBackend for ScriptedRecognizer {
    fn recognize(&self, _image_png: &[u8], options: &RecognizeOptions) -> Result<Recognition, OcrError> {
        match self.script.get(&options.mode) {
            Some(ScriptedResult::Text(r)) => Ok(r.clone()),
            Some(ScriptedResult::Stall(delay, r)) => {
                std::thread::sleep(*delay);
                Ok(r.clone())
            }
            Some(ScriptedResult::Fail(msg)) => Err(OcrError::Engine(msg.clone())),
            None => Err(OcrError::Engine(format!("no scripted result for {}", options.mode))),
        }
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError, Recognition, RecognizeOptions};
    use leptess::{LepTess, Variable};

    /// A fresh engine is initialised per call so each sweep mode starts from
    /// identical state and calls can run on separate threads.
    pub struct TesseractRecognizer {
        data_path: Option<String>,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>) -> Self {
            Self { data_path }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_png: &[u8], options: &RecognizeOptions) -> Result<Recognition, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &options.language)
                .map_err(|e| OcrError::Engine(e.to_string()))?;

            let psm = options.mode.psm().to_string();
            let spaces = if options.preserve_interword_spaces { "1" } else { "0" };
            for (var, value) in [
                (Variable::TesseditCharWhitelist, options.char_whitelist.as_str()),
                (Variable::PreserveInterwordSpaces, spaces),
                (Variable::TesseditPagesegMode, psm.as_str()),
            ] {
                lt.set_variable(var, value)
                    .map_err(|e| OcrError::Engine(e.to_string()))?;
            }

            lt.set_image_from_mem(image_png)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            let text = lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))?;
            let confidence = lt.mean_text_conf();
            Ok(Recognition::new(text, (confidence >= 0).then_some(confidence as f32)))
        }
    }
}
