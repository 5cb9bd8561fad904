pub mod extract;
pub mod hash;
pub mod names;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod sweep;
pub mod types;

pub use extract::{correct_confusions, extract, FieldExtractor};
pub use hash::{processed_artifact_path, sha256_bytes, to_hex};
pub use names::is_likely_name;
pub use pipeline::IdentityPipeline;
pub use preprocess::{materialize, prepare_for_ocr, PreprocessError};
pub use recognizer::{
    MockRecognizer, OcrBackend, OcrError, Recognition, RecognizeOptions, ScriptedRecognizer,
};
pub use sweep::{normalize_text, select_best, SweepEngine, SweepOutcome};
pub use types::{DocumentImage, ProcessedImage};

#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;
