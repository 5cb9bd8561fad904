pub mod candidate;
pub mod config;
pub mod fields;
pub mod kind;
pub mod mode;

pub use candidate::RecognitionCandidate;
pub use config::{
    ConfigError, ExtractionConfig, NameLines, PreprocessConfig, RecognitionConfig, ScanConfig,
};
pub use fields::{DocumentOutcome, ParsedFields, ScanReport, TOO_SMALL_MESSAGE};
pub use kind::DocumentKind;
pub use mode::RecognitionMode;
