use serde::{Deserialize, Serialize};

use crate::mode::RecognitionMode;

/// One pass of the recognition sweep: the text a mode produced, how sure the
/// engine was, and the name the extractor could pull out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionCandidate {
    pub mode: RecognitionMode,
    /// Normalized recognized text.
    pub text: String,
    /// Engine-reported confidence, 0 to 100. Missing confidence is stored as 0.
    pub confidence: f32,
    /// Name-only extraction result for this text.
    pub name: Option<String>,
}

impl RecognitionCandidate {
    pub fn new(
        mode: RecognitionMode,
        text: impl Into<String>,
        confidence: Option<f32>,
        name: Option<String>,
    ) -> Self {
        let confidence = confidence
            .filter(|c| c.is_finite())
            .unwrap_or(0.0)
            .clamp(0.0, 100.0);
        Self {
            mode,
            text: text.into(),
            confidence,
            name: name.filter(|n| !n.is_empty()),
        }
    }

    /// A mode whose engine call failed or timed out.
    pub fn failed(mode: RecognitionMode) -> Self {
        Self::new(mode, String::new(), None, None)
    }

    /// Only candidates with a recovered name can win the sweep.
    pub fn is_eligible(&self) -> bool {
        self.name.is_some()
    }
}
