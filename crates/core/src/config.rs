use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::mode::RecognitionMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables for the image normalization pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Bounding box edge the image is shrunk to fit (never enlarged).
    pub max_dimension: u32,
    /// Images narrower or shorter than this skip OCR entirely.
    pub min_dimension: u32,
    pub sharpen_sigma: f32,
    pub sharpen_threshold: i32,
    /// Multiplier applied to every luminance value.
    pub brightness: f32,
    /// Multiplier applied to the distance from mid-gray.
    pub contrast: f32,
    /// Median window is `2 * radius + 1` on each side.
    pub median_radius: u32,
    /// Luminance at or above this becomes white; below becomes black.
    pub threshold: u8,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            max_dimension: 1800,
            min_dimension: 3,
            sharpen_sigma: 3.0,
            sharpen_threshold: 0,
            brightness: 1.3,
            contrast: 2.5,
            median_radius: 2,
            threshold: 100,
        }
    }
}

/// How the OCR engine is driven during the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub language: String,
    pub char_whitelist: String,
    pub preserve_interword_spaces: bool,
    /// Modes to try, in order.
    pub modes: Vec<RecognitionMode>,
    /// Upper bound for a single engine call.
    pub timeout_ms: u64,
    /// Run all modes at once instead of one after another.
    pub concurrent: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            char_whitelist:
                "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 ".to_string(),
            preserve_interword_spaces: true,
            modes: RecognitionMode::SWEEP_ORDER.to_vec(),
            timeout_ms: 30_000,
            concurrent: false,
        }
    }
}

/// Which copy of the text the name heuristics read.
///
/// Identifier matching always runs on the confusion-corrected text
/// (`O`/`o` → `0`, `l`/`I` → `1`). With `Corrected` the name rules see the
/// same corrected lines, so names containing those letters get mangled and
/// usually rejected by the name filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameLines {
    #[default]
    Recognized,
    Corrected,
}

impl std::str::FromStr for NameLines {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recognized" => Ok(NameLines::Recognized),
            "corrected" => Ok(NameLines::Corrected),
            other => Err(format!("Unknown name line source: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub name_lines: NameLines,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub preprocess: PreprocessConfig,
    pub recognition: RecognitionConfig,
    pub extraction: ExtractionConfig,
}

impl ScanConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let cfg: ScanConfig = toml::from_str(toml_content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.preprocess;
        if p.min_dimension == 0 {
            return Err(ConfigError::Invalid("preprocess.min_dimension must be at least 1".into()));
        }
        if p.max_dimension < p.min_dimension {
            return Err(ConfigError::Invalid(format!(
                "preprocess.max_dimension ({}) is below min_dimension ({})",
                p.max_dimension, p.min_dimension
            )));
        }
        for (field, value) in [
            ("sharpen_sigma", p.sharpen_sigma),
            ("brightness", p.brightness),
            ("contrast", p.contrast),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "preprocess.{field} must be a positive number, got {value}"
                )));
            }
        }

        let r = &self.recognition;
        if r.modes.is_empty() {
            return Err(ConfigError::Invalid("recognition.modes must not be empty".into()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = r.modes.iter().find(|m| !seen.insert(**m)) {
            return Err(ConfigError::Invalid(format!("recognition.modes lists {dup} twice")));
        }
        if r.timeout_ms == 0 {
            return Err(ConfigError::Invalid("recognition.timeout_ms must be positive".into()));
        }
        if r.language.trim().is_empty() {
            return Err(ConfigError::Invalid("recognition.language must not be empty".into()));
        }
        Ok(())
    }
}
