use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageReader;

use crate::hash;

/// A submitted document photo, as received from intake.
#[derive(Debug, Clone)]
pub struct DocumentImage {
    bytes: Vec<u8>,
    source: Option<PathBuf>,
    width: u32,
    height: u32,
}

impl DocumentImage {
    /// Read an image from disk and probe its dimensions.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(bytes).with_source(path))
    }

    /// Wrap raw image bytes. Dimensions come from the image header only;
    /// unreadable headers are recorded as 0×0 so the size guard rejects them.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let (width, height) = probe_dimensions(&bytes).unwrap_or((0, 0));
        Self { bytes, source: None, width, height }
    }

    /// Record where the bytes came from; used only for logging.
    pub fn with_source(mut self, path: &Path) -> Self {
        self.source = Some(path.to_path_buf());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Lowercase hex SHA-256 of the original bytes.
    pub fn content_hash(&self) -> String {
        hash::to_hex(&hash::sha256_bytes(&self.bytes))
    }
}

fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// A normalized, binarized PNG ready to hand to the OCR engine.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Set once the PNG has been written out with [`crate::preprocess::materialize`].
    pub artifact: Option<PathBuf>,
}
