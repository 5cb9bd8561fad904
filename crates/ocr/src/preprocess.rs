use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use idscan_core::PreprocessConfig;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

use crate::hash;
use crate::types::{DocumentImage, ProcessedImage};

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Image is {width}x{height}, too small for OCR")]
    TooSmall { width: u32, height: u32 },
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
    #[error("Failed to write processed image: {0}")]
    Io(#[from] std::io::Error),
}

/// Normalize a document photo for OCR and return it as PNG bytes.
///
/// Rejects images below `min_dimension` on either side before decoding.
pub fn prepare_for_ocr(
    doc: &DocumentImage,
    cfg: &PreprocessConfig,
) -> Result<ProcessedImage, PreprocessError> {
    let (width, height) = doc.dimensions();
    if width < cfg.min_dimension || height < cfg.min_dimension {
        return Err(PreprocessError::TooSmall { width, height });
    }

    let decoded = image::load_from_memory(doc.bytes())?;
    let gray = normalize(decoded, cfg);
    let png = encode_as_png(&gray)?;
    Ok(ProcessedImage {
        png,
        width: gray.width(),
        height: gray.height(),
        artifact: None,
    })
}

/// Write the processed PNG under `dir` using the source content hash and
/// record where it went.
pub fn materialize(
    processed: &mut ProcessedImage,
    dir: &Path,
    source_hash: &str,
) -> Result<(), PreprocessError> {
    let dest = hash::processed_artifact_path(dir, source_hash);
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&dest, &processed.png)?;
    processed.artifact = Some(dest);
    Ok(())
}

/// Resize → grayscale → sharpen → brightness/contrast → median → threshold.
/// Resizing comes first so the filters run on a bounded pixel count.
fn normalize(img: DynamicImage, cfg: &PreprocessConfig) -> GrayImage {
    let max = cfg.max_dimension;
    let img = if img.width() > max || img.height() > max {
        img.resize(max, max, FilterType::Lanczos3)
    } else {
        img
    };

    let gray = img.to_luma8();
    let sharpened: GrayImage = imageops::unsharpen(&gray, cfg.sharpen_sigma, cfg.sharpen_threshold);
    let modulated = modulate(sharpened, cfg.brightness, cfg.contrast);
    let denoised = imageproc::filter::median_filter(&modulated, cfg.median_radius, cfg.median_radius);
    binarize(denoised, cfg.threshold)
}

/// Scale luminance by `brightness`, then stretch it away from mid-gray by
/// `contrast`. Saturates at 0 and 255.
fn modulate(mut gray: GrayImage, brightness: f32, contrast: f32) -> GrayImage {
    let lut = modulation_table(brightness, contrast);
    for p in gray.pixels_mut() {
        p[0] = lut[p[0] as usize];
    }
    gray
}

fn modulation_table(brightness: f32, contrast: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        let bright = v as f32 * brightness;
        let stretched = (bright - 128.0) * contrast + 128.0;
        *out = stretched.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

fn binarize(mut gray: GrayImage, threshold: u8) -> GrayImage {
    for p in gray.pixels_mut() {
        p[0] = if p[0] >= threshold { 255 } else { 0 };
    }
    gray
}

fn encode_as_png(img: &GrayImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}
