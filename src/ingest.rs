//! Image ingestion - user-chosen file to a bounded embeddable data-URI
//!
//! Oversized raw input is rejected before any decode work. Accepted images
//! are downscaled to fit 800px (never upscaled), re-encoded as JPEG and
//! returned as a `data:image/jpeg;base64,...` string.

use std::fs;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::error::{Error, Result};

/// Raw input ceiling, checked before decoding.
pub const MAX_INPUT_BYTES: u64 = 5 * 1024 * 1024;

/// Longest edge after downscaling.
const MAX_DIMENSION: u32 = 800;

const JPEG_QUALITY: u8 = 80;

/// Ingest an image file from disk.
pub fn ingest(path: &Path) -> Result<String> {
    let meta = fs::metadata(path).map_err(|e| Error::Decode(e.to_string()))?;
    if meta.len() > MAX_INPUT_BYTES {
        return Err(Error::SizeLimit {
            size: meta.len(),
            limit: MAX_INPUT_BYTES,
        });
    }
    let raw = fs::read(path).map_err(|e| Error::Decode(e.to_string()))?;
    ingest_bytes(&raw)
}

/// Ingest an already-read image buffer.
pub fn ingest_bytes(raw: &[u8]) -> Result<String> {
    let size = raw.len() as u64;
    if size > MAX_INPUT_BYTES {
        return Err(Error::SizeLimit {
            size,
            limit: MAX_INPUT_BYTES,
        });
    }
    let decoded = image::load_from_memory(raw).map_err(|e| Error::Decode(e.to_string()))?;
    encode(shrink(decoded))
}

/// Scale down to fit MAX_DIMENSION on both axes, preserving aspect ratio.
fn shrink(img: DynamicImage) -> DynamicImage {
    if img.width() <= MAX_DIMENSION && img.height() <= MAX_DIMENSION {
        return img;
    }
    img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Triangle)
}

fn encode(img: DynamicImage) -> Result<String> {
    // JPEG has no alpha channel.
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    encoder
        .encode_image(&rgb)
        .map_err(|e| Error::Decode(e.to_string()))?;
    Ok(format!(
        "data:image/jpeg;base64,{}",
        STANDARD.encode(&buf)
    ))
}
