//! Item encoder
//!
//! Prepares one uploaded image for the upstream service. Media types the
//! service accepts pass through untouched; anything else decodable is
//! re-encoded as PNG. Failures stay local to the item.

use crate::core::batch::Item;
use image::ImageFormat;
use std::io::Cursor;
use thiserror::Error;

/// Media types the upstream accepts as inline image data
pub const ACCEPTED_MEDIA_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/heic",
    "image/heif",
];

/// Wire representation of one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("image is empty")]
    Empty,
    #[error("could not decode image: {0}")]
    Decode(String),
    #[error("could not re-encode image as PNG: {0}")]
    Encode(String),
}

/// Identity-or-normalize an item into its wire representation
pub fn encode(item: Item) -> Result<EncodedImage, EncodeError> {
    let (bytes, declared) = item.into_parts();
    if bytes.is_empty() {
        return Err(EncodeError::Empty);
    }

    let media_type = declared
        .as_deref()
        .and_then(canonical_media_type)
        .or_else(|| sniff_media_type(&bytes));

    match media_type {
        Some(media_type) if is_accepted(&media_type) => Ok(EncodedImage { bytes, media_type }),
        _ => normalize_to_png(&bytes),
    }
}

/// Whether the upstream accepts this media type as-is
pub fn is_accepted(media_type: &str) -> bool {
    ACCEPTED_MEDIA_TYPES.contains(&media_type)
}

/// Lowercase, strip parameters and fold known aliases. Non-image types
/// yield `None` so the bytes get sniffed instead.
fn canonical_media_type(declared: &str) -> Option<String> {
    let essence = declared
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/jpg" | "image/pjpeg" => Some("image/jpeg".to_string()),
        "image/x-png" => Some("image/png".to_string()),
        other if other.starts_with("image/") => Some(essence),
        _ => None,
    }
}

fn sniff_media_type(bytes: &[u8]) -> Option<String> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type().to_string())
}

fn normalize_to_png(bytes: &[u8]) -> Result<EncodedImage, EncodeError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| EncodeError::Decode(e.to_string()))?;

    let mut out = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|e| EncodeError::Encode(e.to_string()))?;

    Ok(EncodedImage {
        bytes: out,
        media_type: "image/png".to_string(),
    })
}
