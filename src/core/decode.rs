// ImageRef - core/decode.rs
//
// Turns raw payloads into renderable RGBA bitmaps.
//
// Encoded payloads are sniffed from their leading bytes rather than trusted
// by file extension, so a mislabelled file still decodes and a non-image
// renamed to .png is rejected. Decoder limits cap the image size before any
// pixel buffer is allocated.

use crate::core::fit;
use crate::core::model::{DecodedImage, ImageData, RawPayload};
use crate::util::constants::{MAX_IMAGE_DIMENSION, SUPPORTED_EXTENSIONS};
use crate::util::error::DecodeError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// Decode `payload` and build its thumbnail.
///
/// `thumbnail_edge` is the longest edge of the generated thumbnail; images
/// already within that bound share their pixels with the thumbnail.
pub fn decode_payload(payload: RawPayload, thumbnail_edge: u32) -> Result<ImageData, DecodeError> {
    let image = match payload {
        RawPayload::Encoded { bytes } => decode_encoded(&bytes)?,
        RawPayload::Rgba {
            width,
            height,
            bytes,
        } => DynamicImage::ImageRgba8(rgba_from_raw(width, height, bytes)?),
    };

    let full = to_decoded(&image);
    let thumbnail = if image.width() > thumbnail_edge || image.height() > thumbnail_edge {
        to_decoded(&image.thumbnail(thumbnail_edge, thumbnail_edge))
    } else {
        full.clone()
    };

    Ok(ImageData { full, thumbnail })
}

/// Whether `path` has one of the supported image file extensions.
pub fn is_supported_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// A copy of `image` shrunk so neither side exceeds `max_side`, or `None`
/// if it already fits.
///
/// GPU backends refuse textures beyond their maximum side, which can be
/// smaller than `MAX_IMAGE_DIMENSION`.
pub fn downscale_to_side(image: &DecodedImage, max_side: u32) -> Option<DecodedImage> {
    let (width, height) = fit::clamp_to_side((image.width, image.height), max_side);
    if (width, height) == (image.width, image.height) {
        return None;
    }
    let source = RgbaImage::from_raw(image.width, image.height, image.rgba.to_vec())?;
    let scaled = imageops::resize(&source, width, height, FilterType::Triangle);
    Some(DecodedImage {
        width,
        height,
        rgba: Arc::from(scaled.into_raw()),
    })
}

fn decode_encoded(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::from)?;

    let mut limits = image::Limits::default();
    limits.max_image_width = Some(MAX_IMAGE_DIMENSION);
    limits.max_image_height = Some(MAX_IMAGE_DIMENSION);
    reader.limits(limits);

    Ok(reader.decode()?)
}

fn rgba_from_raw(width: u32, height: u32, bytes: Vec<u8>) -> Result<RgbaImage, DecodeError> {
    if width == 0 || height == 0 || bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(DecodeError::TooLarge {
            width,
            height,
            max_dimension: MAX_IMAGE_DIMENSION,
        });
    }

    // Both sides are bounded above, so this cannot overflow.
    let expected = width as usize * height as usize * 4;
    let actual = bytes.len();
    if actual != expected {
        return Err(DecodeError::PixelBufferMismatch {
            width,
            height,
            expected,
            actual,
        });
    }

    RgbaImage::from_raw(width, height, bytes).ok_or(DecodeError::PixelBufferMismatch {
        width,
        height,
        expected,
        actual,
    })
}

fn to_decoded(image: &DynamicImage) -> DecodedImage {
    let rgba = image.to_rgba8();
    DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: Arc::from(rgba.into_raw()),
    }
}
