//! Thumbnail derivation.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use crate::error::MediaError;

/// Decode `data`, shrink it to fit within `max_edge` x `max_edge`, and
/// write the result to `dest`.
///
/// The aspect ratio is preserved and images already within the bound are
/// written at their original size. The output format follows the
/// extension of `dest`, falling back to the format detected in `data`.
/// Returns the thumbnail dimensions.
pub fn write_thumbnail(data: &[u8], dest: &Path, max_edge: u32) -> Result<(u32, u32), MediaError> {
    if max_edge == 0 {
        return Err(MediaError::InvalidBound(max_edge));
    }

    let detected = image::guess_format(data)?;
    let img = image::load_from_memory_with_format(data, detected)?;

    let thumb = if img.width() > max_edge || img.height() > max_edge {
        img.resize(max_edge, max_edge, FilterType::Lanczos3)
    } else {
        img
    };

    let format = ImageFormat::from_path(dest).unwrap_or(detected);
    // JPEG has no alpha channel.
    let thumb = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(thumb.to_rgb8())
    } else {
        thumb
    };

    thumb.save_with_format(dest, format)?;
    Ok((thumb.width(), thumb.height()))
}
