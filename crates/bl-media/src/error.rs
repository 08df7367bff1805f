//! Error types for bl-media.

use std::io;
use thiserror::Error;

/// Failure while storing an upload or deriving its thumbnail.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bytes could not be decoded or re-encoded as an image.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid thumbnail bound: {0}")]
    InvalidBound(u32),
}

impl From<MediaError> for bl_core::Error {
    fn from(err: MediaError) -> Self {
        bl_core::Error::Media(err.to_string())
    }
}
