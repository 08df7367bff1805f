//! Upload persistence.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::MediaError;
use crate::thumbnail::write_thumbnail;

/// Result of accepting one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    /// Name of the stored original, relative to the store.
    pub filename: String,
    /// URL under which the original is served.
    pub reference_url: String,
    /// URL of the derived thumbnail, when one could be produced.
    pub thumbnail_url: Option<String>,
}

/// Receives uploaded bytes and hands back an opaque reference.
pub trait MediaStore: Send + Sync {
    /// Persist `data`, named after `filename` only for its extension.
    fn accept(&self, filename: &str, data: &[u8]) -> bl_core::Result<StoredMedia>;
}

/// Lower-cased extension of `filename` when it is 1-10 ASCII alphanumerics,
/// otherwise `bin`.
pub fn sanitize_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| (1..=10).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}

/// Directory-backed store: originals as `{uuid}.{ext}`, thumbnails as
/// `{uuid}_thumb.{ext}`.
pub struct LocalMediaStore {
    dir: PathBuf,
    url_prefix: String,
    thumbnail_max_edge: u32,
}

impl LocalMediaStore {
    /// Create the store, creating `dir` if it does not exist.
    pub fn new(
        dir: impl Into<PathBuf>,
        url_prefix: &str,
        thumbnail_max_edge: u32,
    ) -> Result<Self, MediaError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
            thumbnail_max_edge,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.url_prefix, name)
    }
}

impl MediaStore for LocalMediaStore {
    fn accept(&self, filename: &str, data: &[u8]) -> bl_core::Result<StoredMedia> {
        let stem = Uuid::new_v4().to_string();
        let ext = sanitize_extension(filename);
        let stored_name = format!("{stem}.{ext}");

        std::fs::write(self.dir.join(&stored_name), data).map_err(MediaError::from)?;

        let thumb_name = format!("{stem}_thumb.{ext}");
        let thumb_path = self.dir.join(&thumb_name);
        let thumbnail_url = match write_thumbnail(data, &thumb_path, self.thumbnail_max_edge) {
            Ok((width, height)) => {
                tracing::debug!(file = %thumb_name, width, height, "Generated thumbnail");
                Some(self.url_for(&thumb_name))
            }
            Err(e) => {
                tracing::warn!(file = %stored_name, error = %e, "Thumbnail generation failed");
                let _ = std::fs::remove_file(&thumb_path);
                None
            }
        };

        tracing::info!(
            file = %stored_name,
            bytes = data.len(),
            thumbnail = thumbnail_url.is_some(),
            "Stored upload"
        );

        Ok(StoredMedia {
            reference_url: self.url_for(&stored_name),
            filename: stored_name,
            thumbnail_url,
        })
    }
}
