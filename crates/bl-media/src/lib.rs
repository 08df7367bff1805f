//! bl-media: storage for uploaded review images.
//!
//! - [`store`] - the [`MediaStore`] seam and the directory-backed [`LocalMediaStore`]
//! - [`thumbnail`] - bounded-size thumbnail derivation
//! - [`error`] - [`MediaError`], raised while processing a single upload

pub mod error;
pub mod store;
pub mod thumbnail;

pub use error::MediaError;
pub use store::{sanitize_extension, LocalMediaStore, MediaStore, StoredMedia};
