//! Image identification backend trait and shared types.
//!
//! The resolver only ever needs one fact about an image: its pixel size.
//! [`ImageBackend`] abstracts how that fact is read so the dimension
//! endpoint can be tested without touching the filesystem.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use crate::types::ImageInfo;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<Dimensions> for ImageInfo {
    fn from(dims: Dimensions) -> Self {
        ImageInfo::new(dims.width, dims.height)
    }
}

/// Trait for image identification backends.
pub trait ImageBackend: Sync {
    /// Get image dimensions without decoding pixel data where possible.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;
}
