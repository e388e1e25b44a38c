//! High-level image operations.
//!
//! These functions combine path validation with backend execution. Hosts
//! call [`read_image_dims`] to fill `runtime_context.image_info` before
//! resolving; the CLI uses [`lookup_image_dims`] directly.

use super::backend::{BackendError, ImageBackend};
use super::rust_backend::is_supported_image;
use crate::types::ImageInfo;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Path must not contain '..': {0}")]
    ParentTraversal(PathBuf),
    #[error("Path is outside the allowed directories: {0}")]
    OutsideAllowedDirs(PathBuf),
    #[error("Image not found: {0}")]
    NotFound(PathBuf),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DimsError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<ImageInfo> {
    let dims = backend.identify(path)?;
    Ok(dims.into())
}

fn canonical_dirs(allowed_dirs: &[PathBuf]) -> Vec<PathBuf> {
    allowed_dirs
        .iter()
        .filter_map(|dir| match dir.canonicalize() {
            Ok(canonical) => Some(canonical),
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unusable allowed dir");
                None
            }
        })
        .collect()
}

/// Resolve a caller-supplied image path against the allow-list.
///
/// Relative paths are tried under each allowed directory in order. The
/// canonical result must lie inside one of the (canonical) allowed
/// directories, which also rules out escapes through symlinks.
pub fn resolve_image_path(
    path: &Path,
    allowed_dirs: &[PathBuf],
) -> std::result::Result<PathBuf, PathError> {
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(PathError::ParentTraversal(path.to_path_buf()));
    }
    if !is_supported_image(path) {
        return Err(PathError::UnsupportedFormat(path.to_path_buf()));
    }

    let roots = canonical_dirs(allowed_dirs);
    let candidates: Vec<PathBuf> = if path.is_absolute() {
        vec![path.to_path_buf()]
    } else {
        allowed_dirs.iter().map(|dir| dir.join(path)).collect()
    };

    let mut found_outside = false;
    for candidate in candidates.iter().filter(|c| c.is_file()) {
        let canonical = candidate.canonicalize()?;
        if roots.iter().any(|root| canonical.starts_with(root)) {
            return Ok(canonical);
        }
        found_outside = true;
    }

    if found_outside {
        Err(PathError::OutsideAllowedDirs(path.to_path_buf()))
    } else {
        Err(PathError::NotFound(path.to_path_buf()))
    }
}

/// Validate `path` and read its dimensions.
pub fn lookup_image_dims(
    backend: &impl ImageBackend,
    path: &Path,
    allowed_dirs: &[PathBuf],
) -> std::result::Result<ImageInfo, DimsError> {
    let resolved = resolve_image_path(path, allowed_dirs)?;
    let info = get_dimensions(backend, &resolved)?;
    debug!(path = %resolved.display(), width = info.width, height = info.height, "read image dimensions");
    Ok(info)
}

/// Wire shape of the dimension endpoint.
///
/// `{"width": W, "height": H, "success": true}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDimsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageDimsResponse {
    pub fn image_info(&self) -> Option<ImageInfo> {
        Some(ImageInfo::new(self.width?, self.height?))
    }
}

/// Endpoint form of [`lookup_image_dims`]: failures become a response body.
pub fn read_image_dims(
    backend: &impl ImageBackend,
    path: &Path,
    allowed_dirs: &[PathBuf],
) -> ImageDimsResponse {
    match lookup_image_dims(backend, path, allowed_dirs) {
        Ok(info) => ImageDimsResponse {
            width: Some(info.width),
            height: Some(info.height),
            success: true,
            error: None,
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "image dimension lookup failed");
            ImageDimsResponse {
                width: None,
                height: None,
                success: false,
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::Dimensions;
    use crate::imaging::backend::tests::MockBackend;
    use crate::imaging::rust_backend::RustBackend;
    use image::RgbImage;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::new(width, height).save(&path).unwrap();
        path
    }

    #[test]
    fn get_dimensions_calls_backend() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 1920,
            height: 1080,
        }]);
        let info = get_dimensions(&backend, Path::new("/test/image.jpg")).unwrap();
        assert_eq!(info, ImageInfo::new(1920, 1080));
        assert_eq!(backend.identified_paths(), vec!["/test/image.jpg"]);
    }

    // =========================================================================
    // Path validation
    // =========================================================================

    #[test]
    fn relative_path_resolves_under_allowed_dir() {
        let tmp = TempDir::new().unwrap();
        write_png(tmp.path(), "photo.png", 4, 3);
        let allowed = vec![tmp.path().to_path_buf()];

        let resolved = resolve_image_path(Path::new("photo.png"), &allowed).unwrap();
        assert!(resolved.ends_with("photo.png"));
    }

    #[test]
    fn second_allowed_dir_is_searched() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_png(second.path(), "photo.png", 4, 3);
        let allowed = vec![first.path().to_path_buf(), second.path().to_path_buf()];

        assert!(resolve_image_path(Path::new("photo.png"), &allowed).is_ok());
    }

    #[test]
    fn parent_traversal_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let allowed = vec![tmp.path().to_path_buf()];
        let err = resolve_image_path(Path::new("../secret.png"), &allowed).unwrap_err();
        assert!(matches!(err, PathError::ParentTraversal(_)));
    }

    #[test]
    fn absolute_path_outside_allow_list_is_rejected() {
        let allowed_dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let outside = write_png(other.path(), "elsewhere.png", 4, 3);
        let allowed = vec![allowed_dir.path().to_path_buf()];

        let err = resolve_image_path(&outside, &allowed).unwrap_err();
        assert!(matches!(err, PathError::OutsideAllowedDirs(_)));
    }

    #[test]
    fn absolute_path_inside_allow_list_is_accepted() {
        let tmp = TempDir::new().unwrap();
        let inside = write_png(tmp.path(), "inside.png", 4, 3);
        let allowed = vec![tmp.path().to_path_buf()];
        assert!(resolve_image_path(&inside, &allowed).is_ok());
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let allowed = vec![tmp.path().to_path_buf()];
        let err = resolve_image_path(Path::new("missing.png"), &allowed).unwrap_err();
        assert!(matches!(err, PathError::NotFound(_)));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "hello").unwrap();
        let allowed = vec![tmp.path().to_path_buf()];
        let err = resolve_image_path(Path::new("notes.txt"), &allowed).unwrap_err();
        assert!(matches!(err, PathError::UnsupportedFormat(_)));
    }

    // =========================================================================
    // Endpoint responses
    // =========================================================================

    #[test]
    fn read_image_dims_success_shape() {
        let tmp = TempDir::new().unwrap();
        write_png(tmp.path(), "wide.png", 32, 18);
        let allowed = vec![tmp.path().to_path_buf()];

        let response = read_image_dims(&RustBackend::new(), Path::new("wide.png"), &allowed);
        assert_eq!(response.image_info(), Some(ImageInfo::new(32, 18)));

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "width": 32, "height": 18, "success": true })
        );
    }

    #[test]
    fn read_image_dims_failure_shape() {
        let tmp = TempDir::new().unwrap();
        let allowed = vec![tmp.path().to_path_buf()];

        let response = read_image_dims(&RustBackend::new(), Path::new("../x.png"), &allowed);
        assert!(!response.success);
        assert_eq!(response.image_info(), None);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], false);
        assert!(value["error"].as_str().unwrap().contains(".."));
        assert!(value.get("width").is_none());
    }

    #[test]
    fn backend_failure_becomes_error_response() {
        let tmp = TempDir::new().unwrap();
        write_png(tmp.path(), "photo.png", 4, 3);
        let allowed = vec![tmp.path().to_path_buf()];

        let response = read_image_dims(&MockBackend::new(), Path::new("photo.png"), &allowed);
        assert!(!response.success);
        assert!(response.error.unwrap().contains("No mock dimensions"));
    }
}
