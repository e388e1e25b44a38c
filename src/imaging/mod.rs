//! Image dimension lookup, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Identify AVIF** | `avif_parse::read_avif` container metadata |
//! | **Path checks** | `..` rejection + canonical allow-list containment |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: path validation plus backend calls, and the
//!   `{width, height, success}` endpoint shape

pub mod backend;
pub mod operations;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use operations::{
    DimsError, ImageDimsResponse, PathError, get_dimensions, lookup_image_dims, read_image_dims,
    resolve_image_path,
};
pub use rust_backend::{RustBackend, supported_input_extensions};
