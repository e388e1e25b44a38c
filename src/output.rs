//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Resolution
//!
//! ```text
//! Priority 3: mp_width_explicit
//!     Base: 1200×1250
//!     Source: widgets_mp_computed
//!     Aspect ratio: 24:25 (computed)
//!     Active: width, megapixel
//!     Width 1200 at 1.50 MP: height 1250 (24:25)
//! Conflicts
//!     [info] dropdown_overridden: Explicit dimensions define ...
//!         Affects: aspect_ratio_dropdown
//! ```
//!
//! ## Final
//!
//! ```text
//! Final: 1200 x 1248
//!     Megapixels: 1.50
//!     Latent: [1, 4, 156, 150]
//!     Mode: Width 1200 at 1.50 MP: height 1250 (24:25) | Div: 16
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::finalize::FinalDimensions;
use crate::resolver::ResolutionResult;
use crate::types::ImageInfo;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn join_names<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Resolution
// ============================================================================

pub fn format_resolution(result: &ResolutionResult) -> Vec<String> {
    let ar = &result.aspect_ratio;
    let mut lines = vec![
        format!("Priority {}: {}", result.priority_level, result.mode),
        format!("{}Base: {}×{}", indent(1), result.base_width, result.base_height),
        format!("{}Source: {}", indent(1), result.dimension_source),
        format!("{}Aspect ratio: {} ({})", indent(1), ar, ar.source.as_str()),
    ];
    if !result.active_inputs.is_empty() {
        lines.push(format!(
            "{}Active: {}",
            indent(1),
            join_names(&result.active_inputs)
        ));
    }
    lines.push(format!("{}{}", indent(1), result.description));

    if !result.conflicts.is_empty() {
        lines.push("Conflicts".to_string());
        for conflict in &result.conflicts {
            lines.push(format!(
                "{}[{}] {}: {}",
                indent(1),
                conflict.severity.as_str(),
                conflict.kind.as_str(),
                conflict.message
            ));
            lines.push(format!(
                "{}Affects: {}",
                indent(2),
                join_names(&conflict.affected_inputs)
            ));
        }
    }
    lines
}

pub fn print_resolution(result: &ResolutionResult) {
    for line in format_resolution(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Final dimensions
// ============================================================================

pub fn format_final(dims: &FinalDimensions) -> Vec<String> {
    let [batch, channels, h, w] = dims.latent_shape;
    vec![
        format!("Final: {}", dims.resolution),
        format!("{}Megapixels: {:.2}", indent(1), dims.megapixels),
        format!("{}Latent: [{batch}, {channels}, {h}, {w}]", indent(1)),
        format!("{}{}", indent(1), dims.info),
    ]
}

pub fn print_final(dims: &FinalDimensions) {
    for line in format_final(dims) {
        println!("{}", line);
    }
}

// ============================================================================
// Presets and image dimensions
// ============================================================================

/// One label per line; the default is marked with `*`.
pub fn format_presets(labels: &[&str], default: &str) -> Vec<String> {
    labels
        .iter()
        .map(|label| {
            let marker = if *label == default { "*" } else { " " };
            format!("{marker} {label}")
        })
        .collect()
}

pub fn print_presets(labels: &[&str], default: &str) {
    for line in format_presets(labels, default) {
        println!("{}", line);
    }
}

pub fn format_dims(path: &Path, info: &ImageInfo) -> Vec<String> {
    vec![
        format!("{}", path.display()),
        format!("{}Dimensions: {}×{}", indent(1), info.width, info.height),
    ]
}

pub fn print_dims(path: &Path, info: &ImageInfo) {
    for line in format_dims(path, info) {
        println!("{}", line);
    }
}
