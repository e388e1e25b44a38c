//! The resolution engine.
//!
//! Turns a [`WidgetState`] and a [`RuntimeContext`] into exactly one
//! [`ResolutionResult`]. Stateless, synchronous and total: every input
//! combination, including malformed values, produces a result with both
//! dimensions at least 1.
//!
//! | Piece | Module |
//! |---|---|
//! | Priority dispatcher | [`dispatch`] |
//! | Dimension formulas | [`formulas`] |
//! | Aspect-ratio resolver | [`aspect`] |
//! | Conflict detector | [`conflicts`] |
//!
//! ## Priority order (first match wins)
//!
//! 1. Image mode *exact dims* with an image attached
//! 2. Megapixels + width + height
//! 3. Width + height, megapixels + width, or megapixels + height
//! 4. Image mode *AR only* with an image attached
//! 5. Width, height or megapixels with the active aspect ratio
//! 6. Default 1.0 MP with the active aspect ratio
//!
//! Image modes without an image fall straight through to 6.
//!
//! Fallbacks are reported through `tracing` at `warn`; the resolver never
//! installs a subscriber itself.

pub mod aspect;
pub mod conflicts;
pub mod dispatch;
pub mod formulas;
mod result;

pub use aspect::{
    DEFAULT_PRESET, FALLBACK_RATIO, PRESET_LABELS, active_ratio, gcd, parse_custom_ratio,
    parse_preset_label, ratio_from_dimensions,
};
pub use conflicts::detect_conflicts;
pub use dispatch::Priority;
pub use result::{
    AspectRatio, Conflict, ConflictKind, DimensionSource, Mode, RATIO_EPSILON, RatioSource,
    ResolutionResult, Severity,
};

use crate::types::{RuntimeContext, WidgetState};
use tracing::debug;

/// Stateless resolver. Cheap to construct, safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver;

impl Resolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve base dimensions, aspect ratio and conflicts for one input state.
    pub fn resolve(&self, widgets: &WidgetState, context: &RuntimeContext) -> ResolutionResult {
        let priority = dispatch::select(widgets, context);
        debug!(level = priority.level(), ?priority, "selected priority");

        let computed = dispatch::compute(priority, widgets);
        let conflicts = detect_conflicts(computed.mode, widgets);
        debug!(
            mode = %computed.mode,
            width = computed.width,
            height = computed.height,
            conflicts = conflicts.len(),
            "resolved dimensions"
        );

        ResolutionResult {
            mode: computed.mode,
            priority_level: computed.mode.priority(),
            base_width: computed.width,
            base_height: computed.height,
            dimension_source: computed.source,
            aspect_ratio: computed.aspect_ratio,
            conflicts,
            description: computed.description,
            active_inputs: computed.active_inputs,
        }
    }
}

/// Shorthand for `Resolver::new().resolve(widgets, context)`.
pub fn resolve(widgets: &WidgetState, context: &RuntimeContext) -> ResolutionResult {
    Resolver::new().resolve(widgets, context)
}
