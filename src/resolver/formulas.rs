//! Pure dimension formulas used by the priority levels.
//!
//! All functions here are pure and testable without any I/O. Every float to
//! pixel conversion goes through [`round_dimension`], which rounds half to
//! even and never returns less than 1.

/// Pixels per megapixel.
pub const PIXELS_PER_MEGAPIXEL: f64 = 1_000_000.0;

/// Megapixel target used when no dimension input drives the result.
pub const DEFAULT_MEGAPIXELS: f64 = 1.0;

/// Substitute for a non-positive width.
pub const FALLBACK_WIDTH: u32 = 1920;

/// Substitute for a non-positive height.
pub const FALLBACK_HEIGHT: u32 = 1080;

/// Round a derived dimension to whole pixels.
///
/// Round-half-to-even, clamped to `1..=u32::MAX`. Non-finite input yields 1.
///
/// ```
/// # use smart_res::resolver::formulas::round_dimension;
/// assert_eq!(round_dimension(802.5), 802);
/// assert_eq!(round_dimension(803.5), 804);
/// assert_eq!(round_dimension(0.2), 1);
/// ```
pub fn round_dimension(value: f64) -> u32 {
    if !value.is_finite() {
        return 1;
    }
    value.round_ties_even().clamp(1.0, u32::MAX as f64) as u32
}

/// Convert a megapixel count to a pixel count.
pub fn target_pixels(megapixels: f64) -> f64 {
    megapixels * PIXELS_PER_MEGAPIXEL
}

/// Scale to `target` pixels while preserving `ratio` (width / height).
///
/// `h = sqrt(target / ratio)`, `w = h * ratio`; both rounded only at the end
/// so the width is derived from the unrounded height.
///
/// # Returns
/// * `(width, height)`
pub fn scale_to_pixels(target: f64, ratio: f64) -> (u32, u32) {
    let height = (target / ratio).sqrt();
    let width = height * ratio;
    (round_dimension(width), round_dimension(height))
}

/// Height implied by `width` at `ratio`.
pub fn height_from_width(width: u32, ratio: f64) -> u32 {
    round_dimension(width as f64 / ratio)
}

/// Width implied by `height` at `ratio`.
pub fn width_from_height(height: u32, ratio: f64) -> u32 {
    round_dimension(height as f64 * ratio)
}

/// The other side of a `target`-pixel area given one side.
pub fn side_from_pixels(target: f64, known_side: u32) -> u32 {
    round_dimension(target / known_side as f64)
}

/// Clamp a caller-supplied dimension into `u32`, or `None` if it is not positive.
pub fn positive_dimension(value: i64) -> Option<u32> {
    if value <= 0 {
        None
    } else {
        Some(value.min(u32::MAX as i64) as u32)
    }
}

/// A usable megapixel value: finite and strictly positive.
pub fn positive_megapixels(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}
