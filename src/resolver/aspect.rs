//! Aspect-ratio resolution: custom text, preset labels, and concrete dimensions.
//!
//! The *active* ratio (priority levels 5 and 6) is the custom text when its
//! toggle is on, otherwise the preset dropdown. The attached image is never
//! consulted here; its ratio is handled by priority level 4 alone.
//!
//! Text is never reduced: `21:9` stays `21:9`. Ratios derived from dimensions
//! are reduced by their GCD, so `1920x1080` becomes `16:9`.

use super::result::{AspectRatio, RatioSource};
use crate::types::WidgetState;
use tracing::warn;

/// Ratio used whenever custom text or a preset label cannot be parsed.
pub const FALLBACK_RATIO: (u32, u32) = (16, 9);

/// Default dropdown selection.
pub const DEFAULT_PRESET: &str = "3:4 (Golden Ratio)";

/// Built-in dropdown labels, portrait first, then landscape.
pub const PRESET_LABELS: &[&str] = &[
    "1:1 (Perfect Square)",
    "2:3 (Classic Portrait)",
    "3:4 (Golden Ratio)",
    "3:5 (Elegant Vertical)",
    "4:5 (Artistic Frame)",
    "5:7 (Balanced Portrait)",
    "5:8 (Tall Portrait)",
    "7:9 (Modern Portrait)",
    "9:16 (Slim Vertical)",
    "9:19 (Tall Slim)",
    "9:21 (Ultra Tall)",
    "9:32 (Skyline)",
    "3:2 (Golden Landscape)",
    "4:3 (Classic Landscape)",
    "5:3 (Wide Horizon)",
    "5:4 (Balanced Frame)",
    "7:5 (Elegant Landscape)",
    "8:5 (Cinematic View)",
    "9:7 (Artful Horizon)",
    "16:9 (Panorama)",
    "19:9 (Cinematic Ultrawide)",
    "21:9 (Epic Ultrawide)",
    "32:9 (Extreme Ultrawide)",
];

/// Greatest common divisor (Euclid). `gcd(0, n) == n`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Reduced ratio of concrete dimensions.
///
/// `aspect_w`/`aspect_h` are the coprime terms; `ratio` is `w / h` computed
/// from the unreduced values. Both sides must be non-zero.
///
/// ```
/// # use smart_res::resolver::ratio_from_dimensions;
/// let ar = ratio_from_dimensions(1200, 1250);
/// assert_eq!((ar.aspect_w, ar.aspect_h), (24.0, 25.0));
/// ```
pub fn ratio_from_dimensions(width: u32, height: u32) -> AspectRatio {
    let g = gcd(width as u64, height as u64).max(1);
    AspectRatio {
        ratio: width as f64 / height as f64,
        aspect_w: (width as u64 / g) as f64,
        aspect_h: (height as u64 / g) as f64,
        source: RatioSource::Computed,
    }
}

/// Parse one side of a custom ratio: digits, optionally `.` and more digits.
fn parse_term(term: &str) -> Option<f64> {
    let (whole, frac) = match term.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (term, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || frac.is_some_and(|f| !digits(f)) {
        return None;
    }
    term.parse().ok()
}

/// Parse custom ratio text of the form `W:H`, decimals allowed (`2.39:1`).
///
/// Surrounding whitespace is ignored. Returns `None` for anything else,
/// including zero terms.
pub fn parse_custom_ratio(text: &str) -> Option<(f64, f64)> {
    let (w, h) = text.trim().split_once(':')?;
    let (w, h) = (parse_term(w)?, parse_term(h)?);
    (w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()).then_some((w, h))
}

/// Extract the leading integer `W:H` pair from a descriptive label.
///
/// `"16:9 (HD Video/YouTube/TV)"` → `(16, 9)`.
pub fn parse_preset_label(label: &str) -> Option<(u32, u32)> {
    let head = label.split_whitespace().next()?;
    let head = head.split('(').next().unwrap_or(head);
    let (w, h) = head.split_once(':')?;
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(w) || !digits(h) {
        return None;
    }
    let (w, h): (u32, u32) = (w.parse().ok()?, h.parse().ok()?);
    (w > 0 && h > 0).then_some((w, h))
}

fn fallback() -> AspectRatio {
    let (w, h) = FALLBACK_RATIO;
    AspectRatio::new(w as f64, h as f64, RatioSource::Fallback)
}

/// Resolve custom ratio text, falling back to 16:9.
pub fn resolve_custom(text: &str) -> AspectRatio {
    match parse_custom_ratio(text) {
        Some((w, h)) => AspectRatio::new(w, h, RatioSource::Custom),
        None => {
            warn!(text, "invalid custom aspect ratio, using 16:9");
            fallback()
        }
    }
}

/// Resolve a dropdown label, falling back to 16:9.
pub fn resolve_preset(label: &str) -> AspectRatio {
    match parse_preset_label(label) {
        Some((w, h)) => AspectRatio::new(w as f64, h as f64, RatioSource::Dropdown),
        None => {
            warn!(label, "unparseable aspect ratio preset, using 16:9");
            fallback()
        }
    }
}

/// The active ratio: custom text if enabled, otherwise the preset.
pub fn active_ratio(widgets: &WidgetState) -> AspectRatio {
    if widgets.custom_ratio_enabled {
        resolve_custom(&widgets.custom_ratio_text)
    } else {
        resolve_preset(&widgets.preset_label)
    }
}
