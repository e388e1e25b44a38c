//! Turn a resolved base size into the final output size.
//!
//! All functions here are pure. The resolver reports *base* dimensions; hosts
//! then apply a scale factor and snap each side to a multiple that the
//! downstream model accepts.
//!
//! ```text
//! base (W×H) ──scale──▶ round ──divisible_by──▶ final (W×H)
//!                                                 ├─ megapixels
//!                                                 ├─ "W x H"
//!                                                 └─ [batch, 4, H/8, W/8]
//! ```

use crate::config::ResolverConfig;
use crate::resolver::ResolutionResult;
use crate::resolver::formulas::{PIXELS_PER_MEGAPIXEL, round_dimension};
use serde::Serialize;

/// Latent channels for SD-family models.
pub const LATENT_CHANNELS: u32 = 4;

/// Pixels per latent cell along each axis.
pub const LATENT_DOWNSCALE: u32 = 8;

/// Knobs for finalization, normally taken from `config.toml`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalizeOptions {
    pub scale: f64,
    /// `0` keeps exact pixels.
    pub divisible_by: u32,
    pub batch_size: u32,
}

impl Default for FinalizeOptions {
    fn default() -> Self {
        Self::from(&ResolverConfig::default())
    }
}

impl From<&ResolverConfig> for FinalizeOptions {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            scale: config.output.scale,
            divisible_by: config.output.divisible_by,
            batch_size: config.latent.batch_size,
        }
    }
}

/// Final dimensions and the values derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalDimensions {
    pub width: u32,
    pub height: u32,
    pub megapixels: f64,
    /// `"W x H"`.
    pub resolution: String,
    /// `"Mode: <description> | Div: <d>"`.
    pub info: String,
    #[serde(rename = "latentShape")]
    pub latent_shape: [u32; 4],
}

/// Round `value` to the nearest multiple of `divisor` (ties to even).
///
/// Never returns less than one multiple, nor more than the largest multiple
/// that fits in a `u32`. A divisor of `0` returns `value` unchanged (but at
/// least 1).
///
/// ```
/// # use smart_res::finalize::round_to_multiple;
/// assert_eq!(round_to_multiple(1633, 16), 1632);
/// assert_eq!(round_to_multiple(1640, 16), 1632); // 102.5 → 102
/// assert_eq!(round_to_multiple(5, 64), 64);
/// assert_eq!(round_to_multiple(919, 0), 919);
/// ```
pub fn round_to_multiple(value: u32, divisor: u32) -> u32 {
    if divisor == 0 {
        return value.max(1);
    }
    let max_steps = u32::MAX / divisor;
    let steps = (value as f64 / divisor as f64)
        .round_ties_even()
        .clamp(1.0, max_steps as f64) as u32;
    steps * divisor
}

/// Apply the scale factor, then divisibility rounding, to one side.
pub fn final_side(base: u32, options: &FinalizeOptions) -> u32 {
    let scaled = round_dimension(base as f64 * options.scale);
    round_to_multiple(scaled, options.divisible_by)
}

/// Shape of the empty latent tensor for a final size.
pub fn latent_shape(width: u32, height: u32, batch_size: u32) -> [u32; 4] {
    [
        batch_size,
        LATENT_CHANNELS,
        height / LATENT_DOWNSCALE,
        width / LATENT_DOWNSCALE,
    ]
}

pub fn megapixels(width: u32, height: u32) -> f64 {
    width as f64 * height as f64 / PIXELS_PER_MEGAPIXEL
}

/// Finalize a resolution result.
pub fn finalize(result: &ResolutionResult, options: &FinalizeOptions) -> FinalDimensions {
    finalize_base(
        result.base_width,
        result.base_height,
        &result.description,
        options,
    )
}

/// Finalize bare base dimensions, as carried by a resolve response.
pub fn finalize_base(
    base_width: u32,
    base_height: u32,
    description: &str,
    options: &FinalizeOptions,
) -> FinalDimensions {
    let width = final_side(base_width, options);
    let height = final_side(base_height, options);
    FinalDimensions {
        width,
        height,
        megapixels: megapixels(width, height),
        resolution: format!("{width} x {height}"),
        info: format!(
            "Mode: {description} | Div: {}",
            options.divisible_by
        ),
        latent_shape: latent_shape(width, height, options.batch_size),
    }
}
