//! Result types produced by the resolver.
//!
//! All of these are built fresh per call and serialize directly into the
//! response shape hosts expect (`aspectW`, `affectedWidgets`, ...).

use crate::types::InputKind;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Tolerance for every floating-point aspect-ratio comparison.
pub const RATIO_EPSILON: f64 = 1e-3;

/// The concrete computation path that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Priority 1: attached image's exact dimensions.
    ExactDims,
    /// Priority 2: explicit width/height rescaled to a megapixel target.
    MpScalarWithAr,
    /// Priority 3: explicit width and height used verbatim.
    WidthHeightExplicit,
    /// Priority 3: explicit width, height derived from megapixels.
    MpWidthExplicit,
    /// Priority 3: explicit height, width derived from megapixels.
    MpHeightExplicit,
    /// Priority 4: attached image's aspect ratio with one (or no) dimension input.
    ArOnly,
    /// Priority 5: width plus the active aspect ratio.
    WidthWithAr,
    /// Priority 5: height plus the active aspect ratio.
    HeightWithAr,
    /// Priority 5: megapixels plus the active aspect ratio.
    MpWithAr,
    /// Priority 6: default 1.0 MP with the active aspect ratio.
    DefaultsWithAr,
}

impl Mode {
    /// Precedence level, 1 (highest) through 6.
    pub fn priority(self) -> u8 {
        match self {
            Self::ExactDims => 1,
            Self::MpScalarWithAr => 2,
            Self::WidthHeightExplicit | Self::MpWidthExplicit | Self::MpHeightExplicit => 3,
            Self::ArOnly => 4,
            Self::WidthWithAr | Self::HeightWithAr | Self::MpWithAr => 5,
            Self::DefaultsWithAr => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExactDims => "exact_dims",
            Self::MpScalarWithAr => "mp_scalar_with_ar",
            Self::WidthHeightExplicit => "width_height_explicit",
            Self::MpWidthExplicit => "mp_width_explicit",
            Self::MpHeightExplicit => "mp_height_explicit",
            Self::ArOnly => "ar_only",
            Self::WidthWithAr => "width_with_ar",
            Self::HeightWithAr => "height_with_ar",
            Self::MpWithAr => "mp_with_ar",
            Self::DefaultsWithAr => "defaults_with_ar",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the base dimensions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionSource {
    Image,
    WidgetsMpScalar,
    WidgetsExplicit,
    WidgetsMpComputed,
    ImageAr,
    WidgetWithAr,
    Defaults,
}

impl DimensionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::WidgetsMpScalar => "widgets_mp_scalar",
            Self::WidgetsExplicit => "widgets_explicit",
            Self::WidgetsMpComputed => "widgets_mp_computed",
            Self::ImageAr => "image_ar",
            Self::WidgetWithAr => "widget_with_ar",
            Self::Defaults => "defaults",
        }
    }
}

impl fmt::Display for DimensionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an aspect ratio came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioSource {
    /// Parsed from the custom ratio text.
    Custom,
    /// Parsed from the preset dropdown label.
    Dropdown,
    /// Derived from concrete dimensions by GCD reduction.
    Computed,
    /// Input was unparseable; the 16:9 fallback was used.
    Fallback,
}

impl RatioSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Dropdown => "dropdown",
            Self::Computed => "computed",
            Self::Fallback => "fallback",
        }
    }
}

/// An aspect ratio as both a float and a `W:H` pair.
///
/// `ratio == aspect_w / aspect_h` within [`RATIO_EPSILON`]. When computed from
/// dimensions the pair is integral and coprime; custom text may carry decimals
/// (`2.39:1`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectRatio {
    pub ratio: f64,
    #[serde(serialize_with = "serialize_term")]
    pub aspect_w: f64,
    #[serde(serialize_with = "serialize_term")]
    pub aspect_h: f64,
    pub source: RatioSource,
}

impl AspectRatio {
    pub fn new(aspect_w: f64, aspect_h: f64, source: RatioSource) -> Self {
        Self {
            ratio: aspect_w / aspect_h,
            aspect_w,
            aspect_h,
            source,
        }
    }

    /// Same proportions within [`RATIO_EPSILON`], regardless of source.
    pub fn matches(&self, other: &AspectRatio) -> bool {
        (self.ratio - other.ratio).abs() < RATIO_EPSILON
    }

    /// `W:H` label, integral terms printed without decimals (`16:9`, `2.39:1`).
    pub fn label(&self) -> String {
        format!("{}:{}", format_term(self.aspect_w), format_term(self.aspect_h))
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn is_integral(value: f64) -> bool {
    value.fract() == 0.0 && value.abs() < 9.0e15
}

fn format_term(value: f64) -> String {
    if is_integral(value) {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

// Integral terms go out as JSON integers (`16`, not `16.0`).
fn serialize_term<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if is_integral(*value) {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// What kind of input was overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Exact image dimensions replace the width/height toggles.
    DimensionsOverridden,
    /// Exact image dimensions replace the megapixel toggle.
    MegapixelOverridden,
    /// A ratio implied by the chosen mode replaces the custom ratio.
    CustomRatioOverridden,
    /// A ratio implied by explicit dimensions replaces the image's ratio.
    ImageArOverridden,
    /// A ratio implied by explicit dimensions replaces the dropdown preset.
    DropdownOverridden,
}

impl ConflictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DimensionsOverridden => "dimensions_overridden",
            Self::MegapixelOverridden => "megapixel_overridden",
            Self::CustomRatioOverridden => "custom_ratio_overridden",
            Self::ImageArOverridden => "image_ar_overridden",
            Self::DropdownOverridden => "dropdown_overridden",
        }
    }
}

/// Advisory note that an enabled input was not used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub severity: Severity,
    pub message: String,
    #[serde(rename = "affectedWidgets")]
    pub affected_inputs: BTreeSet<InputKind>,
}

impl Conflict {
    pub fn new(
        kind: ConflictKind,
        severity: Severity,
        message: impl Into<String>,
        affected: impl IntoIterator<Item = InputKind>,
    ) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            affected_inputs: affected.into_iter().collect(),
        }
    }
}

/// Everything the resolver decided for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionResult {
    pub mode: Mode,
    /// Same as `mode.priority()`, kept for callers that only read the level.
    pub priority_level: u8,
    /// Always at least 1.
    pub base_width: u32,
    /// Always at least 1.
    pub base_height: u32,
    pub dimension_source: DimensionSource,
    pub aspect_ratio: AspectRatio,
    pub conflicts: Vec<Conflict>,
    /// Human-readable summary for display; not meant to be parsed.
    pub description: String,
    pub active_inputs: BTreeSet<InputKind>,
}

impl ResolutionResult {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.base_width, self.base_height)
    }

    pub fn has_warnings(&self) -> bool {
        self.conflicts
            .iter()
            .any(|c| c.severity == Severity::Warning)
    }
}
