//! Caller-facing input state shared by the resolver, the request boundary and the CLI.
//!
//! These are the *typed* forms of the host's widget payload. Loose JSON shapes
//! are normalized into them by [`protocol`](crate::protocol); nothing inside the
//! resolver deals with untyped data.
//!
//! ## Defaults
//!
//! | Field | Default |
//! |---|---|
//! | `width_value` | 1920 |
//! | `height_value` | 1080 |
//! | `megapixel_value` | 1.0 |
//! | `image_mode` | [`ImageMode::ArOnly`] |
//! | `custom_ratio_text` | `"16:9"` |
//! | `preset_label` | [`DEFAULT_PRESET`](crate::resolver::DEFAULT_PRESET) |
//!
//! Every `*_enabled` toggle defaults to `false`.

use serde::{Deserialize, Serialize};

/// How an attached image contributes to the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMode {
    /// Use only the image's aspect ratio (wire value `0`).
    #[default]
    ArOnly,
    /// Use the image's exact pixel dimensions (wire value `1`).
    ExactDims,
}

impl ImageMode {
    /// Parse the numeric wire value used by hosts (`0` = AR only, `1` = exact dims).
    pub fn from_wire_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::ArOnly),
            1 => Some(Self::ExactDims),
            _ => None,
        }
    }
}

/// The caller's declared input configuration.
///
/// Any subset of the toggles may be enabled at once; the resolver picks a
/// single computation path from them. Values of disabled inputs are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetState {
    pub width_enabled: bool,
    pub width_value: i64,
    pub height_enabled: bool,
    pub height_value: i64,
    pub megapixel_enabled: bool,
    /// Millions of pixels: `1.5` means 1,500,000 px.
    pub megapixel_value: f64,
    pub image_mode_enabled: bool,
    pub image_mode: ImageMode,
    pub custom_ratio_enabled: bool,
    /// Free text such as `"2.39:1"`. Parsed only when `custom_ratio_enabled`.
    pub custom_ratio_text: String,
    /// Dropdown label such as `"16:9 (Panorama)"`.
    pub preset_label: String,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            width_enabled: false,
            width_value: 1920,
            height_enabled: false,
            height_value: 1080,
            megapixel_enabled: false,
            megapixel_value: 1.0,
            image_mode_enabled: false,
            image_mode: ImageMode::default(),
            custom_ratio_enabled: false,
            custom_ratio_text: "16:9".to_string(),
            preset_label: crate::resolver::DEFAULT_PRESET.to_string(),
        }
    }
}

impl WidgetState {
    /// True when image mode is toggled on *and* set to `mode`.
    pub fn image_mode_is(&self, mode: ImageMode) -> bool {
        self.image_mode_enabled && self.image_mode == mode
    }
}

/// Pixel dimensions of an attached image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// An image with a zero side carries no usable dimensions or ratio.
    pub fn is_usable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Optional external facts available at resolution time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeContext {
    pub image_info: Option<ImageInfo>,
}

impl RuntimeContext {
    pub fn with_image(width: u32, height: u32) -> Self {
        Self {
            image_info: Some(ImageInfo::new(width, height)),
        }
    }

    /// The attached image, if there is one with non-zero dimensions.
    pub fn usable_image(&self) -> Option<ImageInfo> {
        self.image_info.filter(ImageInfo::is_usable)
    }
}

/// Names of the individual inputs, as reported in conflicts and active sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Width,
    Height,
    Megapixel,
    ImageMode,
    CustomRatio,
    AspectRatioDropdown,
}

impl InputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::Megapixel => "megapixel",
            Self::ImageMode => "image_mode",
            Self::CustomRatio => "custom_ratio",
            Self::AspectRatioDropdown => "aspect_ratio_dropdown",
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
