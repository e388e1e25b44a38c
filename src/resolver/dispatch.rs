//! Priority dispatcher: choose exactly one of six levels, then run its formula.
//!
//! Selection is a decision tree over the widget state, evaluated top to
//! bottom; the first match wins. The only fall-through is a missing image for
//! the two image levels, which goes straight to [`Priority::Defaults`].

use super::aspect::{active_ratio, ratio_from_dimensions};
use super::formulas::{
    DEFAULT_MEGAPIXELS, FALLBACK_HEIGHT, FALLBACK_WIDTH, height_from_width, positive_dimension,
    positive_megapixels, scale_to_pixels, side_from_pixels, target_pixels, width_from_height,
};
use super::result::{AspectRatio, DimensionSource, Mode};
use crate::types::{ImageInfo, ImageMode, InputKind, RuntimeContext, WidgetState};
use std::collections::BTreeSet;
use tracing::warn;

/// Which explicit pair drives priority 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplicitPair {
    WidthHeight,
    MegapixelWidth,
    MegapixelHeight,
}

/// A single enabled dimension input, checked width → height → megapixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleInput {
    Width,
    Height,
    Megapixel,
}

impl SingleInput {
    fn first_enabled(widgets: &WidgetState) -> Option<Self> {
        if widgets.width_enabled {
            Some(Self::Width)
        } else if widgets.height_enabled {
            Some(Self::Height)
        } else if widgets.megapixel_enabled {
            Some(Self::Megapixel)
        } else {
            None
        }
    }

    fn input(self) -> InputKind {
        match self {
            Self::Width => InputKind::Width,
            Self::Height => InputKind::Height,
            Self::Megapixel => InputKind::Megapixel,
        }
    }
}

/// The six priority levels, carrying whatever selection decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Priority {
    /// 1: image mode = exact dims, image present.
    ExactDims(ImageInfo),
    /// 2: megapixel + width + height.
    MegapixelScaled,
    /// 3: one of the explicit pairs.
    Explicit(ExplicitPair),
    /// 4: image mode = AR only, image present.
    ImageAspect(ImageInfo, Option<SingleInput>),
    /// 5: one dimension input plus the active ratio.
    SingleWithRatio(SingleInput),
    /// 6: nothing relevant enabled.
    Defaults,
}

impl Priority {
    pub fn level(&self) -> u8 {
        match self {
            Self::ExactDims(_) => 1,
            Self::MegapixelScaled => 2,
            Self::Explicit(_) => 3,
            Self::ImageAspect(..) => 4,
            Self::SingleWithRatio(_) => 5,
            Self::Defaults => 6,
        }
    }
}

/// Pick the priority level for this input state.
pub fn select(widgets: &WidgetState, context: &RuntimeContext) -> Priority {
    let image = context.usable_image();

    if widgets.image_mode_is(ImageMode::ExactDims) {
        return match image {
            Some(info) => Priority::ExactDims(info),
            None => {
                warn!("exact image dimensions requested but no image is connected, using defaults");
                Priority::Defaults
            }
        };
    }

    let (w, h, mp) = (
        widgets.width_enabled,
        widgets.height_enabled,
        widgets.megapixel_enabled,
    );
    if mp && w && h {
        return Priority::MegapixelScaled;
    }
    if w && h {
        return Priority::Explicit(ExplicitPair::WidthHeight);
    }
    if mp && w {
        return Priority::Explicit(ExplicitPair::MegapixelWidth);
    }
    if mp && h {
        return Priority::Explicit(ExplicitPair::MegapixelHeight);
    }

    if widgets.image_mode_is(ImageMode::ArOnly) {
        return match image {
            Some(info) => Priority::ImageAspect(info, SingleInput::first_enabled(widgets)),
            None => {
                warn!("image aspect ratio requested but no image is connected, using defaults");
                Priority::Defaults
            }
        };
    }

    match SingleInput::first_enabled(widgets) {
        Some(single) => Priority::SingleWithRatio(single),
        None => Priority::Defaults,
    }
}

/// Output of one level's formula, before conflicts are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Computation {
    pub mode: Mode,
    pub width: u32,
    pub height: u32,
    pub source: DimensionSource,
    pub aspect_ratio: AspectRatio,
    pub description: String,
    pub active_inputs: BTreeSet<InputKind>,
}

// Validated inputs; each substitutes its documented default with a warning.

fn width_input(widgets: &WidgetState) -> u32 {
    positive_dimension(widgets.width_value).unwrap_or_else(|| {
        warn!(width = widgets.width_value, "non-positive width, using {FALLBACK_WIDTH}");
        FALLBACK_WIDTH
    })
}

fn height_input(widgets: &WidgetState) -> u32 {
    positive_dimension(widgets.height_value).unwrap_or_else(|| {
        warn!(height = widgets.height_value, "non-positive height, using {FALLBACK_HEIGHT}");
        FALLBACK_HEIGHT
    })
}

fn megapixel_input(widgets: &WidgetState) -> f64 {
    positive_megapixels(widgets.megapixel_value).unwrap_or_else(|| {
        warn!(
            megapixels = widgets.megapixel_value,
            "invalid megapixel value, using {DEFAULT_MEGAPIXELS}"
        );
        DEFAULT_MEGAPIXELS
    })
}

fn ratio_input(widgets: &WidgetState) -> InputKind {
    if widgets.custom_ratio_enabled {
        InputKind::CustomRatio
    } else {
        InputKind::AspectRatioDropdown
    }
}

/// Run the formula for `priority`.
pub fn compute(priority: Priority, widgets: &WidgetState) -> Computation {
    match priority {
        Priority::ExactDims(image) => exact_dims(image),
        Priority::MegapixelScaled => megapixel_scaled(widgets),
        Priority::Explicit(pair) => explicit_pair(pair, widgets),
        Priority::ImageAspect(image, single) => image_aspect(image, single, widgets),
        Priority::SingleWithRatio(single) => single_with_ratio(single, widgets),
        Priority::Defaults => defaults(widgets),
    }
}

fn exact_dims(image: ImageInfo) -> Computation {
    let ar = ratio_from_dimensions(image.width, image.height);
    Computation {
        mode: Mode::ExactDims,
        width: image.width,
        height: image.height,
        source: DimensionSource::Image,
        description: format!(
            "Exact image dimensions: {}×{} ({ar})",
            image.width, image.height
        ),
        aspect_ratio: ar,
        active_inputs: BTreeSet::from([InputKind::ImageMode]),
    }
}

fn megapixel_scaled(widgets: &WidgetState) -> Computation {
    let (w, h) = (width_input(widgets), height_input(widgets));
    let mp = megapixel_input(widgets);
    let ar = ratio_from_dimensions(w, h);
    let (width, height) = scale_to_pixels(target_pixels(mp), ar.ratio);
    Computation {
        mode: Mode::MpScalarWithAr,
        width,
        height,
        source: DimensionSource::WidgetsMpScalar,
        description: format!("Scaled {w}×{h} ({ar}) to {mp:.2} MP: {width}×{height}"),
        aspect_ratio: ar,
        active_inputs: BTreeSet::from([InputKind::Megapixel, InputKind::Width, InputKind::Height]),
    }
}

fn explicit_pair(pair: ExplicitPair, widgets: &WidgetState) -> Computation {
    let (mode, width, height, source, description, active) = match pair {
        ExplicitPair::WidthHeight => {
            let (w, h) = (width_input(widgets), height_input(widgets));
            (
                Mode::WidthHeightExplicit,
                w,
                h,
                DimensionSource::WidgetsExplicit,
                format!("Explicit dimensions: {w}×{h}"),
                [InputKind::Width, InputKind::Height],
            )
        }
        ExplicitPair::MegapixelWidth => {
            let mp = megapixel_input(widgets);
            let (w, h) = match positive_dimension(widgets.width_value) {
                Some(w) => (w, side_from_pixels(target_pixels(mp), w)),
                None => {
                    warn!(
                        width = widgets.width_value,
                        "non-positive width with megapixels, using {FALLBACK_WIDTH}×{FALLBACK_HEIGHT}"
                    );
                    (FALLBACK_WIDTH, FALLBACK_HEIGHT)
                }
            };
            (
                Mode::MpWidthExplicit,
                w,
                h,
                DimensionSource::WidgetsMpComputed,
                format!("Width {w} at {mp:.2} MP: height {h}"),
                [InputKind::Megapixel, InputKind::Width],
            )
        }
        ExplicitPair::MegapixelHeight => {
            let mp = megapixel_input(widgets);
            let (w, h) = match positive_dimension(widgets.height_value) {
                Some(h) => (side_from_pixels(target_pixels(mp), h), h),
                None => {
                    warn!(
                        height = widgets.height_value,
                        "non-positive height with megapixels, using {FALLBACK_WIDTH}×{FALLBACK_HEIGHT}"
                    );
                    (FALLBACK_WIDTH, FALLBACK_HEIGHT)
                }
            };
            (
                Mode::MpHeightExplicit,
                w,
                h,
                DimensionSource::WidgetsMpComputed,
                format!("Height {h} at {mp:.2} MP: width {w}"),
                [InputKind::Megapixel, InputKind::Height],
            )
        }
    };

    // Always the ratio of what was produced, not of what was requested.
    let ar = ratio_from_dimensions(width, height);
    Computation {
        mode,
        width,
        height,
        source,
        description: format!("{description} ({ar})"),
        aspect_ratio: ar,
        active_inputs: BTreeSet::from(active),
    }
}

fn image_aspect(image: ImageInfo, single: Option<SingleInput>, widgets: &WidgetState) -> Computation {
    let ar = ratio_from_dimensions(image.width, image.height);
    let ratio = ar.ratio;
    let (width, height, detail) = match single {
        Some(SingleInput::Width) => {
            let w = width_input(widgets);
            (w, height_from_width(w, ratio), format!("width {w}"))
        }
        Some(SingleInput::Height) => {
            let h = height_input(widgets);
            (width_from_height(h, ratio), h, format!("height {h}"))
        }
        Some(SingleInput::Megapixel) => {
            let mp = megapixel_input(widgets);
            let (w, h) = scale_to_pixels(target_pixels(mp), ratio);
            (w, h, format!("{mp:.2} MP"))
        }
        None => {
            let (w, h) = scale_to_pixels(target_pixels(DEFAULT_MEGAPIXELS), ratio);
            (w, h, format!("default {DEFAULT_MEGAPIXELS:.2} MP"))
        }
    };

    let mut active = BTreeSet::from([InputKind::ImageMode]);
    active.extend(single.map(SingleInput::input));
    Computation {
        mode: Mode::ArOnly,
        width,
        height,
        source: DimensionSource::ImageAr,
        description: format!("Image aspect ratio {ar} with {detail}: {width}×{height}"),
        aspect_ratio: ar,
        active_inputs: active,
    }
}

fn single_with_ratio(single: SingleInput, widgets: &WidgetState) -> Computation {
    let ar = active_ratio(widgets);
    let source_name = ar.source.as_str();
    let (mode, width, height, description) = match single {
        SingleInput::Width => {
            let w = width_input(widgets);
            let h = height_from_width(w, ar.ratio);
            (
                Mode::WidthWithAr,
                w,
                h,
                format!("Width {w} with {ar} ({source_name}): height {h}"),
            )
        }
        SingleInput::Height => {
            let h = height_input(widgets);
            let w = width_from_height(h, ar.ratio);
            (
                Mode::HeightWithAr,
                w,
                h,
                format!("Height {h} with {ar} ({source_name}): width {w}"),
            )
        }
        SingleInput::Megapixel => {
            let mp = megapixel_input(widgets);
            let (w, h) = scale_to_pixels(target_pixels(mp), ar.ratio);
            (
                Mode::MpWithAr,
                w,
                h,
                format!("{mp:.2} MP with {ar} ({source_name}): {w}×{h}"),
            )
        }
    };

    Computation {
        mode,
        width,
        height,
        source: DimensionSource::WidgetWithAr,
        description,
        aspect_ratio: ar,
        active_inputs: BTreeSet::from([single.input(), ratio_input(widgets)]),
    }
}

fn defaults(widgets: &WidgetState) -> Computation {
    let ar = active_ratio(widgets);
    let (width, height) = scale_to_pixels(target_pixels(DEFAULT_MEGAPIXELS), ar.ratio);
    Computation {
        mode: Mode::DefaultsWithAr,
        width,
        height,
        source: DimensionSource::Defaults,
        description: format!(
            "Default {DEFAULT_MEGAPIXELS:.2} MP with {ar} ({}): {width}×{height}",
            ar.source.as_str()
        ),
        aspect_ratio: ar,
        active_inputs: BTreeSet::from([ratio_input(widgets)]),
    }
}
