//! Advisory warnings about enabled inputs that the chosen mode ignores.
//!
//! A pure function of the mode and the widget state. Conflicts never change
//! the numbers; they only let a UI tell the user why a toggle had no effect.

use super::result::{Conflict, ConflictKind, Mode, Severity};
use crate::types::{ImageMode, InputKind, WidgetState};

/// List the enabled inputs that `mode` overrides, in a stable order.
pub fn detect_conflicts(mode: Mode, widgets: &WidgetState) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    match mode {
        Mode::ExactDims => {
            let dims: Vec<InputKind> = [
                (widgets.width_enabled, InputKind::Width),
                (widgets.height_enabled, InputKind::Height),
            ]
            .into_iter()
            .filter_map(|(on, kind)| on.then_some(kind))
            .collect();
            if !dims.is_empty() {
                conflicts.push(Conflict::new(
                    ConflictKind::DimensionsOverridden,
                    Severity::Info,
                    "Exact image dimensions override the width/height settings",
                    dims,
                ));
            }
            if widgets.megapixel_enabled {
                conflicts.push(Conflict::new(
                    ConflictKind::MegapixelOverridden,
                    Severity::Info,
                    "Exact image dimensions override the megapixel setting",
                    [InputKind::Megapixel],
                ));
            }
        }
        Mode::MpScalarWithAr => {
            push_ratio_overrides(&mut conflicts, widgets, "Width and height define the aspect ratio");
        }
        Mode::WidthHeightExplicit | Mode::MpWidthExplicit | Mode::MpHeightExplicit => {
            let reason = "Explicit dimensions define the aspect ratio";
            push_ratio_overrides(&mut conflicts, widgets, reason);
            conflicts.push(Conflict::new(
                ConflictKind::DropdownOverridden,
                Severity::Info,
                format!("{reason}; the aspect ratio dropdown is ignored"),
                [InputKind::AspectRatioDropdown],
            ));
        }
        Mode::ArOnly => {
            if widgets.custom_ratio_enabled {
                conflicts.push(Conflict::new(
                    ConflictKind::CustomRatioOverridden,
                    Severity::Warning,
                    "The image aspect ratio overrides the custom ratio",
                    [InputKind::CustomRatio],
                ));
            }
        }
        Mode::WidthWithAr | Mode::HeightWithAr | Mode::MpWithAr | Mode::DefaultsWithAr => {}
    }

    conflicts
}

// Custom ratio first, then image AR-only mode.
fn push_ratio_overrides(conflicts: &mut Vec<Conflict>, widgets: &WidgetState, reason: &str) {
    if widgets.custom_ratio_enabled {
        conflicts.push(Conflict::new(
            ConflictKind::CustomRatioOverridden,
            Severity::Warning,
            format!("{reason}; the custom ratio is ignored"),
            [InputKind::CustomRatio],
        ));
    }
    if widgets.image_mode_is(ImageMode::ArOnly) {
        conflicts.push(Conflict::new(
            ConflictKind::ImageArOverridden,
            Severity::Warning,
            format!("{reason}; the image aspect ratio is ignored"),
            [InputKind::ImageMode],
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn everything_enabled() -> WidgetState {
        WidgetState {
            width_enabled: true,
            height_enabled: true,
            megapixel_enabled: true,
            image_mode_enabled: true,
            image_mode: ImageMode::ArOnly,
            custom_ratio_enabled: true,
            ..WidgetState::default()
        }
    }

    fn kinds(conflicts: &[Conflict]) -> Vec<ConflictKind> {
        conflicts.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn exact_dims_reports_dimension_and_megapixel_toggles_as_info() {
        let conflicts = detect_conflicts(Mode::ExactDims, &everything_enabled());
        assert_eq!(
            kinds(&conflicts),
            vec![ConflictKind::DimensionsOverridden, ConflictKind::MegapixelOverridden]
        );
        assert!(conflicts.iter().all(|c| c.severity == Severity::Info));
        assert!(conflicts[0].affected_inputs.contains(&InputKind::Width));
        assert!(conflicts[0].affected_inputs.contains(&InputKind::Height));
    }

    #[test]
    fn exact_dims_with_only_height_names_height() {
        let widgets = WidgetState {
            height_enabled: true,
            ..WidgetState::default()
        };
        let conflicts = detect_conflicts(Mode::ExactDims, &widgets);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(
            conflicts[0].affected_inputs.iter().copied().collect::<Vec<_>>(),
            vec![InputKind::Height]
        );
    }

    #[test]
    fn exact_dims_without_other_toggles_is_clean() {
        assert!(detect_conflicts(Mode::ExactDims, &WidgetState::default()).is_empty());
    }

    #[test]
    fn mp_scalar_warns_about_custom_ratio_and_image_ar() {
        let conflicts = detect_conflicts(Mode::MpScalarWithAr, &everything_enabled());
        assert_eq!(
            kinds(&conflicts),
            vec![ConflictKind::CustomRatioOverridden, ConflictKind::ImageArOverridden]
        );
        assert!(conflicts.iter().all(|c| c.severity == Severity::Warning));
    }

    #[test]
    fn mp_scalar_never_mentions_dropdown() {
        let conflicts = detect_conflicts(Mode::MpScalarWithAr, &everything_enabled());
        assert!(!kinds(&conflicts).contains(&ConflictKind::DropdownOverridden));
    }

    #[test]
    fn image_exact_mode_is_not_an_image_ar_override() {
        let widgets = WidgetState {
            image_mode_enabled: true,
            image_mode: ImageMode::ExactDims,
            ..WidgetState::default()
        };
        assert!(detect_conflicts(Mode::MpScalarWithAr, &widgets).is_empty());
    }

    #[test]
    fn explicit_pair_always_overrides_dropdown() {
        for mode in [
            Mode::WidthHeightExplicit,
            Mode::MpWidthExplicit,
            Mode::MpHeightExplicit,
        ] {
            let conflicts = detect_conflicts(mode, &WidgetState::default());
            assert_eq!(kinds(&conflicts), vec![ConflictKind::DropdownOverridden]);
            assert_eq!(conflicts[0].severity, Severity::Info);
        }
    }

    #[test]
    fn explicit_pair_full_list_order() {
        let conflicts = detect_conflicts(Mode::MpWidthExplicit, &everything_enabled());
        assert_eq!(
            kinds(&conflicts),
            vec![
                ConflictKind::CustomRatioOverridden,
                ConflictKind::ImageArOverridden,
                ConflictKind::DropdownOverridden,
            ]
        );
    }

    #[test]
    fn ar_only_warns_about_custom_ratio() {
        let conflicts = detect_conflicts(Mode::ArOnly, &everything_enabled());
        assert_eq!(kinds(&conflicts), vec![ConflictKind::CustomRatioOverridden]);
        assert_eq!(conflicts[0].severity, Severity::Warning);
    }

    #[test]
    fn single_dimension_and_default_modes_are_clean() {
        for mode in [
            Mode::WidthWithAr,
            Mode::HeightWithAr,
            Mode::MpWithAr,
            Mode::DefaultsWithAr,
        ] {
            assert!(detect_conflicts(mode, &everything_enabled()).is_empty());
        }
    }
}
