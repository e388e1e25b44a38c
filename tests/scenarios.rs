//! End-to-end resolution scenarios through the public API and the JSON boundary.

use serde_json::{Value, json};
use smart_res::protocol::handle_json;
use smart_res::resolver::{ConflictKind, DimensionSource, Mode, RatioSource, Resolver, resolve};
use smart_res::types::{ImageMode, RuntimeContext, WidgetState};

fn respond(request: Value) -> Value {
    let response = handle_json(&Resolver::new(), &request.to_string());
    serde_json::to_value(response).unwrap()
}

fn widgets(overrides: Value) -> Value {
    let mut base = json!({
        "width_enabled": false, "width_value": 1200,
        "height_enabled": false, "height_value": 800,
        "mp_enabled": false, "mp_value": 1.5,
        "image_mode_enabled": false, "image_mode_value": 0,
        "custom_ratio_enabled": false, "custom_aspect_ratio": "16:9",
        "aspect_ratio_dropdown": "16:9"
    });
    for (key, value) in overrides.as_object().unwrap() {
        base[key] = value.clone();
    }
    base
}

// =============================================================================
// One scenario per priority level
// =============================================================================

#[test]
fn priority_1_exact_dims_overrides_everything() {
    let r = respond(json!({
        "widgets": widgets(json!({
            "width_enabled": true, "height_enabled": true,
            "image_mode_enabled": true, "image_mode_value": 1,
            "custom_ratio_enabled": true, "custom_aspect_ratio": "2.39:1"
        })),
        "runtime_context": { "image_info": { "width": 1920, "height": 1080 } }
    }));
    assert_eq!(r["success"], true);
    assert_eq!(r["mode"], "exact_dims");
    assert_eq!(r["priority"], 1);
    assert_eq!((r["baseW"].clone(), r["baseH"].clone()), (json!(1920), json!(1080)));
    assert_eq!(r["source"], "image");
    assert_eq!(r["conflicts"][0]["type"], "dimensions_overridden");
    assert_eq!(r["conflicts"][0]["severity"], "info");
}

#[test]
fn priority_2_scales_width_height_to_megapixels() {
    let r = respond(json!({
        "widgets": widgets(json!({
            "width_enabled": true, "width_value": 1920,
            "height_enabled": true, "height_value": 1080,
            "mp_enabled": true, "mp_value": 1.5,
            "custom_ratio_enabled": true, "custom_aspect_ratio": "2.39:1"
        }))
    }));
    assert_eq!(r["mode"], "mp_scalar_with_ar");
    assert_eq!(r["priority"], 2);
    assert_eq!(r["baseW"], 1633);
    assert_eq!(r["baseH"], 919);
    assert_eq!(r["source"], "widgets_mp_scalar");
    assert_eq!(r["ar"]["aspectW"], 16);
    assert_eq!(r["ar"]["aspectH"], 9);
    assert_eq!(r["conflicts"][0]["type"], "custom_ratio_overridden");
    assert_eq!(r["conflicts"][0]["severity"], "warning");
}

#[test]
fn priority_3a_width_height_explicit() {
    let r = respond(json!({
        "widgets": widgets(json!({
            "width_enabled": true, "width_value": 1024,
            "height_enabled": true, "height_value": 768,
            "custom_ratio_enabled": true, "custom_aspect_ratio": "2.39:1"
        }))
    }));
    assert_eq!(r["mode"], "width_height_explicit");
    assert_eq!(r["priority"], 3);
    assert_eq!((r["baseW"].clone(), r["baseH"].clone()), (json!(1024), json!(768)));
    assert_eq!(r["source"], "widgets_explicit");
    assert_eq!((r["ar"]["aspectW"].clone(), r["ar"]["aspectH"].clone()), (json!(4), json!(3)));
    assert!(!r["conflicts"].as_array().unwrap().is_empty());
}

#[test]
fn priority_3b_megapixel_and_width() {
    let r = respond(json!({
        "widgets": widgets(json!({
            "width_enabled": true, "width_value": 1200,
            "mp_enabled": true, "mp_value": 1.5
        }))
    }));
    assert_eq!(r["mode"], "mp_width_explicit");
    assert_eq!(r["baseW"], 1200);
    assert_eq!(r["baseH"], 1250);
    assert_eq!(r["source"], "widgets_mp_computed");
    assert_eq!((r["ar"]["aspectW"].clone(), r["ar"]["aspectH"].clone()), (json!(24), json!(25)));
}

#[test]
fn priority_3c_megapixel_and_height() {
    let r = respond(json!({
        "widgets": widgets(json!({
            "height_enabled": true, "height_value": 800,
            "mp_enabled": true, "mp_value": 1.5
        }))
    }));
    assert_eq!(r["mode"], "mp_height_explicit");
    assert_eq!(r["baseW"], 1875);
    assert_eq!(r["baseH"], 800);
    assert_eq!((r["ar"]["aspectW"].clone(), r["ar"]["aspectH"].clone()), (json!(75), json!(32)));
}

#[test]
fn priority_4_image_aspect_with_megapixels() {
    let r = respond(json!({
        "widgets": widgets(json!({
            "mp_enabled": true, "mp_value": 1.5,
            "image_mode_enabled": true, "image_mode_value": 0,
            "custom_ratio_enabled": true, "custom_aspect_ratio": "2.39:1"
        })),
        "runtime_context": { "image_info": { "width": 2560, "height": 1440 } }
    }));
    assert_eq!(r["mode"], "ar_only");
    assert_eq!(r["priority"], 4);
    assert_eq!(r["baseW"], 1633);
    assert_eq!(r["baseH"], 919);
    assert_eq!(r["source"], "image_ar");
    assert_eq!((r["ar"]["aspectW"].clone(), r["ar"]["aspectH"].clone()), (json!(16), json!(9)));
    assert_eq!(r["conflicts"][0]["type"], "custom_ratio_overridden");
}

#[test]
fn priority_5a_width_with_decimal_custom_ratio() {
    let r = respond(json!({
        "widgets": widgets(json!({
            "width_enabled": true, "width_value": 1920,
            "custom_ratio_enabled": true, "custom_aspect_ratio": "2.39:1"
        }))
    }));
    assert_eq!(r["mode"], "width_with_ar");
    assert_eq!(r["priority"], 5);
    assert_eq!(r["baseW"], 1920);
    assert_eq!(r["baseH"], 803);
    assert_eq!(r["source"], "widget_with_ar");
    assert_eq!(r["ar"]["aspectW"], 2.39);
    assert_eq!(r["ar"]["aspectH"], 1);
    assert_eq!(r["ar"]["source"], "custom");
}

#[test]
fn priority_5b_height_with_dropdown_ratio() {
    let r = respond(json!({
        "widgets": widgets(json!({ "height_enabled": true, "height_value": 1080 }))
    }));
    assert_eq!(r["mode"], "height_with_ar");
    assert_eq!(r["baseW"], 1920);
    assert_eq!(r["baseH"], 1080);
    assert_eq!(r["ar"]["source"], "dropdown");
}

#[test]
fn priority_5c_megapixels_with_custom_ratio() {
    let r = respond(json!({
        "widgets": widgets(json!({
            "mp_enabled": true, "mp_value": 2.0,
            "custom_ratio_enabled": true, "custom_aspect_ratio": "21:9"
        }))
    }));
    assert_eq!(r["mode"], "mp_with_ar");
    assert_eq!(r["baseW"], 2160);
    assert_eq!(r["baseH"], 926);
    assert_eq!((r["ar"]["aspectW"].clone(), r["ar"]["aspectH"].clone()), (json!(21), json!(9)));
}

#[test]
fn priority_6_defaults_with_dropdown() {
    let r = respond(json!({
        "widgets": widgets(json!({ "aspect_ratio_dropdown": "21:9" }))
    }));
    assert_eq!(r["mode"], "defaults_with_ar");
    assert_eq!(r["priority"], 6);
    assert_eq!(r["baseW"], 1528);
    assert_eq!(r["baseH"], 655);
    assert_eq!(r["source"], "defaults");
    assert_eq!((r["ar"]["aspectW"].clone(), r["ar"]["aspectH"].clone()), (json!(21), json!(9)));
    assert_eq!(r["conflicts"], json!([]));
}

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn image_mode_without_image_falls_to_defaults() {
    let r = respond(json!({
        "widgets": widgets(json!({
            "mp_enabled": true, "mp_value": 1.5,
            "image_mode_enabled": true, "image_mode_value": 0
        }))
    }));
    assert_eq!(r["mode"], "defaults_with_ar");
    assert_eq!(r["priority"], 6);
}

#[test]
fn invalid_custom_text_falls_back_to_16_9() {
    let r = respond(json!({
        "widgets": widgets(json!({
            "width_enabled": true, "width_value": 1920,
            "custom_ratio_enabled": true, "custom_aspect_ratio": "invalid text",
            "aspect_ratio_dropdown": "21:9"
        }))
    }));
    assert_eq!(r["mode"], "width_with_ar");
    assert_eq!((r["ar"]["aspectW"].clone(), r["ar"]["aspectH"].clone()), (json!(16), json!(9)));
    assert_eq!(r["ar"]["source"], "fallback");
    assert_eq!(r["baseH"], 1080);
}

#[test]
fn zero_sized_image_counts_as_missing() {
    let widgets = WidgetState {
        image_mode_enabled: true,
        image_mode: ImageMode::ExactDims,
        ..WidgetState::default()
    };
    let result = resolve(&widgets, &RuntimeContext::with_image(0, 1080));
    assert_eq!(result.mode, Mode::DefaultsWithAr);
}

#[test]
fn exact_dims_beats_megapixel_scaling() {
    let widgets = WidgetState {
        width_enabled: true,
        height_enabled: true,
        megapixel_enabled: true,
        image_mode_enabled: true,
        image_mode: ImageMode::ExactDims,
        ..WidgetState::default()
    };
    let result = resolve(&widgets, &RuntimeContext::with_image(800, 600));
    assert_eq!(result.mode, Mode::ExactDims);
    assert_eq!(result.dimensions(), (800, 600));
    let kinds: Vec<_> = result.conflicts.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![ConflictKind::DimensionsOverridden, ConflictKind::MegapixelOverridden]
    );
}

#[test]
fn explicit_pair_beats_image_aspect() {
    let widgets = WidgetState {
        width_enabled: true,
        height_enabled: true,
        width_value: 1000,
        height_value: 500,
        image_mode_enabled: true,
        image_mode: ImageMode::ArOnly,
        ..WidgetState::default()
    };
    let result = resolve(&widgets, &RuntimeContext::with_image(1920, 1080));
    assert_eq!(result.mode, Mode::WidthHeightExplicit);
    assert_eq!(result.aspect_ratio.label(), "2:1");
    assert!(
        result
            .conflicts
            .iter()
            .any(|c| c.kind == ConflictKind::ImageArOverridden)
    );
}

#[test]
fn non_positive_width_is_substituted() {
    let widgets = WidgetState {
        width_enabled: true,
        width_value: -50,
        ..WidgetState::default()
    };
    let result = resolve(&widgets, &RuntimeContext::default());
    assert_eq!(result.mode, Mode::WidthWithAr);
    assert_eq!(result.base_width, 1920);
    assert!(result.base_height >= 1);
}

#[test]
fn invalid_megapixels_use_one_megapixel() {
    let widgets = WidgetState {
        megapixel_enabled: true,
        megapixel_value: -3.0,
        preset_label: "1:1 (Perfect Square)".into(),
        ..WidgetState::default()
    };
    let result = resolve(&widgets, &RuntimeContext::default());
    assert_eq!(result.mode, Mode::MpWithAr);
    assert_eq!(result.dimensions(), (1000, 1000));
}

#[test]
fn default_preset_is_three_by_four() {
    let result = resolve(&WidgetState::default(), &RuntimeContext::default());
    assert_eq!(result.dimension_source, DimensionSource::Defaults);
    assert_eq!(result.aspect_ratio.source, RatioSource::Dropdown);
    assert_eq!(result.aspect_ratio.label(), "3:4");
    assert_eq!(result.dimensions(), (866, 1155));
}

#[test]
fn missing_widgets_is_a_failure_response() {
    let r = respond(json!({ "runtime_context": {} }));
    assert_eq!(r["success"], false);
    assert!(r["error"].as_str().unwrap().contains("widgets"));
}
