//! Request/response boundary for hosts.
//!
//! Hosts send loosely-typed JSON (booleans as `0`/`1`, numbers as strings,
//! ratios as bare numbers). This module normalizes that into a typed
//! [`WidgetState`] / [`RuntimeContext`] and rejects structurally invalid
//! requests. The resolver itself never sees untyped data.
//!
//! A malformed scalar takes the field default and is logged. An `image_info`
//! without two positive sides is treated as no image.
//!
//! ## Request
//!
//! ```json
//! {
//!   "widgets": {
//!     "width_enabled": true, "width_value": 1200,
//!     "mp_enabled": true, "mp_value": 1.5,
//!     "image_mode_enabled": false, "image_mode_value": 0,
//!     "custom_ratio_enabled": false, "custom_aspect_ratio": "16:9",
//!     "aspect_ratio_dropdown": "16:9 (Panorama)"
//!   },
//!   "runtime_context": { "image_info": { "width": 1920, "height": 1080 } }
//! }
//! ```
//!
//! Missing widget fields take the [`WidgetState`] defaults. A missing or
//! non-object `widgets` is the only way to get a failure response.

use crate::resolver::{AspectRatio, Conflict, DimensionSource, Mode, ResolutionResult, Resolver};
use crate::types::{ImageInfo, ImageMode, InputKind, RuntimeContext, WidgetState};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Request must contain a `widgets` object")]
    MissingWidgets,
}

/// Raw widget payload. Every field is optional and loosely typed.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WidgetsPayload {
    width_enabled: Option<Value>,
    width_value: Option<Value>,
    height_enabled: Option<Value>,
    height_value: Option<Value>,
    mp_enabled: Option<Value>,
    mp_value: Option<Value>,
    image_mode_enabled: Option<Value>,
    image_mode_value: Option<Value>,
    custom_ratio_enabled: Option<Value>,
    custom_aspect_ratio: Option<Value>,
    aspect_ratio_dropdown: Option<Value>,
}

// Malformed scalars never fail a request: they take the field default.
fn malformed<T: std::fmt::Debug>(field: &'static str, value: &Value, default: T) -> T {
    warn!(field, value = %value, default = ?default, "malformed request field, using default");
    default
}

fn to_bool(field: &'static str, value: Option<Value>, default: bool) -> bool {
    match value {
        None | Some(Value::Null) => default,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => true,
            "false" | "0" | "off" | "no" | "" => false,
            other => malformed(field, &Value::from(other), default),
        },
        Some(other) => malformed(field, &other, default),
    }
}

fn parse_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_f64(field: &'static str, value: Option<Value>, default: f64) -> f64 {
    match value {
        None | Some(Value::Null) => default,
        Some(v) => parse_f64(&v).unwrap_or_else(|| malformed(field, &v, default)),
    }
}

// Integers arrive as floats from some hosts; round them like any other dimension.
fn to_i64(field: &'static str, value: Option<Value>, default: i64) -> i64 {
    let v = match value {
        None | Some(Value::Null) => return default,
        Some(v) => v,
    };
    if let Some(i) = v.as_i64() {
        return i;
    }
    match parse_f64(&v) {
        Some(f) if f.is_finite() => {
            f.round_ties_even().clamp(i64::MIN as f64, i64::MAX as f64) as i64
        }
        _ => malformed(field, &v, default),
    }
}

// Any scalar is accepted and stringified; the ratio parser decides validity.
fn to_text(value: Option<Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

fn to_image_mode(value: Option<Value>) -> ImageMode {
    const FIELD: &str = "image_mode_value";
    let default = ImageMode::default();
    match value {
        None | Some(Value::Null) => default,
        Some(Value::Bool(exact)) => {
            if exact {
                ImageMode::ExactDims
            } else {
                ImageMode::ArOnly
            }
        }
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "0" | "ar_only" | "ar only" => ImageMode::ArOnly,
            "1" | "exact_dims" | "exact dims" => ImageMode::ExactDims,
            other => malformed(FIELD, &Value::from(other), default),
        },
        Some(v) => parse_f64(&v)
            .filter(|f| f.fract() == 0.0)
            .and_then(|f| ImageMode::from_wire_value(f as i64))
            .unwrap_or_else(|| malformed(FIELD, &v, default)),
    }
}

impl From<WidgetsPayload> for WidgetState {
    fn from(p: WidgetsPayload) -> Self {
        let d = WidgetState::default();
        Self {
            width_enabled: to_bool("width_enabled", p.width_enabled, d.width_enabled),
            width_value: to_i64("width_value", p.width_value, d.width_value),
            height_enabled: to_bool("height_enabled", p.height_enabled, d.height_enabled),
            height_value: to_i64("height_value", p.height_value, d.height_value),
            megapixel_enabled: to_bool("mp_enabled", p.mp_enabled, d.megapixel_enabled),
            megapixel_value: to_f64("mp_value", p.mp_value, d.megapixel_value),
            image_mode_enabled: to_bool(
                "image_mode_enabled",
                p.image_mode_enabled,
                d.image_mode_enabled,
            ),
            image_mode: to_image_mode(p.image_mode_value),
            custom_ratio_enabled: to_bool(
                "custom_ratio_enabled",
                p.custom_ratio_enabled,
                d.custom_ratio_enabled,
            ),
            custom_ratio_text: to_text(p.custom_aspect_ratio, &d.custom_ratio_text),
            preset_label: to_text(p.aspect_ratio_dropdown, &d.preset_label),
        }
    }
}

/// An `image_info` that cannot be read as two positive sides counts as no image.
fn to_image_info(value: Value) -> Option<ImageInfo> {
    let side = |key: &str| {
        value
            .get(key)
            .and_then(parse_f64)
            .map(f64::round_ties_even)
            .filter(|f| (1.0..=u32::MAX as f64).contains(f))
            .map(|f| f as u32)
    };
    match (side("width"), side("height")) {
        (Some(w), Some(h)) => Some(ImageInfo::new(w, h)),
        _ => {
            warn!(image_info = %value, "ignoring image info without usable dimensions");
            None
        }
    }
}

fn to_runtime_context(value: Option<Value>) -> RuntimeContext {
    let image_info = match value {
        None | Some(Value::Null) => None,
        Some(Value::Object(mut ctx)) => match ctx.remove("image_info") {
            None | Some(Value::Null) => None,
            Some(info) => to_image_info(info),
        },
        Some(other) => {
            warn!(runtime_context = %other, "ignoring non-object runtime context");
            None
        }
    };
    RuntimeContext { image_info }
}

/// A normalized, typed request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveRequest {
    pub widgets: WidgetState,
    pub runtime_context: RuntimeContext,
}

impl ResolveRequest {
    /// Normalize a parsed JSON document.
    pub fn from_value(mut value: Value) -> Result<Self, RequestError> {
        let widgets = match value.get_mut("widgets").map(Value::take) {
            Some(w @ Value::Object(_)) => serde_json::from_value::<WidgetsPayload>(w)?,
            _ => return Err(RequestError::MissingWidgets),
        };
        let runtime_context =
            to_runtime_context(value.get_mut("runtime_context").map(Value::take));
        Ok(Self {
            widgets: widgets.into(),
            runtime_context,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        Self::from_value(serde_json::from_str(json)?)
    }
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveSuccess {
    pub mode: Mode,
    pub priority: u8,
    #[serde(rename = "baseW")]
    pub base_w: u32,
    #[serde(rename = "baseH")]
    pub base_h: u32,
    pub source: DimensionSource,
    pub ar: AspectRatio,
    pub conflicts: Vec<Conflict>,
    pub description: String,
    #[serde(rename = "activeSources")]
    pub active_sources: Vec<InputKind>,
    pub success: bool,
}

impl From<ResolutionResult> for ResolveSuccess {
    fn from(r: ResolutionResult) -> Self {
        Self {
            mode: r.mode,
            priority: r.priority_level,
            base_w: r.base_width,
            base_h: r.base_height,
            source: r.dimension_source,
            ar: r.aspect_ratio,
            conflicts: r.conflicts,
            description: r.description,
            active_sources: r.active_inputs.into_iter().collect(),
            success: true,
        }
    }
}

/// Failure response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveFailure {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    Success(Box<ResolveSuccess>),
    Failure(ResolveFailure),
}

impl ResolveResponse {
    pub fn failure(error: impl ToString) -> Self {
        Self::Failure(ResolveFailure {
            success: false,
            error: error.to_string(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Resolve a typed request.
pub fn handle_request(resolver: &Resolver, request: &ResolveRequest) -> ResolveResponse {
    let result = resolver.resolve(&request.widgets, &request.runtime_context);
    ResolveResponse::Success(Box::new(result.into()))
}

/// Resolve a raw JSON request. Structural problems become a failure response.
pub fn handle_json(resolver: &Resolver, json: &str) -> ResolveResponse {
    match ResolveRequest::from_json(json) {
        Ok(request) => handle_request(resolver, &request),
        Err(e) => {
            warn!(error = %e, "rejected resolve request");
            ResolveResponse::failure(e)
        }
    }
}
