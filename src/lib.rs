//! # Smart Res
//!
//! Resolves image-generation dimensions from a set of independently toggled
//! inputs: width, height, megapixels, an attached image, a custom ratio and a
//! preset dropdown. When several inputs are on, a fixed priority order picks
//! the ones that drive the result, and every enabled input that was ignored
//! is reported as a conflict.
//!
//! ```
//! use smart_res::resolver::{Mode, resolve};
//! use smart_res::types::{RuntimeContext, WidgetState};
//!
//! let widgets = WidgetState {
//!     width_enabled: true,
//!     width_value: 1920,
//!     custom_ratio_enabled: true,
//!     custom_ratio_text: "2.39:1".into(),
//!     ..WidgetState::default()
//! };
//! let result = resolve(&widgets, &RuntimeContext::default());
//! assert_eq!(result.mode, Mode::WidthWithAr);
//! assert_eq!(result.dimensions(), (1920, 803));
//! ```
//!
//! # Architecture
//!
//! ```text
//! JSON request ─▶ protocol ─▶ WidgetState + RuntimeContext
//!                                   │
//!                                   ▼
//!                               resolver ─▶ ResolutionResult ─▶ finalize ─▶ final W×H, latent
//!                                   ▲
//!                 imaging ──────────┘ (image dimensions, allow-listed paths)
//! ```
//!
//! The resolver is a pure function of its inputs. It never fails: malformed
//! values fall back to documented defaults and the fallback is logged
//! through `tracing`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Typed input state: widgets, image mode, runtime context |
//! | [`resolver`] | Priority dispatch, dimension formulas, aspect ratios, conflicts |
//! | [`protocol`] | Loose JSON request → typed request, response shapes |
//! | [`finalize`] | Scale, divisibility rounding, megapixels, latent shape |
//! | [`imaging`] | Image dimension lookup behind an allow-list |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`output`] | CLI text formatting |
//!
//! # Design Decisions
//!
//! ## Round Half to Even
//!
//! Every float-to-pixel conversion uses `f64::round_ties_even`, so results are
//! identical on every host and `x.5` never biases upward.
//!
//! ## Ratios From Text Are Not Reduced
//!
//! `21:9` entered as text stays `21:9`; only ratios computed from concrete
//! dimensions are reduced by their GCD (`1920×1080` → `16:9`).

pub mod config;
pub mod finalize;
pub mod imaging;
pub mod output;
pub mod protocol;
pub mod resolver;
pub mod types;

pub use resolver::{ResolutionResult, Resolver, resolve};
pub use types::{ImageInfo, ImageMode, RuntimeContext, WidgetState};
