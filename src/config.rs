//! Resolver configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The resolver core
//! takes no configuration; these settings only shape the finalization step
//! and the image-dimension endpoint.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! divisible_by = 16         # Round final dimensions to a multiple (0 = exact)
//! scale = 1.0               # Multiplier applied to base dimensions
//!
//! [latent]
//! batch_size = 1            # Leading dimension of the latent shape (1-64)
//!
//! [images]
//! allowed_dirs = ["."]      # Roots the dims endpoint may read from
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [output]
//! divisible_by = 64
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Largest batch accepted for the latent shape.
pub const MAX_BATCH_SIZE: u32 = 64;

/// Resolver configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Final-dimension rounding and scaling.
    pub output: OutputConfig,
    /// Latent tensor settings.
    pub latent: LatentConfig,
    /// Image-dimension endpoint settings.
    pub images: ImagesConfig,
}

impl ResolverConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.output.scale.is_finite() || self.output.scale <= 0.0 {
            return Err(ConfigError::Validation(
                "output.scale must be a positive number".into(),
            ));
        }
        if !(1..=MAX_BATCH_SIZE).contains(&self.latent.batch_size) {
            return Err(ConfigError::Validation(format!(
                "latent.batch_size must be 1-{MAX_BATCH_SIZE}"
            )));
        }
        if self.images.allowed_dirs.is_empty() {
            return Err(ConfigError::Validation(
                "images.allowed_dirs must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Copy with command-line `[output]` overrides applied, validated like
    /// values read from `config.toml`.
    pub fn with_output_overrides(
        &self,
        scale: Option<f64>,
        divisible_by: Option<u32>,
    ) -> Result<Self, ConfigError> {
        let mut config = self.clone();
        if let Some(scale) = scale {
            config.output.scale = scale;
        }
        if let Some(divisible_by) = divisible_by {
            config.output.divisible_by = divisible_by;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Final-dimension settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Round each final side to a multiple of this. `0` keeps exact pixels.
    pub divisible_by: u32,
    /// Multiplier applied to the base dimensions before rounding.
    pub scale: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            divisible_by: 16,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LatentConfig {
    pub batch_size: u32,
}

impl Default for LatentConfig {
    fn default() -> Self {
        Self { batch_size: 1 }
    }
}

/// Image-dimension endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Directories the endpoint may read from. Relative entries resolve
    /// against the config directory.
    pub allowed_dirs: Vec<PathBuf>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            allowed_dirs: vec![PathBuf::from(".")],
        }
    }
}

impl ImagesConfig {
    /// Allowed directories anchored at `root`.
    pub fn allowed_dirs_under(&self, root: &Path) -> Vec<PathBuf> {
        self.allowed_dirs.iter().map(|d| root.join(d)).collect()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ResolverConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResolverConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResolverConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<ResolverConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Smart Resolution Configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Final dimensions
# ---------------------------------------------------------------------------
[output]
# Round each side to a multiple of this value. Common choices are
# 8, 16, 32 and 64. Use 0 to keep exact pixel values.
divisible_by = 16

# Multiplier applied to the resolved base dimensions before rounding.
scale = 1.0

# ---------------------------------------------------------------------------
# Latent tensor
# ---------------------------------------------------------------------------
[latent]
# Leading dimension of the [batch, 4, height/8, width/8] shape (1-64).
batch_size = 1

# ---------------------------------------------------------------------------
# Image dimensions endpoint
# ---------------------------------------------------------------------------
[images]
# Directories images may be read from, relative to the config directory.
# Paths containing ".." are always rejected.
allowed_dirs = ["."]
"##
}
