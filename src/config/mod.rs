//! Configuration module.
//!
//! [`WheelConfig`] is the validated parameter set a viewport is built from.
//! The [`loader`] submodule resolves the demo application's settings from
//! defaults, a TOML file, environment variables and CLI flags.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, CliOverrides, ConfigFile,
    LoadError, ResolvedConfig,
};

use crate::viewport::{UnknownViewMode, ViewMode};
use thiserror::Error;

/// Default exponent applied to interpolation fractions.
pub const DEFAULT_LAYOUT_POWER: f64 = 4.0;

/// Invalid viewport configuration.
///
/// Raised once when a configuration is built or a setter is called; the
/// per-frame code never re-validates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Item extent is zero, negative or not finite.
    #[error("Item extent must be positive and finite, got {0}")]
    NonPositiveItemExtent(f64),

    /// Layout power is zero, negative or not finite.
    #[error("Layout power must be positive and finite, got {0}")]
    NonPositiveLayoutPower(f64),

    /// Clipping and outside rendering were both requested.
    #[error("clip_to_bounds and allow_outside_rendering are mutually exclusive")]
    ClipConflict,

    /// View mode name not recognised.
    #[error("Unknown view mode {0:?} (expected flat, whole, top or bottom)")]
    UnknownViewMode(String),
}

impl From<UnknownViewMode> for ConfigError {
    fn from(err: UnknownViewMode) -> Self {
        ConfigError::UnknownViewMode(err.0)
    }
}

/// Check an item extent.
pub fn validate_item_extent(item_extent: f64) -> Result<f64, ConfigError> {
    if item_extent.is_finite() && item_extent > 0.0 {
        Ok(item_extent)
    } else {
        Err(ConfigError::NonPositiveItemExtent(item_extent))
    }
}

/// Check a layout power.
pub fn validate_layout_power(layout_power: f64) -> Result<f64, ConfigError> {
    if layout_power.is_finite() && layout_power > 0.0 {
        Ok(layout_power)
    } else {
        Err(ConfigError::NonPositiveLayoutPower(layout_power))
    }
}

/// Check the clipping flags.
pub fn validate_clip(clip_to_bounds: bool, allow_outside_rendering: bool) -> Result<(), ConfigError> {
    if clip_to_bounds && allow_outside_rendering {
        Err(ConfigError::ClipConflict)
    } else {
        Ok(())
    }
}

/// Validated viewport parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelConfig {
    item_extent: f64,
    layout_power: f64,
    view_mode: ViewMode,
    clip_to_bounds: bool,
    allow_outside_rendering: bool,
}

impl WheelConfig {
    /// Start building a configuration for items of `item_extent`.
    pub fn builder(item_extent: f64) -> WheelConfigBuilder {
        WheelConfigBuilder::new(item_extent)
    }

    /// Configuration with every option at its default.
    pub fn new(item_extent: f64) -> Result<Self, ConfigError> {
        Self::builder(item_extent).build()
    }

    /// Builder pre-populated with this configuration.
    pub fn to_builder(&self) -> WheelConfigBuilder {
        WheelConfigBuilder {
            item_extent: self.item_extent,
            layout_power: self.layout_power,
            view_mode: self.view_mode,
            clip_to_bounds: self.clip_to_bounds,
            allow_outside_rendering: self.allow_outside_rendering,
        }
    }

    /// Same configuration with another view mode.
    pub fn with_view_mode(self, view_mode: ViewMode) -> Self {
        Self { view_mode, ..self }
    }

    /// Extent of every item along the scroll axis.
    pub fn item_extent(&self) -> f64 {
        self.item_extent
    }

    /// Exponent applied to interpolation fractions.
    pub fn layout_power(&self) -> f64 {
        self.layout_power
    }

    /// Projection in use.
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Whether painting is clipped to the viewport.
    pub fn clip_to_bounds(&self) -> bool {
        self.clip_to_bounds
    }

    /// Whether the swept window extends past the viewport.
    pub fn allow_outside_rendering(&self) -> bool {
        self.allow_outside_rendering
    }
}

/// Builder for [`WheelConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelConfigBuilder {
    item_extent: f64,
    layout_power: f64,
    view_mode: ViewMode,
    clip_to_bounds: bool,
    allow_outside_rendering: bool,
}

impl WheelConfigBuilder {
    /// Defaults: layout power 4, Flat, clipped, no outside rendering.
    pub fn new(item_extent: f64) -> Self {
        Self {
            item_extent,
            layout_power: DEFAULT_LAYOUT_POWER,
            view_mode: ViewMode::default(),
            clip_to_bounds: true,
            allow_outside_rendering: false,
        }
    }

    /// Set the item extent.
    pub fn item_extent(mut self, item_extent: f64) -> Self {
        self.item_extent = item_extent;
        self
    }

    /// Set the layout power.
    pub fn layout_power(mut self, layout_power: f64) -> Self {
        self.layout_power = layout_power;
        self
    }

    /// Set the view mode.
    pub fn view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    /// Enable or disable clipping.
    pub fn clip_to_bounds(mut self, clip_to_bounds: bool) -> Self {
        self.clip_to_bounds = clip_to_bounds;
        self
    }

    /// Enable or disable outside rendering.
    pub fn allow_outside_rendering(mut self, allow_outside_rendering: bool) -> Self {
        self.allow_outside_rendering = allow_outside_rendering;
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Returns the first violated precondition.
    pub fn build(self) -> Result<WheelConfig, ConfigError> {
        let item_extent = validate_item_extent(self.item_extent)?;
        let layout_power = validate_layout_power(self.layout_power)?;
        validate_clip(self.clip_to_bounds, self.allow_outside_rendering)?;
        Ok(WheelConfig {
            item_extent,
            layout_power,
            view_mode: self.view_mode,
            clip_to_bounds: self.clip_to_bounds,
            allow_outside_rendering: self.allow_outside_rendering,
        })
    }
}
