//! Configuration file loading with precedence handling.

use super::{validate_clip, ConfigError, WheelConfig};
use crate::viewport::ViewMode;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "DECKVIEW_CONFIG";

/// Environment variable overriding the view mode.
pub const VIEW_MODE_ENV_VAR: &str = "DECKVIEW_VIEW_MODE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/deckview/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Item extent in terminal rows.
    #[serde(default)]
    pub item_extent: Option<f64>,

    /// Layout power.
    #[serde(default)]
    pub layout_power: Option<f64>,

    /// View mode name ("flat", "whole", "top", "bottom").
    #[serde(default)]
    pub view_mode: Option<String>,

    /// Clip painting to the viewport.
    #[serde(default)]
    pub clip_to_bounds: Option<bool>,

    /// Extend the swept window past the viewport.
    #[serde(default)]
    pub allow_outside_rendering: Option<bool>,

    /// Number of demo items.
    #[serde(default)]
    pub item_count: Option<usize>,

    /// Show an unbounded list; overrides `item_count`.
    #[serde(default)]
    pub unbounded: Option<bool>,

    /// Items moved per arrow key press.
    #[serde(default)]
    pub scroll_step: Option<f64>,

    /// Duration of animated reveals in milliseconds (0 jumps).
    #[serde(default)]
    pub reveal_duration_ms: Option<u64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
/// Viewport parameters are validated separately by
/// [`ResolvedConfig::wheel_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Item extent.
    pub item_extent: f64,
    /// Layout power.
    pub layout_power: f64,
    /// View mode name, parsed on validation.
    pub view_mode: String,
    /// Clipping.
    pub clip_to_bounds: bool,
    /// Outside rendering.
    pub allow_outside_rendering: bool,
    /// Demo item count, `None` for unbounded.
    pub item_count: Option<usize>,
    /// Items moved per arrow key press.
    pub scroll_step: f64,
    /// Animated reveal duration.
    pub reveal_duration: Duration,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            item_extent: 3.0,
            layout_power: super::DEFAULT_LAYOUT_POWER,
            view_mode: ViewMode::default().to_string(),
            clip_to_bounds: true,
            allow_outside_rendering: false,
            item_count: Some(200),
            scroll_step: 1.0,
            reveal_duration: Duration::from_millis(250),
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Validate the viewport parameters.
    ///
    /// # Errors
    ///
    /// Returns the first violated precondition.
    pub fn wheel_config(&self) -> Result<WheelConfig, ConfigError> {
        let view_mode: ViewMode = self.view_mode.parse()?;
        validate_clip(self.clip_to_bounds, self.allow_outside_rendering)?;
        WheelConfig::builder(self.item_extent)
            .layout_power(self.layout_power)
            .view_mode(view_mode)
            .clip_to_bounds(self.clip_to_bounds)
            .allow_outside_rendering(self.allow_outside_rendering)
            .build()
    }
}

/// CLI flags that override configuration.
///
/// `None` / `false` leave the underlying value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    /// `--mode`.
    pub view_mode: Option<String>,
    /// `--item-extent`.
    pub item_extent: Option<f64>,
    /// `--layout-power`.
    pub layout_power: Option<f64>,
    /// `--count`.
    pub item_count: Option<usize>,
    /// `--unbounded`.
    pub unbounded: bool,
    /// `--no-clip`.
    pub no_clip: bool,
    /// `--allow-outside`.
    pub allow_outside: bool,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/deckview/deckview.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("deckview").join("deckview.log")
    } else {
        PathBuf::from("deckview.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, LoadError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| LoadError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| LoadError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/deckview/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("deckview").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `DECKVIEW_CONFIG` environment variable
/// 3. Default path `~/.config/deckview/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, LoadError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `DECKVIEW_VIEW_MODE`: Override view mode
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(view_mode) = std::env::var(VIEW_MODE_ENV_VAR) {
        config.view_mode = view_mode;
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        item_extent: config.item_extent.unwrap_or(defaults.item_extent),
        layout_power: config.layout_power.unwrap_or(defaults.layout_power),
        view_mode: config.view_mode.unwrap_or(defaults.view_mode),
        clip_to_bounds: config.clip_to_bounds.unwrap_or(defaults.clip_to_bounds),
        allow_outside_rendering: config
            .allow_outside_rendering
            .unwrap_or(defaults.allow_outside_rendering),
        item_count: if config.unbounded == Some(true) {
            None
        } else {
            config.item_count.or(defaults.item_count)
        },
        scroll_step: config.scroll_step.unwrap_or(defaults.scroll_step),
        reveal_duration: config
            .reveal_duration_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.reveal_duration),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// `--allow-outside` also turns clipping off, since the two are exclusive.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(view_mode) = cli.view_mode {
        config.view_mode = view_mode;
    }

    if let Some(item_extent) = cli.item_extent {
        config.item_extent = item_extent;
    }

    if let Some(layout_power) = cli.layout_power {
        config.layout_power = layout_power;
    }

    if let Some(item_count) = cli.item_count {
        config.item_count = Some(item_count);
    }

    if cli.unbounded {
        config.item_count = None;
    }

    if cli.no_clip {
        config.clip_to_bounds = false;
    }

    if cli.allow_outside {
        config.allow_outside_rendering = true;
        config.clip_to_bounds = false;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

#[cfg(test)]
mod log_path_tests {
    use super::*;

    #[test]
    fn default_log_path_ends_with_deckview_log() {
        let path = default_log_path();
        assert!(
            path.to_string_lossy().ends_with("deckview.log"),
            "Default log path should end with 'deckview.log', got: {:?}",
            path
        );
    }

    #[test]
    fn resolved_config_default_includes_log_path() {
        let config = ResolvedConfig::default();
        assert!(
            !config.log_file_path.as_os_str().is_empty(),
            "Default config should have non-empty log_file_path"
        );
    }

    #[test]
    fn config_file_log_path_overrides_default() {
        let custom_path = PathBuf::from("/custom/path/to/app.log");
        let config_file = ConfigFile {
            log_file_path: Some(custom_path.clone()),
            ..ConfigFile::default()
        };

        let resolved = merge_config(Some(config_file));
        assert_eq!(
            resolved.log_file_path, custom_path,
            "Config file log_file_path should override default"
        );
    }

    #[test]
    fn missing_config_file_log_path_uses_default() {
        let resolved = merge_config(Some(ConfigFile::default()));
        assert_eq!(
            resolved.log_file_path,
            default_log_path(),
            "Missing log_file_path in config should use default"
        );
    }
}
