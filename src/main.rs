//! deckview - Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// deckview - virtualized wheel/deck scrolling demo
#[derive(Parser, Debug)]
#[command(name = "deckview")]
#[command(version)]
#[command(about = "Terminal demo of a virtualized wheel/deck scrolling viewport")]
pub struct Args {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Projection to start in
    #[arg(long, value_parser = ["flat", "whole", "top", "bottom"])]
    pub mode: Option<String>,

    /// Extent of each item along the scroll axis, in rows
    #[arg(long)]
    pub item_extent: Option<f64>,

    /// Exponent applied to scale/stack interpolation
    #[arg(long)]
    pub layout_power: Option<f64>,

    /// Number of items to show
    #[arg(long, conflicts_with = "unbounded")]
    pub count: Option<usize>,

    /// Show an unbounded list of items
    #[arg(long)]
    pub unbounded: bool,

    /// Paint items outside the wheel area
    #[arg(long)]
    pub no_clip: bool,

    /// Materialize items beyond the visible window (implies --no-clip)
    #[arg(long)]
    pub allow_outside: bool,
}

impl Args {
    /// CLI overrides for the configuration precedence chain.
    pub fn overrides(&self) -> deckview::config::CliOverrides {
        deckview::config::CliOverrides {
            view_mode: self.mode.clone(),
            item_extent: self.item_extent,
            layout_power: self.layout_power,
            item_count: self.count,
            unbounded: self.unbounded,
            no_clip: self.no_clip,
            allow_outside: self.allow_outside,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = deckview::config::load_config_with_precedence(args.config.clone())?;
        let merged = deckview::config::merge_config(config_file);
        let with_env = deckview::config::apply_env_overrides(merged);
        deckview::config::apply_cli_overrides(with_env, args.overrides())
    };

    deckview::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    deckview::view::run(&config)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["deckview", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["deckview", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["deckview"]);
        assert_eq!(args.config, None);
        assert_eq!(args.mode, None);
        assert_eq!(args.item_extent, None);
        assert_eq!(args.layout_power, None);
        assert_eq!(args.count, None);
        assert!(!args.unbounded);
        assert!(!args.no_clip);
        assert!(!args.allow_outside);
    }

    #[test]
    fn test_mode_accepts_every_name() {
        for mode in ["flat", "whole", "top", "bottom"] {
            let args = Args::parse_from(["deckview", "--mode", mode]);
            assert_eq!(args.mode.as_deref(), Some(mode));
        }
    }

    #[test]
    fn test_mode_invalid_rejects() {
        let result = Args::try_parse_from(["deckview", "--mode", "sideways"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::InvalidValue
        );
    }

    #[test]
    fn test_numeric_flags() {
        let args = Args::parse_from([
            "deckview",
            "--item-extent",
            "4.5",
            "--layout-power",
            "2",
            "--count",
            "50",
        ]);
        assert_eq!(args.item_extent, Some(4.5));
        assert_eq!(args.layout_power, Some(2.0));
        assert_eq!(args.count, Some(50));
    }

    #[test]
    fn test_count_rejects_negative() {
        let result = Args::try_parse_from(["deckview", "--count", "-3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_count_conflicts_with_unbounded() {
        let result = Args::try_parse_from(["deckview", "--count", "5", "--unbounded"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn test_unbounded_clears_count() {
        let args = Args::parse_from(["deckview", "--unbounded"]);
        let config =
            deckview::config::apply_cli_overrides(deckview::config::merge_config(None), args.overrides());
        assert_eq!(config.item_count, None);
    }

    #[test]
    fn test_config_path() {
        let args = Args::parse_from(["deckview", "--config", "/tmp/deckview.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/deckview.toml")));
    }

    #[test]
    fn test_overrides_flow_through_precedence_chain() {
        let args = Args::parse_from(["deckview", "--mode", "bottom", "--allow-outside"]);
        let merged = deckview::config::merge_config(None);
        let config = deckview::config::apply_cli_overrides(merged, args.overrides());

        assert_eq!(config.view_mode, "bottom");
        assert!(config.allow_outside_rendering);
        assert!(!config.clip_to_bounds);
        let wheel = config.wheel_config().unwrap();
        assert_eq!(wheel.view_mode(), deckview::viewport::ViewMode::Bottom);
    }

    #[test]
    fn test_whole_is_flat() {
        let args = Args::parse_from(["deckview", "--mode", "whole"]);
        let config =
            deckview::config::apply_cli_overrides(deckview::config::merge_config(None), args.overrides());
        assert_eq!(
            config.wheel_config().unwrap().view_mode(),
            deckview::viewport::ViewMode::Flat
        );
    }
}
