//! Card styling for the terminal demo.

use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Whether color output is enabled.
///
/// Disabled when the `NO_COLOR` environment variable is set to any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Read `NO_COLOR` from the environment.
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Explicit setting, for tests.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== CardStyles =====

/// Styles for painted cards and the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardStyles {
    front: Style,
    receding: Style,
    selected: Style,
    status: Style,
}

impl CardStyles {
    /// Scales at or above this paint with the front style.
    pub const FRONT_SCALE: f64 = 0.999;

    /// Styles for the given color configuration.
    ///
    /// Without colors, cards fall back to modifiers only.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                front: Style::default().fg(Color::White),
                receding: Style::default().fg(Color::DarkGray),
                selected: Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                status: Style::default().fg(Color::Black).bg(Color::Cyan),
            }
        } else {
            Self {
                front: Style::default(),
                receding: Style::default().add_modifier(Modifier::DIM),
                selected: Style::default().add_modifier(Modifier::REVERSED),
                status: Style::default().add_modifier(Modifier::REVERSED),
            }
        }
    }

    /// Style for a card painted at `scale`.
    pub fn card(&self, scale: f64, selected: bool) -> Style {
        if selected {
            self.selected
        } else if scale >= Self::FRONT_SCALE {
            self.front
        } else {
            self.receding
        }
    }

    /// Style for the status line.
    pub fn status(&self) -> Style {
        self.status
    }
}

impl Default for CardStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_wins_over_scale() {
        let styles = CardStyles::with_color_config(ColorConfig::new(true));
        assert_eq!(styles.card(0.5, true), styles.card(1.0, true));
        assert_ne!(styles.card(1.0, true), styles.card(1.0, false));
    }

    #[test]
    fn receding_cards_use_distinct_style() {
        let styles = CardStyles::with_color_config(ColorConfig::new(true));
        assert_ne!(styles.card(0.9, false), styles.card(1.0, false));
    }

    #[test]
    fn disabled_colors_use_no_foreground() {
        let styles = CardStyles::with_color_config(ColorConfig::new(false));
        assert_eq!(styles.card(1.0, false).fg, None);
        assert_eq!(styles.card(0.5, false).fg, None);
        assert_eq!(styles.status().fg, None);
    }
}
