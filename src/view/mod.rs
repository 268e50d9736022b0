//! Terminal demo (impure shell)
//!
//! Renders a [`WheelViewport`] of numbered cards with ratatui and drives it
//! from crossterm keyboard and mouse events.

mod canvas;
mod styles;

pub use canvas::{truncate_to_width, LabelItem, LabelProvider, TerminalSurface, CELL_UNITS};
pub use styles::{CardStyles, ColorConfig};

use crate::config::{ConfigError, ResolvedConfig};
use crate::viewport::{
    Curve, HitTestResult, ItemIndex, ItemProvider, ScrollController, WheelViewport,
};
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use kurbo::{Point, Size};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout, Rect},
    widgets::Paragraph,
    Terminal,
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Frame interval while idle or animating.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Items moved by PageUp/PageDown.
const PAGE_ITEMS: f64 = 5.0;

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid viewport configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Viewport type driven by the demo.
pub type DemoViewport = WheelViewport<LabelProvider, ScrollController>;

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    viewport: DemoViewport,
    styles: CardStyles,
    scroll_step: f64,
    reveal_duration: Duration,
    selected: Option<ItemIndex>,
    /// Last rendered wheel area (for mouse hit testing)
    last_wheel_area: Option<Rect>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(config: &ResolvedConfig) -> Result<Self, TuiError> {
        // Validate before taking over the terminal.
        config.wheel_config()?;
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Self::with_terminal(terminal, config)
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits (q, Esc or Ctrl+C). Redraws after input
    /// and on every frame while an animation is running.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;
        let mut last_frame = Instant::now();

        loop {
            let mut dirty = false;
            if event::poll(FRAME_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse);
                        dirty = true;
                    }
                    Event::Resize(width, height) => {
                        debug!(width, height, "Terminal resized");
                        dirty = true;
                    }
                    _ => {}
                }
            }

            let now = Instant::now();
            dirty |= self.tick(now.duration_since(last_frame));
            last_frame = now;

            if dirty || self.viewport.needs_paint() {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Build the app around an existing terminal.
    ///
    /// # Errors
    ///
    /// Fails if `config` does not validate into a viewport configuration.
    pub fn with_terminal(terminal: Terminal<B>, config: &ResolvedConfig) -> Result<Self, TuiError> {
        // Configured extents are in rows.
        let wheel = config.wheel_config()?;
        let wheel = wheel
            .to_builder()
            .item_extent(wheel.item_extent() * CELL_UNITS)
            .build()?;
        let mut viewport = WheelViewport::new(
            wheel,
            LabelProvider::new(config.item_count),
            ScrollController::new(0.0),
        );
        viewport.attach();
        info!(
            mode = %wheel.view_mode(),
            item_extent = wheel.item_extent(),
            count = ?config.item_count,
            "Wheel demo initialised"
        );

        Ok(Self {
            terminal,
            viewport,
            styles: CardStyles::default(),
            scroll_step: config.scroll_step,
            reveal_duration: config.reveal_duration,
            selected: Some(ItemIndex::ZERO),
            last_wheel_area: None,
        })
    }

    /// The wheel being shown.
    pub fn viewport(&self) -> &DemoViewport {
        &self.viewport
    }

    /// Selected card, if any.
    pub fn selected(&self) -> Option<ItemIndex> {
        self.selected
    }

    /// The terminal, for buffer inspection.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Char('j') => self.scroll_items(self.scroll_step),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_items(-self.scroll_step),
            KeyCode::PageDown => self.scroll_items(PAGE_ITEMS),
            KeyCode::PageUp => self.scroll_items(-PAGE_ITEMS),
            KeyCode::Home | KeyCode::Char('g') => self.reveal_index(ItemIndex::ZERO),
            KeyCode::End | KeyCode::Char('G') => {
                if let Some(count) = self.viewport.provider().count().filter(|c| *c > 0) {
                    self.reveal_index(ItemIndex::from(count - 1));
                }
            }
            KeyCode::Enter => {
                if let Some(index) = self.selected {
                    self.reveal_index(index);
                }
            }
            KeyCode::Char('m') => {
                let next = self.viewport.config().view_mode().next();
                self.viewport.set_view_mode(next);
                self.selected = Some(ItemIndex::ZERO);
            }
            _ => {}
        }
        false
    }

    /// Handle a single mouse event
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll_items(self.scroll_step),
            MouseEventKind::ScrollUp => self.scroll_items(-self.scroll_step),
            MouseEventKind::Down(MouseButton::Left) => self.click(mouse.column, mouse.row),
            _ => {}
        }
    }

    /// Advance any running animation. Returns true if the offset moved.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let animated = self.viewport.channel_mut().tick(dt);
        if animated && !self.viewport.channel().is_animating() {
            self.selected = self.viewport.anchored_index();
        }
        animated
    }

    /// Render a single frame.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let viewport = &mut self.viewport;
        let styles = self.styles;
        let selected = self.selected;
        let mut wheel_area = None;

        self.terminal.draw(|frame| {
            let [wheel, status] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
            wheel_area = Some(wheel);

            let size = Size::new(
                f64::from(wheel.width) * CELL_UNITS,
                f64::from(wheel.height) * CELL_UNITS,
            );
            if viewport.needs_layout() || viewport.size() != size {
                viewport.layout(size);
            }
            let mut surface =
                TerminalSurface::new(frame.buffer_mut(), wheel, styles).with_selected(selected);
            viewport.paint(&mut surface);

            frame.render_widget(
                Paragraph::new(status_line(viewport, selected)).style(styles.status()),
                status,
            );
        })?;

        self.last_wheel_area = wheel_area;
        Ok(())
    }

    fn scroll_items(&mut self, items: f64) {
        let delta = items * self.viewport.projection().policy().slot_extent();
        self.viewport.channel_mut().scroll_by(delta);
        self.selected = self.viewport.anchored_index();
    }

    fn reveal_index(&mut self, index: ItemIndex) {
        self.viewport
            .scroll_to_index(index, self.reveal_duration, Curve::EaseInOut);
        self.selected = Some(index);
    }

    fn click(&mut self, column: u16, row: u16) {
        let Some(area) = self.last_wheel_area else {
            return;
        };
        if column < area.x || row < area.y {
            return;
        }
        let point = Point::new(
            (f64::from(column - area.x) + 0.5) * CELL_UNITS,
            (f64::from(row - area.y) + 0.5) * CELL_UNITS,
        );
        if let HitTestResult::Hit { index, .. } = self.viewport.hit_test(point) {
            debug!(%index, column, row, "Card clicked");
            self.selected = Some(index);
            self.viewport
                .show_in_viewport(index, None, self.reveal_duration, Curve::EaseInOut);
        }
    }
}

/// One-line summary of the wheel state.
fn status_line(viewport: &DemoViewport, selected: Option<ItemIndex>) -> String {
    let live = viewport
        .live_range()
        .map_or_else(|| "-".to_string(), |r| format!("{}..={}", r.first, r.last));
    let selected = selected.map_or_else(|| "-".to_string(), |i| i.to_string());
    format!(
        " {} | offset {:.1} | live {} | selected {} | m: mode  q: quit",
        viewport.config().view_mode(),
        viewport.scroll_offset() / CELL_UNITS,
        live,
        selected
    )
}

/// Initialize and run the TUI application
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// even when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(config: &ResolvedConfig) -> Result<(), TuiError> {
    let mut app = TuiApp::new(config)?;
    let result = app.run();
    restore_terminal()?;
    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::ViewMode;
    use ratatui::backend::TestBackend;

    fn create_test_app() -> TuiApp<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let mut app = TuiApp::with_terminal(terminal, &ResolvedConfig::default()).unwrap();
        app.draw().unwrap();
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen(app: &TuiApp<TestBackend>) -> Vec<String> {
        let buf = app.terminal().backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn tui_error_from_io_error() {
        let io_err = io::Error::other("test error");
        let tui_err: TuiError = io_err.into();
        assert!(matches!(tui_err, TuiError::Io(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let config = ResolvedConfig {
            item_extent: 0.0,
            ..ResolvedConfig::default()
        };
        let result = TuiApp::with_terminal(terminal, &config);
        assert!(matches!(
            result,
            Err(TuiError::Config(ConfigError::NonPositiveItemExtent(_)))
        ));
    }

    #[test]
    fn first_frame_shows_anchored_card_and_status() {
        let app = create_test_app();
        let lines = screen(&app);
        assert!(lines.iter().any(|l| l.contains("Item 0")), "{lines:#?}");
        assert!(lines[19].contains("flat"), "status line: {:?}", lines[19]);
        assert!(lines[19].contains("selected 0"));
    }

    #[test]
    fn quit_keys() {
        let mut app = create_test_app();
        assert!(app.handle_key(key(KeyCode::Char('q'))));
        assert!(app.handle_key(key(KeyCode::Esc)));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!app.handle_key(key(KeyCode::Char('x'))));
    }

    #[test]
    fn down_scrolls_by_one_slot() {
        let mut app = create_test_app();
        let slot = app.viewport().projection().policy().slot_extent();
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.viewport().scroll_offset(), slot);
        assert_eq!(app.selected(), Some(ItemIndex::new(1)));
    }

    #[test]
    fn up_at_start_is_clamped() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.viewport().scroll_offset(), 0.0);
    }

    #[test]
    fn mode_key_cycles_and_resets_offset() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(app.viewport().config().view_mode(), ViewMode::Top);
        assert_eq!(app.viewport().scroll_offset(), 0.0);
        app.draw().unwrap();
        assert!(screen(&app)[19].contains("top"));
    }

    #[test]
    fn click_reveals_card() {
        let mut app = create_test_app();
        // Third card in a 19-row Flat wheel covers rows 15 to 17.
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 20,
            row: 15,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.selected(), Some(ItemIndex::new(2)));

        let slot = app.viewport().projection().policy().slot_extent();
        assert_eq!(app.viewport().channel().animation_target(), Some(2.0 * slot));

        assert!(app.tick(Duration::from_millis(250)));
        assert_eq!(app.viewport().scroll_offset(), 2.0 * slot);
        assert!(!app.tick(Duration::from_millis(16)));
    }

    #[test]
    fn click_on_status_line_is_ignored() {
        let mut app = create_test_app();
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 20,
            row: 19,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.selected(), Some(ItemIndex::ZERO));
        assert!(!app.viewport().channel().is_animating());
    }
}
