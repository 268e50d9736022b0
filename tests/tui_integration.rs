//! Integration tests for the terminal demo
//!
//! These tests drive the full app against a TestBackend, without requiring
//! an actual terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use deckview::config::ResolvedConfig;
use deckview::view::TuiApp;
use deckview::viewport::{ItemIndex, ViewMode};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::time::Duration;

fn app_with(config: ResolvedConfig) -> TuiApp<TestBackend> {
    let terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
    let mut app = TuiApp::with_terminal(terminal, &config).unwrap();
    app.draw().unwrap();
    app
}

fn press(app: &mut TuiApp<TestBackend>, code: KeyCode) -> bool {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn screen(app: &TuiApp<TestBackend>) -> Vec<String> {
    let buffer = app.terminal().backend().buffer();
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect()
}

fn shows(app: &TuiApp<TestBackend>, text: &str) -> bool {
    screen(app).iter().any(|line| line.contains(text))
}

/// Test that 'q' key triggers quit
#[test]
fn test_q_key_triggers_quit() {
    let mut app = app_with(ResolvedConfig::default());
    assert!(press(&mut app, KeyCode::Char('q')));
}

/// Test that Ctrl+C triggers quit
#[test]
fn test_ctrl_c_triggers_quit() {
    let mut app = app_with(ResolvedConfig::default());
    assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
}

/// Test that other keys don't trigger quit
#[test]
fn test_other_keys_do_not_quit() {
    let mut app = app_with(ResolvedConfig::default());
    assert!(!press(&mut app, KeyCode::Char('a')));
    assert!(!press(&mut app, KeyCode::Down));
}

#[test]
fn every_mode_shows_the_anchored_card() {
    let mut app = app_with(ResolvedConfig::default());
    for mode in [ViewMode::Flat, ViewMode::Top, ViewMode::Bottom] {
        assert_eq!(app.viewport().config().view_mode(), mode);
        assert!(shows(&app, "Item 0"), "{mode}: {:#?}", screen(&app));
        assert!(shows(&app, &format!(" {mode} |")));
        press(&mut app, KeyCode::Char('m'));
        app.draw().unwrap();
    }
    assert_eq!(app.viewport().config().view_mode(), ViewMode::Flat);
}

#[test]
fn arrow_keys_move_the_selection() {
    let mut app = app_with(ResolvedConfig::default());
    for _ in 0..3 {
        press(&mut app, KeyCode::Down);
    }
    app.draw().unwrap();
    assert_eq!(app.selected(), Some(ItemIndex::new(3)));
    assert!(shows(&app, "Item 3"));
    assert!(shows(&app, "selected 3"));

    press(&mut app, KeyCode::Up);
    assert_eq!(app.selected(), Some(ItemIndex::new(2)));
}

#[test]
fn mouse_wheel_scrolls() {
    let mut app = app_with(ResolvedConfig::default());
    app.handle_mouse(MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column: 10,
        row: 10,
        modifiers: KeyModifiers::NONE,
    });
    assert_eq!(app.selected(), Some(ItemIndex::new(1)));
    assert!(app.viewport().scroll_offset() > 0.0);
}

#[test]
fn end_key_animates_to_last_card() {
    let mut app = app_with(ResolvedConfig::default());
    press(&mut app, KeyCode::End);
    assert!(app.viewport().channel().is_animating());

    assert!(app.tick(Duration::from_secs(1)));
    app.draw().unwrap();
    assert_eq!(app.selected(), Some(ItemIndex::new(199)));
    assert!(shows(&app, "Item 199"));

    press(&mut app, KeyCode::Home);
    app.tick(Duration::from_secs(1));
    app.draw().unwrap();
    assert_eq!(app.viewport().scroll_offset(), 0.0);
}

#[test]
fn end_key_is_ignored_for_unbounded_wheel() {
    let mut app = app_with(ResolvedConfig {
        item_count: None,
        ..ResolvedConfig::default()
    });
    press(&mut app, KeyCode::End);
    assert!(!app.viewport().channel().is_animating());
    assert_eq!(app.viewport().scroll_offset(), 0.0);
}

#[test]
fn empty_wheel_renders_only_status() {
    let app = app_with(ResolvedConfig {
        item_count: Some(0),
        ..ResolvedConfig::default()
    });
    let lines = screen(&app);
    assert!(lines[..19].iter().all(|line| line.trim().is_empty()));
    assert!(lines[19].contains("live -"));
}

#[test]
fn zero_reveal_duration_jumps_immediately() {
    let mut app = app_with(ResolvedConfig {
        reveal_duration: Duration::ZERO,
        ..ResolvedConfig::default()
    });
    press(&mut app, KeyCode::End);
    assert!(!app.viewport().channel().is_animating());
    app.draw().unwrap();
    assert!(shows(&app, "Item 199"));
}

#[test]
fn top_deck_keeps_selected_card_in_front() {
    let mut app = app_with(ResolvedConfig::default());
    press(&mut app, KeyCode::Char('m'));
    for _ in 0..3 {
        press(&mut app, KeyCode::Down);
    }
    app.draw().unwrap();
    assert_eq!(app.viewport().config().view_mode(), ViewMode::Top);
    assert_eq!(app.selected(), Some(ItemIndex::new(3)));
    assert!(shows(&app, "Item 3"), "{:#?}", screen(&app));
}
