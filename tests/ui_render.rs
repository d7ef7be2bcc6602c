use std::time::{Duration, Instant};

use appdeck::app::{App, PathAction, Screen};
use appdeck::config::{Config, MemoryConfigStore};
use appdeck::store::MemoryAppStore;
use appdeck::theme::Theme;
use appdeck::transfer::import_json;
use appdeck::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};

const SAMPLE: &str = r#"[
  {"id":"a","appName":"Notely","company":"Acme","website":"https://notely.io","domain":"Productivity","isFree":"Free",
   "summary":"Quick notes everywhere","logoUrl":"https://notely.io/logo.png","videoUrl":"https://youtu.be/abc123","createdAt":"2024-03-01T00:00:00.000Z"},
  {"id":"b","appName":"Budget","company":"Finly","website":"https://budget.io","domain":"Finance","isFree":"Paid",
   "summary":"Money tracking","createdAt":"2024-02-01T00:00:00.000Z"}
]"#;

fn app_with(json: &str, reduced_motion: bool) -> (App, Instant) {
    let now = Instant::now();
    let config = Config {
        reduced_motion,
        ..Config::default()
    };
    let app = App::with_config(
        Box::new(MemoryAppStore::with_list(import_json(json).unwrap())),
        Box::new(MemoryConfigStore::new(config.clone())),
        config,
        now,
    );
    (app, now)
}

fn render(app: &App, now: Instant) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 36)).unwrap();
    terminal.draw(|f| ui::draw(app, f, now)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer
        .content
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn list_shows_rows_and_result_count() {
    let (app, now) = app_with(SAMPLE, true);
    let screen = render(&app, now);
    assert!(screen.contains("Results: 2"));
    assert!(screen.contains("Notely"));
    assert!(screen.contains("[Finance]"));
    assert!(screen.contains("Show details"));
    assert!(screen.contains("Newest"));
}

#[test]
fn skeleton_renders_before_first_load_completes() {
    let (mut app, now) = app_with(SAMPLE, false);
    let screen = render(&app, now);
    assert!(screen.contains("Loading"));
    assert!(!screen.contains("Notely"));

    app.on_tick(now + Duration::from_millis(250));
    let screen = render(&app, now + Duration::from_millis(250));
    assert!(screen.contains("Notely"));
}

#[test]
fn expanded_row_shows_detail_panel_with_embed() {
    let (mut app, now) = app_with(SAMPLE, true);
    app.handle_key(key(KeyCode::Enter), now);
    let screen = render(&app, now);
    assert!(screen.contains("Hide details"));
    assert!(screen.contains("Quick notes everywhere"));
    assert!(screen.contains("https://www.youtube.com/embed/abc123"));
    assert!(screen.contains("Details Notely"));
}

#[test]
fn empty_state_offers_import() {
    let (app, now) = app_with("[]", true);
    let screen = render(&app, now);
    assert!(screen.contains("Results: 0"));
    assert!(screen.contains("No apps stored yet"));
}

#[test]
fn form_shows_field_errors_after_failed_submit() {
    let (mut app, now) = app_with(SAMPLE, true);
    app.handle_key(key(KeyCode::Char('a')), now);
    app.handle_key(key(KeyCode::Enter), now);
    assert_eq!(app.screen, Screen::AddForm);
    let screen = render(&app, now);
    assert!(screen.contains("Add app"));
    assert!(screen.contains("English letters only, no spaces."));
    assert!(screen.contains("Please choose Free or Paid."));
}

#[test]
fn dialogs_render_over_list() {
    let (mut app, now) = app_with(SAMPLE, true);
    app.handle_key(key(KeyCode::Char('x')), now);
    assert!(render(&app, now).contains("Clear data"));

    app.handle_key(key(KeyCode::Esc), now);
    app.handle_key(key(KeyCode::Char('i')), now);
    assert_eq!(app.screen, Screen::PathPrompt(PathAction::Import));
    assert!(render(&app, now).contains("Import from"));
}

#[test]
fn notices_and_theme_render() {
    let (mut app, now) = app_with(SAMPLE, true);
    app.handle_key(key(KeyCode::Char('t')), now);
    assert_eq!(app.theme(), Theme::Light);
    app.notices.success("Import completed");
    let screen = render(&app, now);
    assert!(screen.contains("light theme"));
    assert!(screen.contains("Done"));
    assert!(screen.contains("Import completed"));
}
