pub mod dialog;
pub mod form;
pub mod list;
pub mod notices;
pub mod screen;

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Block,
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;

pub const HORIZONTAL_MARGIN: u16 = 2;
pub const VERTICAL_MARGIN: u16 = 1;

/// Draws the whole frame: themed background, current screen, notices on top
pub fn draw(app: &App, f: &mut Frame, now: Instant) {
    let palette = app.theme().palette();
    f.render_widget(Block::default().style(palette.base()), f.area());

    screen::current_screen(&app.screen).render(app, f, now);
    notices::render_notices(app, f, now);
}

/// Truncates `s` to `width` terminal columns, marking the cut with an ellipsis
pub fn fit(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Rect of `width` x `height` cells centered in `area`, clamped to it
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}
