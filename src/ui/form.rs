use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::form::Field;
use crate::ui::{HORIZONTAL_MARGIN, VERTICAL_MARGIN};

const LABEL_WIDTH: usize = 11;

pub fn render_form(app: &App, f: &mut Frame) {
    let palette = app.theme().palette();
    let state = &app.form;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(Field::ORDER.len() as u16 * 2),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled("Add app", palette.heading())).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border(false)),
    );
    f.render_widget(title, chunks[0]);

    let mut lines = Vec::with_capacity(Field::ORDER.len() * 2);
    for field in Field::ORDER {
        let focused = state.focused() == field;
        let value = state.form.text(field);
        let shown = if field.is_choice() {
            if value.is_empty() {
                "◂ select ▸".to_string()
            } else {
                format!("◂ {value} ▸")
            }
        } else if focused {
            format!("{value}▏")
        } else {
            value.to_string()
        };

        let label_style = if focused {
            palette.heading()
        } else {
            palette.muted()
        };
        let value_style = if focused {
            palette.base().add_modifier(Modifier::UNDERLINED)
        } else {
            palette.base()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<width$}", field.to_string(), width = LABEL_WIDTH), label_style),
            Span::styled(shown, value_style),
        ]));

        let error = state.errors.get(field).unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!("{:<width$}{error}", "", width = LABEL_WIDTH),
            palette.base().fg(palette.error),
        )));
    }
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(false)),
        ),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new("tab/↑↓ field  ←/→ choose  ⏎ save  ctrl+r reset  esc back").style(palette.muted()),
        chunks[2],
    );
}
