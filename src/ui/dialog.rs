use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, PathAction, Screen};
use crate::ui::centered_rect;

pub const CLEAR_PROMPT: &str = "This will delete all locally stored apps on this browser. Continue?";

pub fn render_confirm_clear(app: &App, f: &mut Frame) {
    let palette = app.theme().palette();
    let area = centered_rect(52, 7, f.area());

    let body = vec![
        Line::from(Span::styled(CLEAR_PROMPT, palette.base())),
        Line::from(""),
        Line::from(Span::styled("y: delete   n/esc: cancel", palette.muted())),
    ];
    let dialog = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.base().fg(palette.error))
                .title("Clear data"),
        )
        .style(palette.base());

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

pub fn render_path_prompt(app: &App, f: &mut Frame) {
    let palette = app.theme().palette();
    let area = centered_rect(60, 5, f.area());
    let title = match app.screen {
        Screen::PathPrompt(PathAction::Import) => "Import from (.json or .csv)",
        _ => "Export to (.csv or .json)",
    };

    let body = vec![
        Line::from(Span::styled(format!("{}▏", app.prompt_input), palette.base())),
        Line::from(Span::styled("⏎ confirm   esc cancel", palette.muted())),
    ];
    let dialog = Paragraph::new(body).style(palette.base()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border(true))
            .title(title),
    );

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}
