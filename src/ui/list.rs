use std::time::Instant;

use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};
use time_humanize::HumanTime;

use crate::app::{App, SKELETON_ROWS};
use crate::media::VideoLink;
use crate::record::AppRecord;
use crate::theme::Palette;
use crate::ui::{fit, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

const COLUMN_WIDTHS: [Constraint; 6] = [
    Constraint::Length(2),
    Constraint::Percentage(24),
    Constraint::Percentage(20),
    Constraint::Percentage(18),
    Constraint::Length(6),
    Constraint::Min(16),
];

/// Human age of a record, falling back to the raw timestamp
pub fn created_label(app: &AppRecord) -> String {
    match app.created_at_parsed() {
        Some(created) => {
            let age = Utc::now().signed_duration_since(created).num_seconds();
            format!("{} ({})", HumanTime::from_seconds(-age), app.created_at)
        }
        None => app.created_at.clone(),
    }
}

pub fn details_label(expanded: bool) -> &'static str {
    if expanded {
        "▾ Hide details"
    } else {
        "▸ Show details"
    }
}

pub fn render_list(app: &App, f: &mut Frame, now: Instant) {
    let palette = app.theme().palette();
    let selected_expanded = app
        .selected_record()
        .filter(|rec| app.is_expanded(rec))
        .is_some();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3),                                    // header
            Constraint::Length(3),                                    // filters
            Constraint::Length(1),                                    // results info
            Constraint::Min(4),                                       // table
            Constraint::Length(if selected_expanded { 9 } else { 0 }), // details
            Constraint::Length(1),                                    // help
        ])
        .split(f.area());

    render_header(app, f, chunks[0], &palette, now);
    render_filters(app, f, chunks[1], &palette);

    let loading = app.is_loading(now);
    let info = if loading {
        "Loading…".to_string()
    } else {
        format!(
            "Results: {}   Page {}/{}",
            app.results_count(),
            app.query.page,
            app.page_count()
        )
    };
    f.render_widget(Paragraph::new(info).style(palette.muted()), chunks[2]);

    if loading {
        render_skeleton(f, chunks[3], &palette);
    } else if app.results_count() == 0 {
        render_empty(app, f, chunks[3], &palette);
    } else {
        render_table(app, f, chunks[3], &palette);
        if let Some(rec) = app.selected_record().filter(|_| selected_expanded) {
            render_details(rec, f, chunks[4], &palette);
        }
    }

    let help = "/ search  d domain  f price  s sort  ←/→ page  ⏎ details  o open  a add  i import  e export  x clear  t theme  q quit";
    f.render_widget(
        Paragraph::new(fit(help, chunks[5].width as usize)).style(palette.muted()),
        chunks[5],
    );
}

fn render_header(app: &App, f: &mut Frame, area: Rect, palette: &Palette, now: Instant) {
    let elevated = app.header_elevated();
    let border_type = if app.header_in_transition(now) {
        BorderType::Double
    } else if elevated {
        BorderType::Thick
    } else {
        BorderType::Plain
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(palette.border(elevated));

    let title = Line::from(vec![
        Span::styled("appdeck", palette.heading()),
        Span::styled(format!("   {} theme", app.theme()), palette.muted()),
    ]);
    f.render_widget(Paragraph::new(title).block(block), area);
}

fn render_filters(app: &App, f: &mut Frame, area: Rect, palette: &Palette) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(22),
            Constraint::Percentage(16),
            Constraint::Percentage(22),
        ])
        .split(area);

    let search_style = if app.searching {
        palette.border(true)
    } else {
        palette.border(false)
    };
    let search_text = if app.searching {
        format!("{}▏", app.search_input)
    } else if app.search_input.is_empty() {
        "name or company".to_string()
    } else {
        app.search_input.clone()
    };
    let search = Paragraph::new(search_text)
        .style(if app.search_input.is_empty() && !app.searching {
            palette.muted()
        } else {
            palette.base()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(search_style)
                .title("Search"),
        );
    f.render_widget(search, cols[0]);

    let domain = if app.query.domain.is_empty() {
        "All"
    } else {
        app.query.domain.as_str()
    };
    let boxes = [
        ("Domain", domain.to_string()),
        ("Price", app.query.free.to_string()),
        ("Sort", app.query.sort.to_string()),
    ];
    for ((title, value), area) in boxes.into_iter().zip(cols.iter().skip(1)) {
        let widget = Paragraph::new(value).style(palette.base()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(false))
                .title(title),
        );
        f.render_widget(widget, *area);
    }
}

fn render_skeleton(f: &mut Frame, area: Rect, palette: &Palette) {
    let widths = [40usize, 50, 35, 30, 25];
    let rows = (0..SKELETON_ROWS).map(|_| {
        Row::new(
            widths
                .iter()
                .map(|w| Cell::from("░".repeat(w / 5)))
                .collect::<Vec<_>>(),
        )
        .style(palette.muted())
    });
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(26),
            Constraint::Percentage(20),
            Constraint::Percentage(18),
            Constraint::Percentage(12),
            Constraint::Min(8),
        ],
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border(false)),
    );
    f.render_widget(table, area);
}

fn render_empty(app: &App, f: &mut Frame, area: Rect, palette: &Palette) {
    let message = if app.list.is_empty() {
        "No apps stored yet. Press i to import a JSON file or a to add one."
    } else {
        "No apps match the current filters."
    };
    let empty = Paragraph::new(message)
        .style(palette.muted())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(false)),
        );
    f.render_widget(empty, area);
}

fn render_table(app: &App, f: &mut Frame, area: Rect, palette: &Palette) {
    let header = Row::new(vec!["", "App", "Company", "Domain", "Price", ""]).style(
        palette
            .base()
            .fg(palette.info)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .page_items()
        .into_iter()
        .map(|rec| {
            Row::new(vec![
                Cell::from(if rec.logo().is_some() { "◆" } else { " " }),
                Cell::from(rec.app_name.clone()).style(palette.base().fg(palette.accent)),
                Cell::from(rec.company.clone()),
                Cell::from(format!("[{}]", rec.domain)).style(palette.base().fg(palette.badge)),
                Cell::from(if rec.is_free.is_free() { "Free" } else { "Paid" }),
                Cell::from(details_label(app.is_expanded(rec))).style(palette.muted()),
            ])
            .style(palette.base())
        })
        .collect();

    let table = Table::new(rows, COLUMN_WIDTHS)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(false)),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_details(rec: &AppRecord, f: &mut Frame, area: Rect, palette: &Palette) {
    let label = |name: &'static str| Span::styled(format!("{name:<8}"), palette.muted());
    let mut lines = vec![
        Line::from(Span::styled(rec.summary.clone(), palette.base())),
        Line::from(vec![label("Website"), Span::raw(rec.website.clone())]),
    ];
    if let Some(logo) = rec.logo() {
        lines.push(Line::from(vec![label("Logo"), Span::raw(logo.to_string())]));
    }
    if let Some(audio) = rec.audio() {
        lines.push(Line::from(vec![label("Audio"), Span::raw(audio.to_string())]));
    }
    if let Some(video) = rec.video() {
        let line = match VideoLink::from_url(video) {
            VideoLink::Embed(url) => vec![label("Video"), Span::raw(url), Span::styled(" (embed)", palette.muted())],
            VideoLink::Direct(url) => vec![label("Video"), Span::raw(url)],
        };
        lines.push(Line::from(line));
    }
    lines.push(Line::from(vec![label("Added"), Span::raw(created_label(rec))]));

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(palette.base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(false))
                .title(format!("Details {}", rec.app_name)),
        );
    f.render_widget(panel, area);
}
