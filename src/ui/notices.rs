use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::notice::NoticeKind;
use crate::ui::fit;

const MAX_WIDTH: u16 = 48;
const HEIGHT: u16 = 3;

/// Stacks active notices in the top-right corner, newest lowest
pub fn render_notices(app: &App, f: &mut Frame, now: Instant) {
    let palette = app.theme().palette();
    let area = f.area();
    let mut y = area.y + 1;

    for notice in app.notices.iter() {
        if y + HEIGHT > area.bottom() {
            break;
        }
        let color = match notice.kind {
            NoticeKind::Success => palette.success,
            NoticeKind::Error => palette.error,
            NoticeKind::Info => palette.info,
        };
        let mut style = palette.base().fg(color);
        if notice.is_fading(now) {
            style = style.add_modifier(Modifier::DIM);
        }

        let title = notice.kind.title();
        let width = ((title.width() + notice.message.width() + 5) as u16)
            .min(MAX_WIDTH)
            .min(area.width);
        let rect = Rect::new(area.right().saturating_sub(width + 1), y, width, HEIGHT);
        let text_width = (width as usize).saturating_sub(title.width() + 3);

        let line = Line::from(vec![
            Span::styled(title, style.add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(fit(&notice.message, text_width), style),
        ]);
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(line)
                .style(palette.base())
                .block(Block::default().borders(Borders::ALL).border_style(style)),
            rect,
        );
        y += HEIGHT;
    }
}
