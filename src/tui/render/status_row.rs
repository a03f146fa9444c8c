use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::spans_width;
use crate::tui::app::{App, StatusKind};
use crate::util::text::{display_width, truncate_to_width};

const NAV_HINT: &str = "1-4 phase  Tab focus  a/e form  r reload  ? help  q quit";
const FORM_HINT: &str = "Ctrl-S save  Esc close";

/// Render the status row (bottom of screen): the last message on the left,
/// a dim hint on the right.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = Vec::new();
    if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => app.theme.text,
            StatusKind::Error => app.theme.red,
        };
        spans.push(Span::styled(
            format!(" {}", truncate_to_width(&status.text, width.saturating_sub(1))),
            Style::default().fg(color).bg(bg),
        ));
    }

    let hint = if app.form.is_some() {
        Some(FORM_HINT)
    } else if app.show_key_hints {
        Some(NAV_HINT)
    } else if app.is_busy() {
        Some("\u{2026}")
    } else {
        None
    };
    if let Some(hint) = hint {
        let content_width = spans_width(&spans);
        let hint_width = display_width(hint);
        if content_width + hint_width + 1 < width {
            let padding = width - content_width - hint_width - 1;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
