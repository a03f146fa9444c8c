use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_segmentation::UnicodeSegmentation;

use crate::model::{FieldKind, FieldSpec, FormValues};
use crate::tui::app::{App, FormState, FormTarget};
use crate::util::text::{cursor_column, display_width, truncate_to_width};

const MAX_WIDTH: u16 = 72;
const LABEL_WIDTH: usize = 26;

/// Render the form popup: one row per field, a hint line at the bottom.
pub fn render_form_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.form else {
        return;
    };
    let Some(values) = draft(app, form.target) else {
        return;
    };

    let width = area.width.saturating_sub(4).min(MAX_WIDTH);
    let height = (form.fields.len() as u16 + 4).min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);

    let theme = &app.theme;
    let bg = theme.background;
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", form.title),
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let inner_width = inner.width as usize;
    let label_width = LABEL_WIDTH.min(inner_width / 2);
    let value_width = inner_width.saturating_sub(label_width + 1);

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor: Option<Position> = None;
    for (i, spec) in form.fields.iter().enumerate() {
        let selected = i == form.field;
        let label_style = if selected {
            Style::default().fg(theme.highlight).bg(bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text).bg(bg)
        };
        let label = truncate_to_width(spec.label, label_width);
        let pad = label_width.saturating_sub(display_width(&label));
        let (value, value_style, col) = field_value(values, spec, form, selected, value_width, app);
        if let Some(col) = col {
            cursor = Some(Position {
                x: inner.x + (label_width + 1 + col) as u16,
                y: inner.y + i as u16,
            });
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{}{} ", label, " ".repeat(pad)), label_style),
            Span::styled(value, value_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab next \u{b7} Space toggle \u{b7} \u{2190}/\u{2192} choose \u{b7} Ctrl-S save \u{b7} Esc close",
        Style::default().fg(theme.dim).bg(bg),
    )));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
    if let Some(position) = cursor
        && position.y < inner.y + inner.height
    {
        frame.set_cursor_position(position);
    }
}

fn draft(app: &App, target: FormTarget) -> Option<&FormValues> {
    match target {
        FormTarget::Project => Some(app.shell.project_draft()),
        FormTarget::Panel(i) => app
            .shell
            .panels()
            .get(i)?
            .controller()
            .map(|c| c.draft()),
    }
}

/// Shown text, its style and, for the selected text field, the cursor column.
fn field_value(
    values: &FormValues,
    spec: &FieldSpec,
    form: &FormState,
    selected: bool,
    width: usize,
    app: &App,
) -> (String, Style, Option<usize>) {
    let theme = &app.theme;
    let bg = theme.background;
    let style = if selected {
        Style::default().fg(theme.text_bright).bg(theme.selection_bg)
    } else {
        Style::default().fg(theme.text_bright).bg(bg)
    };
    let raw = values.get(spec.name).unwrap_or_default();
    match spec.kind {
        FieldKind::Checkbox => {
            let mark = if values.is_checked(spec.name) { "[x]" } else { "[ ]" };
            (mark.to_string(), style, None)
        }
        FieldKind::Scale => (format!("\u{2039} {} \u{203A}", raw), style, None),
        _ if raw.is_empty() && !selected => {
            let placeholder = match spec.kind {
                FieldKind::Date => "YYYY-MM-DD",
                FieldKind::DateTime => "YYYY-MM-DDTHH:MM",
                _ => "",
            };
            (placeholder.to_string(), Style::default().fg(theme.dim).bg(bg), None)
        }
        _ => {
            // Newlines are shown as ↵ so multi-line fields stay on one row
            let shown = raw.replace('\n', "\u{21B5}");
            if !selected {
                return (truncate_to_width(&shown, width), style, None);
            }
            let col = cursor_column(raw, form.cursor);
            // Scroll left so the cursor stays inside the field
            let skip = col.saturating_sub(width.saturating_sub(1));
            let visible = skip_cells(&shown, skip);
            (truncate_to_width(&visible, width), style, Some(col - skip))
        }
    }
}

/// Drop graphemes from the front of `s` until `cells` columns are gone.
fn skip_cells(s: &str, cells: usize) -> String {
    let mut dropped = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        if dropped < cells {
            dropped += display_width(g);
            continue;
        }
        out.push_str(g);
    }
    out
}
