use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::spans_width;
use crate::controller::router::Phase;
use crate::tui::app::App;
use crate::util::text::truncate_to_width;

/// Render the tab bar: one tab per phase, the active project on the right,
/// with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg_style = Style::default().bg(app.theme.background);
    let sep = Span::styled(
        "\u{2502}",
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    );
    let mut spans: Vec<Span> = vec![
        Span::styled(" ", bg_style),
        Span::styled(
            "\u{25B6}",
            Style::default().fg(app.theme.highlight).bg(app.theme.background),
        ),
        Span::styled(" ", bg_style),
    ];
    let mut sep_cols: Vec<usize> = Vec::new();

    let current = app.shell.phase();
    for (i, phase) in Phase::ALL.into_iter().enumerate() {
        let style = tab_style(app, current == Some(phase));
        spans.push(Span::styled(format!(" {} {} ", i + 1, phase.name()), style));
        sep_cols.push(spans_width(&spans));
        spans.push(sep.clone());
    }

    // Active project, right-aligned
    if let Some(project) = app.shell.active() {
        let used = spans_width(&spans);
        let room = (area.width as usize).saturating_sub(used + 2);
        let name = truncate_to_width(&project.name, room);
        let name_width = crate::util::text::display_width(&name);
        if name_width > 0 {
            let padding = (area.width as usize).saturating_sub(used + name_width + 1);
            spans.push(Span::styled(" ".repeat(padding), bg_style));
            spans.push(Span::styled(
                name,
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(app.theme.background)
                    .add_modifier(Modifier::BOLD),
            ));
        }
    }

    let tabs = Paragraph::new(Line::from(spans)).style(bg_style);
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let mut line = String::with_capacity(width * 3);
    for col in 0..width {
        if sep_cols.contains(&col) {
            line.push('\u{2534}');
        } else {
            line.push('\u{2500}');
        }
    }
    let sep_widget =
        Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
