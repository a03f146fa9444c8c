use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::helpers::centered_rect;
use crate::tui::app::App;

const NAVIGATION: &[(&str, &str)] = &[
    (" 1-4", "Initiation / Planning / Execution / Closure"),
    (" Tab/S-Tab", "Cycle focus between columns"),
    (" \u{2191}\u{2193}/jk", "Move cursor / scroll panel"),
    (" Enter", "Open project (or New project)"),
    (" a", "Add to the focused panel"),
    (" e", "Edit the charter"),
    (" r", "Reload the focused column"),
    (" ?", "Toggle this help"),
    (" q", "Quit"),
];

const FORM: &[(&str, &str)] = &[
    (" Tab/S-Tab", "Next / previous field"),
    (" Space", "Toggle checkbox"),
    (" \u{2190}\u{2192}", "Cycle a 1-5 choice, move cursor"),
    (" Ctrl-S", "Submit"),
    (" Esc", "Close, keeping what you typed"),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(" Key Bindings", header_style)),
        Line::from(""),
    ];
    for (section, bindings) in [("Navigation", NAVIGATION), ("Forms", FORM)] {
        lines.push(Line::from(Span::styled(format!(" {section}"), header_style)));
        for (key, desc) in bindings {
            add_binding(&mut lines, key, desc, key_style, desc_style);
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        format!(" API: {}", app.api_url),
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    let block = Block::default()
        .title(Span::styled(" Help ", header_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.text).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    lines.push(Line::from(vec![
        Span::styled(format!("{:<12}", key), key_style),
        Span::styled(desc, desc_style),
    ]));
}
