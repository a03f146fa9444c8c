use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::helpers::column_block;
use crate::model::Project;
use crate::tui::app::{App, Focus};
use crate::util::format::or_dash;
use crate::util::text::truncate_to_width;

/// Render the project column: the New project action, then one two-line
/// entry per project, then any list error.
pub fn render_project_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Projects;
    let block = column_block("Projects", focused, &app.theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let bg = app.theme.background;
    let mut lines: Vec<Line> = Vec::new();

    let action_selected = focused && app.project_cursor == 0;
    lines.push(Line::from(Span::styled(
        truncate_to_width("+ New project", width),
        row_style(app, action_selected).fg(app.theme.green),
    )));

    if app.shell.projects_loading() && app.shell.projects().is_empty() {
        lines.push(Line::from(Span::styled(
            "Loading\u{2026}",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    // Keep the cursor row on screen: two lines per project after the action
    let visible = (inner.height as usize).saturating_sub(1) / 2;
    let skip = if focused && visible > 0 {
        app.project_cursor.saturating_sub(visible)
    } else {
        0
    };
    let active_id = app.shell.active().map(|p| &p.id);
    for (i, project) in app.shell.projects().iter().enumerate().skip(skip) {
        let selected = focused && app.project_cursor == i + 1;
        let active = active_id == Some(&project.id);
        lines.extend(project_lines(app, project, active, selected, width));
    }

    if let Some(error) = app.shell.error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(app.theme.red).bg(bg),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

fn project_lines<'a>(
    app: &App,
    project: &'a Project,
    active: bool,
    selected: bool,
    width: usize,
) -> [Line<'a>; 2] {
    let marker = if active { "\u{25B6} " } else { "  " };
    let mut name_style = row_style(app, selected);
    if active {
        name_style = name_style.fg(app.theme.highlight).add_modifier(Modifier::BOLD);
    }
    let detail = format!(
        "  {} \u{b7} {}",
        or_dash(project.manager.as_deref()),
        or_dash(Some(project.status.as_str())),
    );
    [
        Line::from(Span::styled(
            truncate_to_width(&format!("{}{}", marker, project.name), width),
            name_style,
        )),
        Line::from(Span::styled(
            truncate_to_width(&detail, width),
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        )),
    ]
}

fn row_style(app: &App, selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
