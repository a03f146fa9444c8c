use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use serde_json::Value;

use super::helpers::column_block;
use crate::controller::panel::{COMMS_PLAN_TEXT, Panel};
use crate::model::{ChangeRequest, Charter, Lesson, Meeting, Risk, Stakeholder, Task, WbsItem};
use crate::tui::app::{App, Focus};
use crate::tui::theme::Theme;
use crate::util::format::{format_date, format_json, format_scheduled_at, or_dash};

/// One entry of a panel body; may span several lines.
type Row = Vec<Line<'static>>;

const CHARTER_ROWS: usize = 6;

/// Number of scrollable entries a panel currently holds.
pub fn row_count(panel: &Panel) -> usize {
    match panel {
        Panel::Charter(p) => p.charter().map_or(0, |_| CHARTER_ROWS),
        Panel::Risks(p) => p.items().len(),
        Panel::Stakeholders(p) => p.items().len(),
        Panel::Wbs(p) => p.items().len(),
        Panel::Tasks(p) => p.items().len(),
        Panel::CommsPlan => COMMS_PLAN_TEXT.len(),
        Panel::Changes(p) => p.items().len(),
        Panel::Meetings(p) => p.items().len(),
        Panel::Lessons(p) => p.items().len(),
    }
}

/// Render the mounted panels stacked vertically, or a hint when the tab
/// mounts nothing.
pub fn render_panels(frame: &mut Frame, app: &App, area: Rect) {
    let panels = app.shell.panels();
    if panels.is_empty() {
        let hint = if app.shell.active().is_none() {
            "Create a project to get started"
        } else {
            "Nothing on this tab"
        };
        let block = column_block("", false, &app.theme);
        let paragraph = Paragraph::new(Span::styled(
            hint,
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        ))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let count = panels.len() as u32;
    let constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, count)).collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, (panel, chunk)) in panels.iter().zip(chunks.iter()).enumerate() {
        let focused = app.focus == Focus::Panel(i);
        let scroll = if focused { app.panel_scroll } else { 0 };
        render_panel(frame, app, panel, focused, scroll, *chunk);
    }
}

fn render_panel(frame: &mut Frame, app: &App, panel: &Panel, focused: bool, scroll: usize, area: Rect) {
    let theme = &app.theme;
    let block = column_block(panel.title(), focused, theme);
    let dim = Style::default().fg(theme.dim).bg(theme.background);

    let mut lines: Vec<Line> = Vec::new();
    if let Some(error) = panel.error() {
        lines.push(Line::from(Span::styled(
            format!("\u{26A0} {}", error),
            Style::default().fg(theme.red).bg(theme.background),
        )));
    }
    if panel.is_loading() {
        lines.push(Line::from(Span::styled("Loading\u{2026}", dim)));
    } else {
        let rows = panel_rows(panel, theme);
        if rows.is_empty() {
            lines.push(Line::from(Span::styled("(none)", dim)));
        }
        lines.extend(rows.into_iter().skip(scroll).flatten());
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(theme.text).bg(theme.background))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn panel_rows(panel: &Panel, theme: &Theme) -> Vec<Row> {
    match panel {
        Panel::Charter(p) => p.charter().map(|c| charter_rows(c, theme)).unwrap_or_default(),
        Panel::Risks(p) => p.items().iter().map(|r| risk_row(r, theme)).collect(),
        Panel::Stakeholders(p) => p.items().iter().map(|s| stakeholder_row(s, theme)).collect(),
        Panel::Wbs(p) => p.items().iter().map(|w| wbs_row(w, theme)).collect(),
        Panel::Tasks(p) => p.items().iter().map(|t| task_row(t, theme)).collect(),
        Panel::CommsPlan => COMMS_PLAN_TEXT
            .iter()
            .map(|text| vec![Line::from(text.to_string())])
            .collect(),
        Panel::Changes(p) => p.items().iter().map(|c| change_row(c, theme)).collect(),
        Panel::Meetings(p) => p.items().iter().map(|m| meeting_row(m, theme)).collect(),
        Panel::Lessons(p) => p.items().iter().map(|l| lesson_row(l, theme)).collect(),
    }
}

fn bright(text: impl Into<String>, theme: &Theme) -> Span<'static> {
    Span::styled(
        text.into(),
        Style::default()
            .fg(theme.text_bright)
            .add_modifier(Modifier::BOLD),
    )
}

fn dim(text: impl Into<String>, theme: &Theme) -> Span<'static> {
    Span::styled(text.into(), Style::default().fg(theme.dim))
}

fn labelled(label: &str, value: impl Into<String>, theme: &Theme) -> Line<'static> {
    Line::from(vec![dim(format!("{label}: "), theme), Span::raw(value.into())])
}

fn charter_rows(charter: &Charter, theme: &Theme) -> Vec<Row> {
    let list = |label: &str, items: &[String]| -> Row {
        if items.is_empty() {
            return vec![labelled(label, or_dash(None), theme)];
        }
        let mut row = vec![Line::from(dim(format!("{label}:"), theme))];
        row.extend(items.iter().map(|item| Line::from(format!("  \u{2022} {item}"))));
        row
    };
    let constraints: Row = if charter.constraints.is_empty() {
        vec![labelled("Constraints", or_dash(None), theme)]
    } else {
        let mut row = vec![Line::from(dim("Constraints:", theme))];
        row.extend(charter.constraints.iter().map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Line::from(format!("  {key}: {value}"))
        }));
        row
    };
    let signed = if charter.signed_off {
        Span::styled("yes", Style::default().fg(theme.green))
    } else {
        Span::styled("no", Style::default().fg(theme.yellow))
    };
    vec![
        vec![labelled(
            "Business need",
            or_dash(charter.business_need.as_deref()),
            theme,
        )],
        vec![labelled(
            "Product",
            or_dash(charter.product_description.as_deref()),
            theme,
        )],
        list("Goals", &charter.goals),
        constraints,
        list("Approvers", &charter.approvers),
        vec![Line::from(vec![dim("Signed off: ", theme), signed])],
    ]
}

fn risk_row(risk: &Risk, theme: &Theme) -> Row {
    let exposure = risk.exposure.as_ref().and_then(|n| n.as_f64());
    let color = match exposure {
        Some(e) if e >= 15.0 => theme.red,
        Some(e) if e >= 8.0 => theme.yellow,
        Some(_) => theme.green,
        None => theme.dim,
    };
    let exposure_text = risk
        .exposure
        .as_ref()
        .map_or_else(|| or_dash(None).to_string(), |n| n.to_string());
    vec![
        Line::from(vec![
            bright(risk.title.clone(), theme),
            Span::raw("  "),
            Span::styled(
                format!("P{} \u{d7} I{} = {}", risk.probability, risk.impact, exposure_text),
                Style::default().fg(color),
            ),
        ]),
        Line::from(vec![
            dim("  owner ", theme),
            Span::raw(or_dash(risk.owner.as_deref()).to_string()),
            dim("  mitigation ", theme),
            Span::raw(or_dash(risk.mitigation.as_deref()).to_string()),
        ]),
    ]
}

fn stakeholder_row(s: &Stakeholder, theme: &Theme) -> Row {
    vec![Line::from(vec![
        bright(s.name.clone(), theme),
        dim(
            format!(
                "  {} \u{b7} influence {}",
                or_dash(s.role.as_deref()),
                or_dash(s.influence.as_deref())
            ),
            theme,
        ),
        Span::raw(format!("  {}", or_dash(s.information_needs.as_deref()))),
    ])]
}

fn wbs_row(item: &WbsItem, theme: &Theme) -> Row {
    let mut spans = vec![Span::raw("\u{25B8} "), bright(item.title.clone(), theme)];
    if item.deliverable {
        spans.push(Span::styled(" [deliverable]", Style::default().fg(theme.cyan)));
    }
    vec![
        Line::from(spans),
        Line::from(dim(
            format!("  done when: {}", or_dash(item.completion_criteria.as_deref())),
            theme,
        )),
    ]
}

fn task_row(task: &Task, theme: &Theme) -> Row {
    vec![Line::from(vec![
        bright(or_dash(task.assignee.as_deref()).to_string(), theme),
        Span::raw(format!(
            "  {} \u{2192} {}",
            format_date(task.start_date.as_deref()),
            format_date(task.end_date.as_deref())
        )),
        dim(
            format!(
                "  effort {}d \u{b7} duration {}d",
                or_dash(task.effort_days.as_deref()),
                or_dash(task.duration_days.as_deref())
            ),
            theme,
        ),
        Span::styled(
            format!("  [{}]", or_dash(Some(task.status.as_str()))),
            Style::default().fg(theme.cyan),
        ),
    ])]
}

fn change_row(change: &ChangeRequest, theme: &Theme) -> Row {
    let decision = or_dash(change.decision.as_deref()).to_string();
    let decision_color = match decision.as_str() {
        "approved" => theme.green,
        "rejected" => theme.red,
        _ => theme.yellow,
    };
    let mut row = vec![Line::from(vec![
        bright(change.title.clone(), theme),
        dim(
            format!(
                "  {} \u{b7} by {}",
                or_dash(change.kind.as_deref()),
                or_dash(change.requested_by.as_deref())
            ),
            theme,
        ),
        Span::raw("  "),
        Span::styled(decision, Style::default().fg(decision_color)),
    ])];
    if let Some(description) = change.description.as_deref().filter(|d| !d.is_empty()) {
        row.push(Line::from(format!("  {description}")));
    }
    if matches!(change.impact, Some(ref v) if !v.is_null()) {
        row.extend(
            format_json(change.impact.as_ref())
                .lines()
                .map(|l| Line::from(dim(format!("  {l}"), theme))),
        );
    }
    row
}

fn meeting_row(meeting: &Meeting, theme: &Theme) -> Row {
    let attendees = if meeting.attendees.is_empty() {
        or_dash(None).to_string()
    } else {
        meeting.attendees.join(", ")
    };
    let mut row = vec![Line::from(vec![
        bright(format_scheduled_at(meeting.scheduled_at.as_deref()), theme),
        Span::raw(format!(
            "  {} \u{b7} {} min",
            or_dash(Some(meeting.kind.as_str())),
            or_dash(meeting.duration_mins.as_deref())
        )),
        dim(format!("  {attendees}"), theme),
    ])];
    if let Some(minutes) = meeting.minutes.as_deref().filter(|m| !m.is_empty()) {
        row.push(Line::from(format!("  {minutes}")));
    }
    row
}

fn lesson_row(lesson: &Lesson, theme: &Theme) -> Row {
    vec![
        Line::from(bright(
            format!("[{}]", or_dash(Some(lesson.category.as_str()))),
            theme,
        )),
        labelled("  went well", or_dash(Some(lesson.went_well.as_str())), theme),
        labelled("  improve", or_dash(Some(lesson.improve.as_str())), theme),
        labelled("  actions", or_dash(lesson.actions.as_deref()), theme),
    ]
}
