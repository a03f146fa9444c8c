use serde::Serialize;
use serde_json::{Value, json};

use crate::controller::panel::{COMMS_PLAN_TEXT, Panel};
use crate::model::{
    ChangeRequest, Charter, Lesson, Meeting, Project, RecordId, Risk, Stakeholder, Task, WbsItem,
};
use crate::util::format::{format_date, format_json, format_scheduled_at, or_dash, yes_no};

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ProjectJson<'a> {
    #[serde(flatten)]
    pub project: &'a Project,
    pub active: bool,
}

pub fn projects_json<'a>(projects: &'a [Project], active: Option<&RecordId>) -> Vec<ProjectJson<'a>> {
    projects
        .iter()
        .map(|project| ProjectJson {
            project,
            active: Some(&project.id) == active,
        })
        .collect()
}

/// A panel's held data as JSON: a list, the charter object, or the
/// placeholder text.
pub fn panel_json(panel: &Panel) -> Value {
    fn items<T: Serialize>(items: &[T]) -> Value {
        serde_json::to_value(items).unwrap_or(Value::Null)
    }
    match panel {
        Panel::Charter(p) => p
            .charter()
            .and_then(|c| serde_json::to_value(c).ok())
            .unwrap_or(Value::Null),
        Panel::Risks(p) => items(p.items()),
        Panel::Stakeholders(p) => items(p.items()),
        Panel::Wbs(p) => items(p.items()),
        Panel::Tasks(p) => items(p.items()),
        Panel::CommsPlan => json!(COMMS_PLAN_TEXT),
        Panel::Changes(p) => items(p.items()),
        Panel::Meetings(p) => items(p.items()),
        Panel::Lessons(p) => items(p.items()),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

pub fn format_project(project: &Project, active: bool) -> String {
    let marker = if active { "*" } else { " " };
    format!(
        "{} {:>4}  {}  sponsor: {} \u{b7} PM: {}  status: {}",
        marker,
        project.id,
        project.name,
        or_dash(project.sponsor.as_deref()),
        or_dash(project.manager.as_deref()),
        or_dash(Some(project.status.as_str())),
    )
}

pub fn format_charter(charter: &Charter) -> Vec<String> {
    let list = |items: &[String]| {
        if items.is_empty() {
            or_dash(None).to_string()
        } else {
            items.join(", ")
        }
    };
    let constraints = if charter.constraints.is_empty() {
        or_dash(None).to_string()
    } else {
        charter
            .constraints
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{k}: {s}"),
                other => format!("{k}: {other}"),
            })
            .collect::<Vec<_>>()
            .join("; ")
    };
    vec![
        format!("Business need:        {}", or_dash(charter.business_need.as_deref())),
        format!(
            "Product description:  {}",
            or_dash(charter.product_description.as_deref())
        ),
        format!("Goals:                {}", list(&charter.goals)),
        format!("Constraints:          {}", constraints),
        format!("Approvers:            {}", list(&charter.approvers)),
        format!("Signed off:           {}", yes_no(charter.signed_off)),
    ]
}

pub fn format_risk(risk: &Risk) -> String {
    let exposure = risk
        .exposure
        .as_ref()
        .map(|n| n.to_string())
        .unwrap_or_else(|| or_dash(None).to_string());
    format!(
        "{:>4}  {}  P{} I{} exposure {}  owner: {}",
        risk.id,
        risk.title,
        risk.probability,
        risk.impact,
        exposure,
        or_dash(risk.owner.as_deref()),
    )
}

pub fn format_stakeholder(s: &Stakeholder) -> String {
    format!(
        "{:>4}  {}  role: {}  influence: {}  needs: {}",
        s.id,
        s.name,
        or_dash(s.role.as_deref()),
        or_dash(s.influence.as_deref()),
        or_dash(s.information_needs.as_deref()),
    )
}

pub fn format_wbs(item: &WbsItem) -> String {
    format!(
        "{:>4}  {}  deliverable: {}  criteria: {}",
        item.id,
        item.title,
        yes_no(item.deliverable),
        or_dash(item.completion_criteria.as_deref()),
    )
}

pub fn format_task(task: &Task) -> String {
    format!(
        "{:>4}  {}  effort: {}  duration: {}  {} \u{2192} {}  [{}]",
        task.id,
        or_dash(task.assignee.as_deref()),
        or_dash(task.effort_days.as_deref()),
        or_dash(task.duration_days.as_deref()),
        format_date(task.start_date.as_deref()),
        format_date(task.end_date.as_deref()),
        or_dash(Some(task.status.as_str())),
    )
}

pub fn format_change(change: &ChangeRequest) -> Vec<String> {
    let mut lines = vec![format!(
        "{:>4}  {}  type: {}  by: {}  decision: {}",
        change.id,
        change.title,
        or_dash(change.kind.as_deref()),
        or_dash(change.requested_by.as_deref()),
        or_dash(change.decision.as_deref()),
    )];
    if matches!(change.impact, Some(ref v) if !v.is_null()) {
        lines.extend(
            format_json(change.impact.as_ref())
                .lines()
                .map(|l| format!("      {l}")),
        );
    }
    lines
}

pub fn format_meeting(meeting: &Meeting) -> String {
    let attendees = if meeting.attendees.is_empty() {
        or_dash(None).to_string()
    } else {
        meeting.attendees.join(", ")
    };
    format!(
        "{:>4}  {}  {}  {} min  attendees: {}  minutes: {}",
        meeting.id,
        or_dash(Some(meeting.kind.as_str())),
        format_scheduled_at(meeting.scheduled_at.as_deref()),
        or_dash(meeting.duration_mins.as_deref()),
        attendees,
        or_dash(meeting.minutes.as_deref()),
    )
}

pub fn format_lesson(lesson: &Lesson) -> Vec<String> {
    vec![
        format!("{:>4}  [{}]", lesson.id, or_dash(Some(lesson.category.as_str()))),
        format!("      went well: {}", or_dash(Some(lesson.went_well.as_str()))),
        format!("      improve:   {}", or_dash(Some(lesson.improve.as_str()))),
        format!("      actions:   {}", or_dash(lesson.actions.as_deref())),
    ]
}

/// Text lines for a panel's held data.
pub fn panel_lines(panel: &Panel) -> Vec<String> {
    let lines: Vec<String> = match panel {
        Panel::Charter(p) => p.charter().map(format_charter).unwrap_or_default(),
        Panel::Risks(p) => p.items().iter().map(format_risk).collect(),
        Panel::Stakeholders(p) => p.items().iter().map(format_stakeholder).collect(),
        Panel::Wbs(p) => p.items().iter().map(format_wbs).collect(),
        Panel::Tasks(p) => p.items().iter().map(format_task).collect(),
        Panel::CommsPlan => COMMS_PLAN_TEXT.iter().map(|s| s.to_string()).collect(),
        Panel::Changes(p) => p.items().iter().flat_map(format_change).collect(),
        Panel::Meetings(p) => p.items().iter().map(format_meeting).collect(),
        Panel::Lessons(p) => p.items().iter().flat_map(format_lesson).collect(),
    };
    if lines.is_empty() {
        vec!["(none)".to_string()]
    } else {
        lines
    }
}
