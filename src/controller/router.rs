use std::fmt;

use super::ProjectContext;
use crate::model::Resource;

/// Project-lifecycle phase; one tab each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Initiation,
    Planning,
    Execution,
    Closure,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Initiation,
        Phase::Planning,
        Phase::Execution,
        Phase::Closure,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Initiation => "Initiation",
            Phase::Planning => "Planning",
            Phase::Execution => "Execution",
            Phase::Closure => "Closure",
        }
    }

    /// Exact tab-name lookup.
    pub fn from_name(name: &str) -> Option<Phase> {
        Phase::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Case-insensitive lookup for command-line input.
    pub fn parse(name: &str) -> Option<Phase> {
        Phase::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn panels(self) -> &'static [PanelKind] {
        match self {
            Phase::Initiation => &[PanelKind::Charter, PanelKind::Risks, PanelKind::Stakeholders],
            Phase::Planning => &[PanelKind::Wbs, PanelKind::Tasks, PanelKind::CommsPlan],
            Phase::Execution => &[PanelKind::Changes, PanelKind::Meetings],
            Phase::Closure => &[PanelKind::Lessons],
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Charter,
    Risks,
    Stakeholders,
    Wbs,
    Tasks,
    /// Static guidance text; fetches nothing
    CommsPlan,
    Changes,
    Meetings,
    Lessons,
}

impl PanelKind {
    /// The sub-resource this panel loads, if any
    pub fn resource(self) -> Option<Resource> {
        match self {
            PanelKind::Charter => Some(Resource::Charter),
            PanelKind::Risks => Some(Resource::Risks),
            PanelKind::Stakeholders => Some(Resource::Stakeholders),
            PanelKind::Wbs => Some(Resource::Wbs),
            PanelKind::Tasks => Some(Resource::Tasks),
            PanelKind::CommsPlan => None,
            PanelKind::Changes => Some(Resource::Changes),
            PanelKind::Meetings => Some(Resource::Meetings),
            PanelKind::Lessons => Some(Resource::Lessons),
        }
    }

    /// The phase whose tab shows this panel.
    pub fn phase(self) -> Phase {
        Phase::ALL
            .into_iter()
            .find(|phase| phase.panels().contains(&self))
            .unwrap_or(Phase::Initiation)
    }

    pub fn title(self) -> &'static str {
        match self.resource() {
            Some(resource) => resource.title(),
            None => "Communications Plan",
        }
    }
}

/// Panels to mount for a tab. Unknown tab names and a missing active project
/// both mount nothing.
pub fn route(tab: &str, project: Option<&ProjectContext>) -> &'static [PanelKind] {
    match (Phase::from_name(tab), project) {
        (Some(phase), Some(_)) => phase.panels(),
        _ => &[],
    }
}
