pub mod change;
pub mod charter;
pub mod config;
pub mod form;
pub mod id;
pub mod lenient;
pub mod lesson;
pub mod meeting;
pub mod project;
pub mod risk;
pub mod stakeholder;
pub mod task;
pub mod wbs;

pub use change::*;
pub use charter::*;
pub use config::*;
pub use form::*;
pub use id::*;
pub use lesson::*;
pub use meeting::*;
pub use project::*;
pub use risk::*;
pub use stakeholder::*;
pub use task::*;
pub use wbs::*;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A collection nested under a project (`/projects/{id}/{segment}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Charter,
    Risks,
    Stakeholders,
    Wbs,
    Tasks,
    Changes,
    Meetings,
    Lessons,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Charter,
        Resource::Risks,
        Resource::Stakeholders,
        Resource::Wbs,
        Resource::Tasks,
        Resource::Changes,
        Resource::Meetings,
        Resource::Lessons,
    ];

    /// Path segment under `/projects/{id}/`
    pub fn segment(self) -> &'static str {
        match self {
            Resource::Charter => "charter",
            Resource::Risks => "risks",
            Resource::Stakeholders => "stakeholders",
            Resource::Wbs => "wbs",
            Resource::Tasks => "tasks",
            Resource::Changes => "changes",
            Resource::Meetings => "meetings",
            Resource::Lessons => "lessons",
        }
    }

    pub fn from_segment(s: &str) -> Option<Resource> {
        Resource::ALL.into_iter().find(|r| r.segment() == s)
    }

    /// Panel heading
    pub fn title(self) -> &'static str {
        match self {
            Resource::Charter => "Project Charter",
            Resource::Risks => "Risk Register",
            Resource::Stakeholders => "Stakeholders",
            Resource::Wbs => "WBS & Completion Criteria",
            Resource::Tasks => "Schedule (Tasks)",
            Resource::Changes => "Change Requests",
            Resource::Meetings => "Meetings & Minutes",
            Resource::Lessons => "Lessons Learned",
        }
    }
}

/// A record held in a project-scoped list, tied to its payload type.
pub trait ListRecord: DeserializeOwned + Serialize + Clone {
    type Input: FormInput;
    const RESOURCE: Resource;
}

impl ListRecord for Risk {
    type Input = RiskInput;
    const RESOURCE: Resource = Resource::Risks;
}

impl ListRecord for Stakeholder {
    type Input = StakeholderInput;
    const RESOURCE: Resource = Resource::Stakeholders;
}

impl ListRecord for WbsItem {
    type Input = WbsInput;
    const RESOURCE: Resource = Resource::Wbs;
}

impl ListRecord for Task {
    type Input = TaskInput;
    const RESOURCE: Resource = Resource::Tasks;
}

impl ListRecord for ChangeRequest {
    type Input = ChangeInput;
    const RESOURCE: Resource = Resource::Changes;
}

impl ListRecord for Meeting {
    type Input = MeetingInput;
    const RESOURCE: Resource = Resource::Meetings;
}

impl ListRecord for Lesson {
    type Input = LessonInput;
    const RESOURCE: Resource = Resource::Lessons;
}
