use super::charter::CharterPanel;
use super::resource_list::ResourceList;
use super::router::PanelKind;
use super::{Completion, FetchKey, ProjectContext, Request};
use crate::model::{
    ChangeRequest, CharterInput, FieldSpec, FormError, FormInput, FormValues, Lesson, ListRecord,
    Meeting, Risk, Stakeholder, Task, WbsItem,
};

/// Body of the Communications-plan placeholder panel.
pub const COMMS_PLAN_TEXT: [&str; 2] = [
    "Map stakeholders to channels & frequency (e.g., Sponsor \u{2192} weekly 15-min; \
     Team \u{2192} 30-min standup; Board \u{2192} milestone chart).",
    "(A comms API could live beside stakeholders at /projects/{id}/comms.)",
];

/// One mounted panel of the phase view
#[derive(Debug)]
pub enum Panel {
    Charter(CharterPanel),
    Risks(ResourceList<Risk>),
    Stakeholders(ResourceList<Stakeholder>),
    Wbs(ResourceList<WbsItem>),
    Tasks(ResourceList<Task>),
    CommsPlan,
    Changes(ResourceList<ChangeRequest>),
    Meetings(ResourceList<Meeting>),
    Lessons(ResourceList<Lesson>),
}

/// Operations shared by every panel that talks to the backend.
pub trait PanelController {
    fn key(&self) -> FetchKey;
    fn load(&mut self) -> Request;
    fn submit(&mut self) -> Result<Request, FormError>;
    fn apply(&mut self, completion: Completion) -> Option<Request>;
    fn fields(&self) -> &'static [FieldSpec];
    fn draft(&self) -> &FormValues;
    fn draft_mut(&mut self) -> &mut FormValues;
    fn error(&self) -> Option<&str>;
    fn is_loading(&self) -> bool;
    fn is_busy(&self) -> bool;
}

impl<T: ListRecord> PanelController for ResourceList<T> {
    fn key(&self) -> FetchKey {
        ResourceList::key(self)
    }
    fn load(&mut self) -> Request {
        ResourceList::load(self)
    }
    fn submit(&mut self) -> Result<Request, FormError> {
        ResourceList::submit(self)
    }
    fn apply(&mut self, completion: Completion) -> Option<Request> {
        ResourceList::apply(self, completion)
    }
    fn fields(&self) -> &'static [FieldSpec] {
        T::Input::FIELDS
    }
    fn draft(&self) -> &FormValues {
        ResourceList::draft(self)
    }
    fn draft_mut(&mut self) -> &mut FormValues {
        ResourceList::draft_mut(self)
    }
    fn error(&self) -> Option<&str> {
        ResourceList::error(self)
    }
    fn is_loading(&self) -> bool {
        ResourceList::is_loading(self)
    }
    fn is_busy(&self) -> bool {
        ResourceList::is_busy(self)
    }
}

impl PanelController for CharterPanel {
    fn key(&self) -> FetchKey {
        CharterPanel::key(self)
    }
    fn load(&mut self) -> Request {
        CharterPanel::load(self)
    }
    fn submit(&mut self) -> Result<Request, FormError> {
        CharterPanel::submit(self)
    }
    fn apply(&mut self, completion: Completion) -> Option<Request> {
        CharterPanel::apply(self, completion)
    }
    fn fields(&self) -> &'static [FieldSpec] {
        CharterInput::FIELDS
    }
    fn draft(&self) -> &FormValues {
        CharterPanel::draft(self)
    }
    fn draft_mut(&mut self) -> &mut FormValues {
        CharterPanel::draft_mut(self)
    }
    fn error(&self) -> Option<&str> {
        CharterPanel::error(self)
    }
    fn is_loading(&self) -> bool {
        CharterPanel::is_loading(self)
    }
    fn is_busy(&self) -> bool {
        CharterPanel::is_busy(self)
    }
}

impl Panel {
    /// Create the panel for `kind` and its initial load request.
    pub fn mount(kind: PanelKind, ctx: &ProjectContext) -> (Panel, Option<Request>) {
        let ctx = ctx.clone();
        let mut panel = match kind {
            PanelKind::Charter => Panel::Charter(CharterPanel::new(ctx)),
            PanelKind::Risks => Panel::Risks(ResourceList::new(ctx)),
            PanelKind::Stakeholders => Panel::Stakeholders(ResourceList::new(ctx)),
            PanelKind::Wbs => Panel::Wbs(ResourceList::new(ctx)),
            PanelKind::Tasks => Panel::Tasks(ResourceList::new(ctx)),
            PanelKind::CommsPlan => Panel::CommsPlan,
            PanelKind::Changes => Panel::Changes(ResourceList::new(ctx)),
            PanelKind::Meetings => Panel::Meetings(ResourceList::new(ctx)),
            PanelKind::Lessons => Panel::Lessons(ResourceList::new(ctx)),
        };
        let request = panel.controller_mut().map(|c| c.load());
        (panel, request)
    }

    pub fn kind(&self) -> PanelKind {
        match self {
            Panel::Charter(_) => PanelKind::Charter,
            Panel::Risks(_) => PanelKind::Risks,
            Panel::Stakeholders(_) => PanelKind::Stakeholders,
            Panel::Wbs(_) => PanelKind::Wbs,
            Panel::Tasks(_) => PanelKind::Tasks,
            Panel::CommsPlan => PanelKind::CommsPlan,
            Panel::Changes(_) => PanelKind::Changes,
            Panel::Meetings(_) => PanelKind::Meetings,
            Panel::Lessons(_) => PanelKind::Lessons,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind().title()
    }

    pub fn controller(&self) -> Option<&dyn PanelController> {
        match self {
            Panel::Charter(p) => Some(p),
            Panel::Risks(p) => Some(p),
            Panel::Stakeholders(p) => Some(p),
            Panel::Wbs(p) => Some(p),
            Panel::Tasks(p) => Some(p),
            Panel::CommsPlan => None,
            Panel::Changes(p) => Some(p),
            Panel::Meetings(p) => Some(p),
            Panel::Lessons(p) => Some(p),
        }
    }

    pub fn controller_mut(&mut self) -> Option<&mut dyn PanelController> {
        match self {
            Panel::Charter(p) => Some(p),
            Panel::Risks(p) => Some(p),
            Panel::Stakeholders(p) => Some(p),
            Panel::Wbs(p) => Some(p),
            Panel::Tasks(p) => Some(p),
            Panel::CommsPlan => None,
            Panel::Changes(p) => Some(p),
            Panel::Meetings(p) => Some(p),
            Panel::Lessons(p) => Some(p),
        }
    }

    pub fn key(&self) -> Option<FetchKey> {
        self.controller().map(|c| c.key())
    }

    /// Route a completion to this panel if it is addressed here.
    pub fn apply(&mut self, completion: Completion) -> Option<Request> {
        let controller = self.controller_mut()?;
        if controller.key() != completion.ticket.key {
            return None;
        }
        controller.apply(completion)
    }

    pub fn reload(&mut self) -> Option<Request> {
        self.controller_mut().map(|c| c.load())
    }

    /// Submit the panel's draft. `Ok(None)` for panels without a form.
    pub fn submit(&mut self) -> Result<Option<Request>, FormError> {
        match self.controller_mut() {
            Some(c) => c.submit().map(Some),
            None => Ok(None),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.controller().and_then(|c| c.error())
    }

    pub fn is_loading(&self) -> bool {
        self.controller().is_some_and(|c| c.is_loading())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecordId, Resource};

    fn ctx() -> ProjectContext {
        ProjectContext {
            id: RecordId::from(5),
            name: "Atlas".into(),
        }
    }

    #[test]
    fn mounting_issues_initial_load() {
        let (panel, request) = Panel::mount(PanelKind::Tasks, &ctx());
        assert_eq!(panel.kind(), PanelKind::Tasks);
        assert!(panel.is_loading());
        let request = request.unwrap();
        assert_eq!(request.path, "/projects/5/tasks");
        assert_eq!(
            request.ticket.key,
            FetchKey::resource(&RecordId::from(5), Resource::Tasks)
        );
    }

    #[test]
    fn comms_plan_is_static() {
        let (mut panel, request) = Panel::mount(PanelKind::CommsPlan, &ctx());
        assert!(request.is_none());
        assert!(panel.key().is_none());
        assert!(!panel.is_loading());
        assert!(matches!(panel.submit(), Ok(None)));
    }

    #[test]
    fn fields_follow_resource() {
        let (panel, _) = Panel::mount(PanelKind::Meetings, &ctx());
        let names: Vec<&str> = panel
            .controller()
            .unwrap()
            .fields()
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            vec!["type", "scheduled_at", "duration_mins", "attendees", "agenda"]
        );
    }
}
