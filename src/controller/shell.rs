use log::{debug, info, warn};

use super::panel::Panel;
use super::router::{self, Phase};
use super::{Completion, Effects, FetchKey, ProjectContext, Purpose, Request, Ticket};
use crate::api::{self, Method};
use crate::model::{FormError, FormInput, FormValues, Project, ProjectInput, RecordId};

/// Top-level UI state: the project list, the active project, the active tab
/// and the panels the router mounted for them.
///
/// The first project becomes active once the list loads, but only while no
/// project is active; later reloads never move the selection.
#[derive(Debug)]
pub struct Shell {
    projects: Vec<Project>,
    loaded: bool,
    error: Option<String>,
    pending_load: Option<u64>,
    pending_create: Option<u64>,
    draft: FormValues,
    active: Option<Project>,
    tab: String,
    panels: Vec<Panel>,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Shell {
            projects: Vec::new(),
            loaded: false,
            error: None,
            pending_load: None,
            pending_create: None,
            draft: FormValues::blank(ProjectInput::FIELDS),
            active: None,
            tab: Phase::Initiation.name().to_string(),
            panels: Vec::new(),
        }
    }

    /// A shell that starts on `tab`. Starting on a tab the router does not
    /// know defers all panel loads until a phase is chosen.
    pub fn with_tab(tab: &str) -> Self {
        Shell {
            tab: tab.to_string(),
            ..Shell::new()
        }
    }

    /// Initial work on start-up.
    pub fn activate(&mut self) -> Effects {
        Effects::request(self.load_projects())
    }

    pub fn load_projects(&mut self) -> Request {
        let ticket = Ticket::new(FetchKey::Projects, Purpose::Load);
        self.pending_load = Some(ticket.seq);
        Request::get(ticket, api::projects_path())
    }

    pub fn create_project(&mut self, input: &ProjectInput) -> Result<Request, FormError> {
        let ticket = Ticket::new(FetchKey::Projects, Purpose::Add);
        let seq = ticket.seq;
        let request = Request::with_body(ticket, Method::Post, api::projects_path(), input)?;
        self.pending_create = Some(seq);
        Ok(request)
    }

    /// Create a project from the "New project" draft.
    pub fn submit_project(&mut self) -> Result<Request, FormError> {
        let input = ProjectInput::from_form(&self.draft)
            .inspect_err(|e| warn!("project form rejected: {}", e))?;
        self.create_project(&input)
    }

    /// Make the project with `id` active, remounting every panel for it.
    /// Unknown ids and the already-active project change nothing.
    pub fn select_project(&mut self, id: &RecordId) -> Effects {
        if self.active.as_ref().is_some_and(|p| &p.id == id) {
            return Effects::none();
        }
        let Some(project) = self.projects.iter().find(|p| &p.id == id).cloned() else {
            return Effects::none();
        };
        info!("active project {} ({})", project.id, project.name);
        let mut effects = self.unmount();
        self.active = Some(project);
        effects.extend(self.mount());
        effects
    }

    /// Switch tabs. Any name is accepted; one the router does not know
    /// simply mounts nothing.
    pub fn set_tab(&mut self, tab: &str) -> Effects {
        if self.tab == tab {
            return Effects::none();
        }
        let mut effects = self.unmount();
        self.tab = tab.to_string();
        effects.extend(self.mount());
        effects
    }

    pub fn set_phase(&mut self, phase: Phase) -> Effects {
        self.set_tab(phase.name())
    }

    fn unmount(&mut self) -> Effects {
        let cancel: Vec<FetchKey> = self.panels.drain(..).filter_map(|p| p.key()).collect();
        if !cancel.is_empty() {
            debug!("unmount {} panel(s)", cancel.len());
        }
        Effects {
            cancel,
            requests: Vec::new(),
        }
    }

    fn mount(&mut self) -> Effects {
        let mut effects = Effects::none();
        let Some(ctx) = self.context() else {
            return effects;
        };
        for &kind in router::route(&self.tab, Some(&ctx)) {
            let (panel, request) = Panel::mount(kind, &ctx);
            self.panels.push(panel);
            effects.requests.extend(request);
        }
        effects
    }

    /// Feed a finished request back into whichever component owns it.
    pub fn apply(&mut self, completion: Completion) -> Effects {
        if completion.ticket.key == FetchKey::Projects {
            return self.apply_projects(completion);
        }
        let key = completion.ticket.key.clone();
        match self.panels.iter_mut().find(|p| p.key().as_ref() == Some(&key)) {
            Some(panel) => panel.apply(completion).into(),
            None => {
                debug!("drop completion for unmounted {:?}", key);
                Effects::none()
            }
        }
    }

    fn apply_projects(&mut self, completion: Completion) -> Effects {
        let seq = completion.ticket.seq;
        match completion.ticket.purpose {
            Purpose::Load => {
                if self.pending_load != Some(seq) {
                    return Effects::none();
                }
                self.pending_load = None;
                self.loaded = true;
                let path = api::projects_path();
                match completion
                    .result
                    .and_then(|body| api::decode::<Vec<Project>>(&path, body))
                {
                    Ok(projects) => {
                        self.projects = projects;
                        self.error = None;
                        self.refresh_active();
                    }
                    Err(e) => {
                        warn!("load projects failed: {}", e);
                        self.error = Some(e.to_string());
                        return Effects::none();
                    }
                }
                let default = match (&self.active, self.projects.first()) {
                    (None, Some(first)) => Some(first.id.clone()),
                    _ => None,
                };
                match default {
                    Some(id) => self.select_project(&id),
                    None => Effects::none(),
                }
            }
            Purpose::Add => {
                if self.pending_create != Some(seq) {
                    return Effects::none();
                }
                self.pending_create = None;
                match completion.result {
                    Ok(_) => {
                        self.draft = FormValues::blank(ProjectInput::FIELDS);
                        self.error = None;
                        Effects::request(self.load_projects())
                    }
                    Err(e) => {
                        warn!("create project failed: {}", e);
                        self.error = Some(e.to_string());
                        Effects::none()
                    }
                }
            }
            Purpose::Save => Effects::none(),
        }
    }

    /// Keep the held active project in step with the reloaded list without
    /// remounting; the panels only depend on the id.
    fn refresh_active(&mut self) {
        let Some(active) = &self.active else { return };
        if let Some(fresh) = self.projects.iter().find(|p| p.id == active.id) {
            self.active = Some(fresh.clone());
        }
    }

    /// Reload every mounted panel.
    pub fn reload_panels(&mut self) -> Effects {
        let mut effects = Effects::none();
        for panel in &mut self.panels {
            effects.requests.extend(panel.reload());
        }
        effects
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn projects_loading(&self) -> bool {
        !self.loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A project create is in flight.
    pub fn is_creating(&self) -> bool {
        self.pending_create.is_some()
    }

    pub fn active(&self) -> Option<&Project> {
        self.active.as_ref()
    }

    pub fn context(&self) -> Option<ProjectContext> {
        self.active.as_ref().map(ProjectContext::from)
    }

    pub fn tab(&self) -> &str {
        &self.tab
    }

    pub fn phase(&self) -> Option<Phase> {
        Phase::from_name(&self.tab)
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel_mut(&mut self, index: usize) -> Option<&mut Panel> {
        self.panels.get_mut(index)
    }

    pub fn project_draft(&self) -> &FormValues {
        &self.draft
    }

    pub fn project_draft_mut(&mut self) -> &mut FormValues {
        &mut self.draft
    }
}
