use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::api::{Backend, HttpBackend};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::controller::dispatch::{Executor, Inline, run_until_idle};
use crate::controller::panel::Panel;
use crate::controller::router::{PanelKind, Phase};
use crate::controller::shell::Shell;
use crate::controller::{Effects, ProjectContext};
use crate::io::config_io;
use crate::model::config::AppConfig;
use crate::model::{FormValues, RecordId};

type CmdResult<T = ()> = Result<T, Box<dyn Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, mut config: AppConfig) -> CmdResult {
    let json = cli.json;
    if let Some(api) = cli.api {
        config.api.base_url = api;
    }
    let Some(command) = cli.command else {
        return Ok(());
    };

    // Commands that never touch the network
    match command {
        Commands::Config(cmd) => return cmd_config(cmd, &config, json),
        Commands::Phase(ref args) if Phase::parse(&args.name).is_none() => return Ok(()),
        _ => {}
    }

    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(
        &config.api.base_url,
        timeout(&config),
    )?);
    let mut session = Session::open(backend)?;
    let project = cli.project.as_deref();

    let out = match command {
        Commands::Projects(cmd) => {
            let add = cmd.action.map(|ProjectsAction::Add(args)| args.to_form());
            session.projects(project, add, json)?
        }
        Commands::Charter(cmd) => {
            let set = cmd.action.map(|CharterAction::Set(args)| args);
            session.charter(project, set.as_ref(), json)?
        }
        Commands::Risks(cmd) => {
            let add = cmd.action.map(|RisksAction::Add(args)| args.to_form());
            session.resource(project, PanelKind::Risks, add, json)?
        }
        Commands::Stakeholders(cmd) => {
            let add = cmd.action.map(|StakeholdersAction::Add(args)| args.to_form());
            session.resource(project, PanelKind::Stakeholders, add, json)?
        }
        Commands::Wbs(cmd) => {
            let add = cmd.action.map(|WbsAction::Add(args)| args.to_form());
            session.resource(project, PanelKind::Wbs, add, json)?
        }
        Commands::Tasks(cmd) => {
            let add = cmd.action.map(|TasksAction::Add(args)| args.to_form());
            session.resource(project, PanelKind::Tasks, add, json)?
        }
        Commands::Changes(cmd) => {
            let add = cmd.action.map(|ChangesAction::Add(args)| args.to_form());
            session.resource(project, PanelKind::Changes, add, json)?
        }
        Commands::Meetings(cmd) => {
            let add = cmd.action.map(|MeetingsAction::Add(args)| args.to_form());
            session.resource(project, PanelKind::Meetings, add, json)?
        }
        Commands::Lessons(cmd) => {
            let add = cmd.action.map(|LessonsAction::Add(args)| args.to_form());
            session.resource(project, PanelKind::Lessons, add, json)?
        }
        Commands::Phase(args) => match Phase::parse(&args.name) {
            Some(phase) => session.phase(project, phase, json)?,
            None => String::new(),
        },
        Commands::Config(_) => String::new(),
    };
    if !out.is_empty() {
        println!("{}", out);
    }
    Ok(())
}

pub(crate) fn timeout(config: &AppConfig) -> Option<Duration> {
    match config.api.timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    }
}

// ---------------------------------------------------------------------------
// Session: the shell driven to completion on the calling thread
// ---------------------------------------------------------------------------

/// One CLI invocation's view of the backend. Uses the same shell and panel
/// controllers as the TUI, with requests run inline.
pub struct Session {
    shell: Shell,
    executor: Inline,
}

impl Session {
    /// Load the project list. Starts on a tab the router does not know, so
    /// nothing else is fetched until a command picks a phase.
    pub fn open(backend: Arc<dyn Backend>) -> CmdResult<Self> {
        let mut session = Session {
            shell: Shell::with_tab(""),
            executor: Inline::new(backend),
        };
        let effects = session.shell.activate();
        session.run(effects);
        if let Some(err) = session.shell.error() {
            return Err(err.into());
        }
        Ok(session)
    }

    fn run(&mut self, effects: Effects) {
        self.executor.execute(effects);
        run_until_idle(&mut self.shell, &mut self.executor);
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Make `id` (or the default project) active.
    fn use_project(&mut self, id: Option<&str>) -> CmdResult<ProjectContext> {
        if let Some(id) = id {
            let id = RecordId::from(id);
            if !self.shell.projects().iter().any(|p| p.id == id) {
                return Err(format!("no project with id {id}").into());
            }
            let effects = self.shell.select_project(&id);
            self.run(effects);
        }
        self.shell
            .context()
            .ok_or_else(|| "no projects yet; create one with `pb projects add <NAME>`".into())
    }

    fn open_phase(&mut self, project: Option<&str>, phase: Phase) -> CmdResult<ProjectContext> {
        let ctx = self.use_project(project)?;
        let effects = self.shell.set_phase(phase);
        self.run(effects);
        Ok(ctx)
    }

    fn panel_index(&self, kind: PanelKind) -> CmdResult<usize> {
        self.shell
            .panels()
            .iter()
            .position(|p| p.kind() == kind)
            .ok_or_else(|| format!("{} is not mounted", kind.title()).into())
    }

    /// Submit `form` through the panel's own draft so it gets the same
    /// blank defaults and coercions as the TUI form.
    fn submit(&mut self, index: usize, form: &FormValues) -> CmdResult {
        let Some(controller) = self
            .shell
            .panel_mut(index)
            .and_then(|p| p.controller_mut())
        else {
            return Ok(());
        };
        let mut draft = FormValues::blank(controller.fields());
        for (name, value) in form.iter() {
            draft.set(name, value);
        }
        *controller.draft_mut() = draft;
        let request = controller.submit()?;
        self.run(Effects::request(request));
        Ok(())
    }

    pub fn projects(
        &mut self,
        project: Option<&str>,
        add: Option<FormValues>,
        json: bool,
    ) -> CmdResult<String> {
        if let Some(form) = add {
            let name = form.text("name");
            *self.shell.project_draft_mut() = form;
            let request = self.shell.submit_project()?;
            self.run(Effects::request(request));
            if let Some(err) = self.shell.error() {
                return Err(err.into());
            }
            info!("created project {}", name);
        }
        if project.is_some() {
            self.use_project(project)?;
        }
        let active = self.shell.active().map(|p| p.id.clone());
        let projects = self.shell.projects();
        if json {
            return Ok(serde_json::to_string_pretty(&projects_json(
                projects,
                active.as_ref(),
            ))?);
        }
        if projects.is_empty() {
            return Ok("(no projects)".to_string());
        }
        Ok(projects
            .iter()
            .map(|p| format_project(p, Some(&p.id) == active.as_ref()))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub fn charter(
        &mut self,
        project: Option<&str>,
        set: Option<&CharterSetArgs>,
        json: bool,
    ) -> CmdResult<String> {
        self.open_phase(project, Phase::Initiation)?;
        let index = self.panel_index(PanelKind::Charter)?;
        if let Some(args) = set {
            let Some(Panel::Charter(panel)) = self.shell.panel_mut(index) else {
                return Err("charter is not mounted".into());
            };
            // Never overwrite a charter we could not read
            if let Some(err) = panel.error() {
                return Err(err.into());
            }
            args.apply_to(panel.draft_mut());
            let request = panel.submit()?;
            self.run(Effects::request(request));
        }
        self.render(index, json)
    }

    pub fn resource(
        &mut self,
        project: Option<&str>,
        kind: PanelKind,
        add: Option<FormValues>,
        json: bool,
    ) -> CmdResult<String> {
        self.open_phase(project, kind.phase())?;
        let index = self.panel_index(kind)?;
        if let Some(form) = add {
            self.submit(index, &form)?;
        }
        self.render(index, json)
    }

    fn render(&self, index: usize, json: bool) -> CmdResult<String> {
        let panel = &self.shell.panels()[index];
        if let Some(err) = panel.error() {
            return Err(err.into());
        }
        if json {
            Ok(serde_json::to_string_pretty(&panel_json(panel))?)
        } else {
            Ok(panel_lines(panel).join("\n"))
        }
    }

    pub fn phase(&mut self, project: Option<&str>, phase: Phase, json: bool) -> CmdResult<String> {
        let ctx = self.open_phase(project, phase)?;
        let panels = self.shell.panels();
        if json {
            let panels: Vec<serde_json::Value> = panels
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "title": p.title(),
                        "error": p.error(),
                        "data": panel_json(p),
                    })
                })
                .collect();
            let out = serde_json::json!({
                "project": { "id": ctx.id, "name": ctx.name },
                "phase": phase.name(),
                "panels": panels,
            });
            return Ok(serde_json::to_string_pretty(&out)?);
        }
        let mut lines = vec![format!("{} \u{2014} {}", ctx.name, phase.name())];
        for panel in panels {
            lines.push(String::new());
            lines.push(format!("== {} ==", panel.title()));
            if let Some(err) = panel.error() {
                lines.push(format!("error: {}", err));
            }
            lines.extend(panel_lines(panel));
        }
        Ok(lines.join("\n"))
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config(cmd: ConfigCmd, config: &AppConfig, json: bool) -> CmdResult {
    match cmd.action {
        None => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                print!("{}", toml::to_string_pretty(config)?);
            }
        }
        Some(ConfigAction::Path) => println!("{}", config_io::config_path().display()),
        Some(ConfigAction::Set { key, value }) => {
            let path = config_io::config_path();
            let (_, mut doc) = config_io::read_config_from(&path)?;
            config_io::set_value(&mut doc, &key, &value)?;
            config_io::write_config_to(&path, &doc)?;
            info!("config {} set in {}", key, path.display());
            println!("{} = {}", key, value.trim());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryBackend;

    fn session_with(names: &[&str]) -> (Arc<MemoryBackend>, Session) {
        let backend = Arc::new(MemoryBackend::new());
        for name in names {
            backend.seed_project(name);
        }
        let session = Session::open(backend.clone()).unwrap();
        (backend, session)
    }

    fn form(pairs: &[(&str, &str)]) -> FormValues {
        pairs.iter().copied().collect()
    }

    #[test]
    fn open_fetches_only_projects() {
        let (backend, session) = session_with(&["Atlas"]);
        assert_eq!(backend.requests(), vec!["GET /projects"]);
        assert_eq!(session.shell().active().unwrap().name, "Atlas");
        assert!(session.shell().panels().is_empty());
    }

    #[test]
    fn add_risk_then_list_shows_exposure() {
        let (_backend, mut session) = session_with(&["Atlas"]);
        let out = session
            .resource(
                None,
                PanelKind::Risks,
                Some(form(&[
                    ("title", "Vendor delay"),
                    ("probability", "2"),
                    ("impact", "5"),
                ])),
                true,
            )
            .unwrap();
        let risks: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(risks[0]["title"], "Vendor delay");
        assert_eq!(risks[0]["exposure"], 10);
    }

    #[test]
    fn bad_scale_sends_nothing() {
        let (backend, mut session) = session_with(&["Atlas"]);
        let err = session
            .resource(
                None,
                PanelKind::Risks,
                Some(form(&[("title", "x"), ("impact", "9")])),
                false,
            )
            .unwrap_err();
        assert!(err.to_string().contains("outside 1-5"));
        assert!(!backend.requests().iter().any(|r| r.starts_with("POST")));
    }

    #[test]
    fn explicit_project_is_used() {
        let (backend, mut session) = session_with(&["Atlas", "Zephyr"]);
        session
            .resource(Some("2"), PanelKind::Lessons, None, false)
            .unwrap();
        assert!(backend.requests().contains(&"GET /projects/2/lessons".to_string()));
        assert!(!backend.requests().contains(&"GET /projects/1/lessons".to_string()));
    }

    #[test]
    fn unknown_project_is_an_error() {
        let (_backend, mut session) = session_with(&["Atlas"]);
        let err = session
            .resource(Some("42"), PanelKind::Tasks, None, false)
            .unwrap_err();
        assert_eq!(err.to_string(), "no project with id 42");
    }

    #[test]
    fn no_projects_is_an_error() {
        let (_backend, mut session) = session_with(&[]);
        assert!(session.resource(None, PanelKind::Wbs, None, false).is_err());
        assert_eq!(session.projects(None, None, false).unwrap(), "(no projects)");
    }

    #[test]
    fn charter_set_keeps_unspecified_fields() {
        let (_backend, mut session) = session_with(&["Atlas"]);
        let first = CharterSetArgs {
            business_need: Some("Faster onboarding".into()),
            product_description: None,
            goals: Some(r#"["Ship v1"]"#.into()),
            constraints: None,
            approvers: None,
            signed_off: None,
        };
        session.charter(None, Some(&first), true).unwrap();
        let second = CharterSetArgs {
            business_need: None,
            product_description: None,
            goals: None,
            constraints: None,
            approvers: Some(r#"["Dana"]"#.into()),
            signed_off: Some(true),
        };
        let out = session.charter(None, Some(&second), true).unwrap();
        let charter: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(charter["business_need"], "Faster onboarding");
        assert_eq!(charter["goals"], serde_json::json!(["Ship v1"]));
        assert_eq!(charter["approvers"], serde_json::json!(["Dana"]));
        assert_eq!(charter["signed_off"], true);
    }

    #[test]
    fn phase_lists_every_panel() {
        let (_backend, mut session) = session_with(&["Atlas"]);
        let out = session.phase(None, Phase::Planning, false).unwrap();
        assert!(out.starts_with("Atlas \u{2014} Planning"));
        assert!(out.contains("== WBS & Completion Criteria =="));
        assert!(out.contains("== Schedule (Tasks) =="));
        assert!(out.contains("== Communications Plan =="));
    }

    #[test]
    fn created_project_is_listed_not_selected() {
        let (_backend, mut session) = session_with(&["Atlas"]);
        let out = session
            .projects(None, Some(form(&[("name", "Zephyr")])), false)
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("*    1  Atlas"));
        assert!(lines[1].starts_with("     2  Zephyr"));
    }
}
