use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{debug, info};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::theme::Theme;
use super::{input, render};
use crate::api::HttpBackend;
use crate::cli::handlers::timeout;
use crate::controller::{Effects, FetchKey};
use crate::controller::dispatch::{Dispatcher, Executor};
use crate::controller::panel::Panel;
use crate::controller::router::{Phase, PanelKind};
use crate::controller::shell::Shell;
use crate::model::{AppConfig, FieldSpec, FormInput, FormValues, ProjectInput};

/// Which column receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Projects,
    /// Index into the shell's mounted panels
    Panel(usize),
}

/// Whose draft the form popup edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Project,
    Panel(usize),
}

/// The open form popup. Field values live in the owning controller's draft,
/// so closing the popup keeps them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub target: FormTarget,
    pub title: String,
    pub fields: &'static [FieldSpec],
    /// Selected field
    pub field: usize,
    /// Byte offset into the selected text field
    pub cursor: usize,
}

impl FormState {
    pub fn selected(&self) -> Option<&FieldSpec> {
        self.fields.get(self.field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// A submitted form whose request has not settled yet
#[derive(Debug, Clone, PartialEq, Eq)]
enum Saving {
    Project,
    Panel(FetchKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

/// Main application state
pub struct App {
    pub shell: Shell,
    executor: Box<dyn Executor>,
    pub theme: Theme,
    /// Shown in the help overlay
    pub api_url: String,
    pub show_key_hints: bool,
    pub focus: Focus,
    /// Row in the project column; row 0 is the "New project" action
    pub project_cursor: usize,
    /// First visible row of the focused panel
    pub panel_scroll: usize,
    pub form: Option<FormState>,
    pub status: Option<StatusMessage>,
    saving: Option<Saving>,
    pub show_help: bool,
    pub should_quit: bool,
}

/// The draft a form target edits, if the target still exists.
pub(super) fn draft_mut(shell: &mut Shell, target: FormTarget) -> Option<&mut FormValues> {
    match target {
        FormTarget::Project => Some(shell.project_draft_mut()),
        FormTarget::Panel(i) => shell
            .panel_mut(i)?
            .controller_mut()
            .map(|c| c.draft_mut()),
    }
}

impl App {
    pub fn new(shell: Shell, executor: Box<dyn Executor>, theme: Theme, api_url: String) -> Self {
        App {
            shell,
            executor,
            theme,
            api_url,
            show_key_hints: false,
            focus: Focus::Projects,
            project_cursor: 0,
            panel_scroll: 0,
            form: None,
            status: None,
            saving: None,
            show_help: false,
            should_quit: false,
        }
    }

    /// Kick off the initial project load.
    pub fn start(&mut self) {
        let effects = self.shell.activate();
        self.execute(effects);
    }

    fn execute(&mut self, effects: Effects) {
        if !effects.is_empty() {
            self.executor.execute(effects);
        }
    }

    /// Feed finished requests into the shell. Returns true when anything
    /// arrived.
    pub fn tick(&mut self) -> bool {
        let completions = self.executor.poll();
        if completions.is_empty() {
            return false;
        }
        for completion in completions {
            let effects = self.shell.apply(completion);
            self.execute(effects);
        }
        self.clamp();
        self.settle_save();
        true
    }

    /// Replace the "Saving…" status once the submitted request is done.
    fn settle_save(&mut self) {
        let outcome = match &self.saving {
            None => return,
            Some(Saving::Project) => {
                if self.shell.is_creating() {
                    return;
                }
                Some(self.shell.error().map(str::to_string))
            }
            Some(Saving::Panel(key)) => {
                let panel = self
                    .shell
                    .panels()
                    .iter()
                    .find_map(|p| p.controller().filter(|c| &c.key() == key));
                match panel {
                    Some(c) if c.is_busy() => return,
                    Some(c) => Some(c.error().map(str::to_string)),
                    // Unmounted while saving
                    None => None,
                }
            }
        };
        self.saving = None;
        match outcome {
            Some(None) => self.set_status("Saved"),
            Some(Some(e)) => self.set_error(format!("Save failed: {e}")),
            None => self.status = None,
        }
    }

    /// Whether any request is still running.
    pub fn is_busy(&self) -> bool {
        !self.executor.is_idle()
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: StatusKind::Info,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: StatusKind::Error,
        });
    }

    /// Keep focus and cursors inside what is currently mounted.
    fn clamp(&mut self) {
        let panels = self.shell.panels().len();
        if let Focus::Panel(i) = self.focus
            && i >= panels
        {
            self.focus = Focus::Projects;
            self.panel_scroll = 0;
        }
        self.project_cursor = self.project_cursor.min(self.shell.projects().len());
        if let Some(FormTarget::Panel(i)) = self.form.as_ref().map(|f| f.target)
            && i >= panels
        {
            self.form = None;
        }
    }

    pub fn focused_panel(&self) -> Option<&Panel> {
        match self.focus {
            Focus::Panel(i) => self.shell.panels().get(i),
            Focus::Projects => None,
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn switch_phase(&mut self, phase: Phase) {
        if self.shell.phase() == Some(phase) {
            return;
        }
        debug!("switch to {}", phase);
        let effects = self.shell.set_phase(phase);
        self.execute(effects);
        if matches!(self.form.as_ref().map(|f| f.target), Some(FormTarget::Panel(_))) {
            self.form = None;
        }
        if matches!(self.focus, Focus::Panel(_)) {
            self.focus = if self.shell.panels().is_empty() {
                Focus::Projects
            } else {
                Focus::Panel(0)
            };
        }
        self.panel_scroll = 0;
    }

    /// Move focus to the next (or previous) column, wrapping around.
    pub fn cycle_focus(&mut self, forward: bool) {
        let panels = self.shell.panels().len();
        // Projects is slot 0, panel i is slot i + 1
        let slots = panels + 1;
        let current = match self.focus {
            Focus::Projects => 0,
            Focus::Panel(i) => i + 1,
        };
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        self.focus = match next {
            0 => Focus::Projects,
            n => Focus::Panel(n - 1),
        };
        self.panel_scroll = 0;
    }

    pub fn move_cursor(&mut self, delta: isize) {
        match self.focus {
            Focus::Projects => {
                let last = self.shell.projects().len();
                self.project_cursor = self.project_cursor.saturating_add_signed(delta).min(last);
            }
            Focus::Panel(i) => {
                let rows = self
                    .shell
                    .panels()
                    .get(i)
                    .map_or(0, render::panels::row_count);
                self.panel_scroll = self
                    .panel_scroll
                    .saturating_add_signed(delta)
                    .min(rows.saturating_sub(1));
            }
        }
    }

    /// Enter: open the New project form, or make the project under the
    /// cursor active.
    pub fn activate_row(&mut self) {
        if self.focus != Focus::Projects {
            return;
        }
        if self.project_cursor == 0 {
            self.open_form();
            return;
        }
        let Some(project) = self.shell.projects().get(self.project_cursor - 1) else {
            return;
        };
        let id = project.id.clone();
        let name = project.name.clone();
        if self.shell.active().is_some_and(|p| p.id == id) {
            return;
        }
        let effects = self.shell.select_project(&id);
        self.execute(effects);
        if matches!(self.form.as_ref().map(|f| f.target), Some(FormTarget::Panel(_))) {
            self.form = None;
        }
        self.panel_scroll = 0;
        self.set_status(format!("Opened {}", name));
    }

    /// `r`: reload whatever has focus.
    pub fn reload_focused(&mut self) {
        let effects = match self.focus {
            Focus::Projects => Effects::request(self.shell.load_projects()),
            Focus::Panel(i) => match self.shell.panel_mut(i).and_then(|p| p.reload()) {
                Some(request) => Effects::request(request),
                None => return,
            },
        };
        self.execute(effects);
    }

    // -----------------------------------------------------------------------
    // Forms
    // -----------------------------------------------------------------------

    /// Open the form for the focused column.
    pub fn open_form(&mut self) {
        let (target, title, fields) = match self.focus {
            Focus::Projects => (
                FormTarget::Project,
                "New project".to_string(),
                ProjectInput::FIELDS,
            ),
            Focus::Panel(i) => {
                let Some(panel) = self.shell.panels().get(i) else {
                    return;
                };
                let Some(controller) = panel.controller() else {
                    let message = format!("{} is read-only", panel.title());
                    self.set_status(message);
                    return;
                };
                let title = if panel.kind() == PanelKind::Charter {
                    "Edit charter".to_string()
                } else {
                    format!("Add to {}", panel.title())
                };
                (FormTarget::Panel(i), title, controller.fields())
            }
        };
        let cursor = fields
            .first()
            .and_then(|spec| {
                let draft = draft_mut(&mut self.shell, target)?;
                draft.get(spec.name).map(str::len)
            })
            .unwrap_or(0);
        self.form = Some(FormState {
            target,
            title,
            fields,
            field: 0,
            cursor,
        });
        self.status = None;
    }

    /// Esc: hide the popup, keep the draft.
    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Ctrl-S: parse the draft and send it. Parse errors keep the form open.
    pub fn submit_form(&mut self) {
        let Some(target) = self.form.as_ref().map(|f| f.target) else {
            return;
        };
        let result = match target {
            FormTarget::Project => self.shell.submit_project().map(Some),
            FormTarget::Panel(i) => match self.shell.panel_mut(i) {
                Some(panel) => panel.submit(),
                None => Ok(None),
            },
        };
        match result {
            Ok(request) => {
                if let Some(request) = request {
                    info!("{} {}", request.method, request.path);
                    self.saving = Some(match target {
                        FormTarget::Project => Saving::Project,
                        FormTarget::Panel(_) => Saving::Panel(request.ticket.key.clone()),
                    });
                    self.execute(Effects::request(request));
                }
                self.form = None;
                self.set_status("Saving\u{2026}");
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }
}

/// Run the TUI against the configured server.
pub fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let backend = HttpBackend::new(&config.api.base_url, timeout(config))?;
    info!("tui start, api {}", backend.base_url());

    let mut app = App::new(
        Shell::new(),
        Box::new(Dispatcher::new(Arc::new(backend))),
        Theme::from_config(&config.ui),
        config.api.base_url.clone(),
    );
    app.show_key_hints = config.ui.show_key_hints;
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("tui exit");

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.tick();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
