use clap::{Args, Parser, Subcommand};

use crate::model::FormValues;

#[derive(Parser)]
#[command(name = "pb", about = concat!("phaseboard v", env!("CARGO_PKG_VERSION"), " - project lifecycle artifacts in the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// API base URL (overrides the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub api: Option<String>,

    /// Project id to act on (default: the first project)
    #[arg(short = 'p', long, global = true, value_name = "ID")]
    pub project: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects, or create one
    Projects(ProjectsCmd),
    /// Show the project charter, or replace it
    Charter(CharterCmd),
    /// Risk register
    Risks(RisksCmd),
    /// Stakeholder register
    Stakeholders(StakeholdersCmd),
    /// Work breakdown structure
    Wbs(WbsCmd),
    /// Schedule
    Tasks(TasksCmd),
    /// Change requests
    Changes(ChangesCmd),
    /// Meetings and minutes
    Meetings(MeetingsCmd),
    /// Lessons learned
    Lessons(LessonsCmd),
    /// Show every panel of a phase (Initiation, Planning, Execution, Closure)
    Phase(PhaseArgs),
    /// Show or edit the config file
    Config(ConfigCmd),
}

/// Flags that become a form submission
pub trait FormArgs {
    fn to_form(&self) -> FormValues;
}

fn put(form: &mut FormValues, name: &str, value: &Option<String>) {
    if let Some(v) = value {
        form.set(name, v.as_str());
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectsCmd {
    #[command(subcommand)]
    pub action: Option<ProjectsAction>,
}

#[derive(Subcommand)]
pub enum ProjectsAction {
    /// Create a project (it does not become the default)
    Add(ProjectAddArgs),
}

#[derive(Args)]
pub struct ProjectAddArgs {
    /// Project name
    pub name: String,
    #[arg(long)]
    pub sponsor: Option<String>,
    /// Project manager
    #[arg(long)]
    pub manager: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    /// Required date (YYYY-MM-DD)
    #[arg(long)]
    pub required_date: Option<String>,
}

impl FormArgs for ProjectAddArgs {
    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        form.set("name", self.name.as_str());
        put(&mut form, "sponsor", &self.sponsor);
        put(&mut form, "manager", &self.manager);
        put(&mut form, "priority", &self.priority);
        put(&mut form, "required_date", &self.required_date);
        form
    }
}

// ---------------------------------------------------------------------------
// Charter
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct CharterCmd {
    #[command(subcommand)]
    pub action: Option<CharterAction>,
}

#[derive(Subcommand)]
pub enum CharterAction {
    /// Replace the charter; fields not given keep their current value
    Set(CharterSetArgs),
}

#[derive(Args)]
pub struct CharterSetArgs {
    #[arg(long)]
    pub business_need: Option<String>,
    #[arg(long)]
    pub product_description: Option<String>,
    /// JSON array, e.g. '["Ship v1"]'
    #[arg(long, value_name = "JSON")]
    pub goals: Option<String>,
    /// JSON object, e.g. '{"budget": "50k"}'
    #[arg(long, value_name = "JSON")]
    pub constraints: Option<String>,
    /// JSON array of names
    #[arg(long, value_name = "JSON")]
    pub approvers: Option<String>,
    /// Mark signed off (--signed-off=false to clear)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub signed_off: Option<bool>,
}

impl CharterSetArgs {
    /// Overlay the given flags on the current charter form.
    pub fn apply_to(&self, form: &mut FormValues) {
        put(form, "business_need", &self.business_need);
        put(form, "product_description", &self.product_description);
        put(form, "goals", &self.goals);
        put(form, "constraints", &self.constraints);
        put(form, "approvers", &self.approvers);
        if let Some(signed) = self.signed_off {
            form.set_checked("signed_off", signed);
        }
    }
}

// ---------------------------------------------------------------------------
// Project-scoped lists
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RisksCmd {
    #[command(subcommand)]
    pub action: Option<RisksAction>,
}

#[derive(Subcommand)]
pub enum RisksAction {
    /// Add a risk
    Add(RiskAddArgs),
}

#[derive(Args)]
pub struct RiskAddArgs {
    pub title: String,
    #[arg(long)]
    pub trigger: Option<String>,
    #[arg(long)]
    pub mitigation: Option<String>,
    #[arg(long)]
    pub owner: Option<String>,
    /// 1-5
    #[arg(long, default_value = "1")]
    pub probability: String,
    /// 1-5
    #[arg(long, default_value = "1")]
    pub impact: String,
}

impl FormArgs for RiskAddArgs {
    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        form.set("title", self.title.as_str());
        put(&mut form, "trigger", &self.trigger);
        put(&mut form, "mitigation", &self.mitigation);
        put(&mut form, "owner", &self.owner);
        form.set("probability", self.probability.as_str());
        form.set("impact", self.impact.as_str());
        form
    }
}

#[derive(Args)]
pub struct StakeholdersCmd {
    #[command(subcommand)]
    pub action: Option<StakeholdersAction>,
}

#[derive(Subcommand)]
pub enum StakeholdersAction {
    /// Add a stakeholder
    Add(StakeholderAddArgs),
}

#[derive(Args)]
pub struct StakeholderAddArgs {
    pub name: String,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub influence: Option<String>,
    #[arg(long)]
    pub information_needs: Option<String>,
}

impl FormArgs for StakeholderAddArgs {
    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        form.set("name", self.name.as_str());
        put(&mut form, "role", &self.role);
        put(&mut form, "influence", &self.influence);
        put(&mut form, "information_needs", &self.information_needs);
        form
    }
}

#[derive(Args)]
pub struct WbsCmd {
    #[command(subcommand)]
    pub action: Option<WbsAction>,
}

#[derive(Subcommand)]
pub enum WbsAction {
    /// Add a deliverable
    Add(WbsAddArgs),
}

#[derive(Args)]
pub struct WbsAddArgs {
    pub title: String,
}

impl FormArgs for WbsAddArgs {
    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        form.set("title", self.title.as_str());
        form
    }
}

#[derive(Args)]
pub struct TasksCmd {
    #[command(subcommand)]
    pub action: Option<TasksAction>,
}

#[derive(Subcommand)]
pub enum TasksAction {
    /// Add a task
    Add(TaskAddArgs),
}

#[derive(Args)]
pub struct TaskAddArgs {
    #[arg(long)]
    pub assignee: Option<String>,
    #[arg(long)]
    pub effort_days: Option<String>,
    #[arg(long)]
    pub duration_days: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub end_date: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

impl FormArgs for TaskAddArgs {
    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        put(&mut form, "assignee", &self.assignee);
        put(&mut form, "effort_days", &self.effort_days);
        put(&mut form, "duration_days", &self.duration_days);
        put(&mut form, "start_date", &self.start_date);
        put(&mut form, "end_date", &self.end_date);
        put(&mut form, "status", &self.status);
        form
    }
}

#[derive(Args)]
pub struct ChangesCmd {
    #[command(subcommand)]
    pub action: Option<ChangesAction>,
}

#[derive(Subcommand)]
pub enum ChangesAction {
    /// Raise a change request
    Add(ChangeAddArgs),
}

#[derive(Args)]
pub struct ChangeAddArgs {
    pub title: String,
    #[arg(long)]
    pub requested_by: Option<String>,
    /// scope, time, cost, ...
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,
    /// JSON object, e.g. '{"days": 5}'
    #[arg(long, value_name = "JSON")]
    pub impact: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

impl FormArgs for ChangeAddArgs {
    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        form.set("title", self.title.as_str());
        put(&mut form, "requested_by", &self.requested_by);
        put(&mut form, "type", &self.kind);
        put(&mut form, "impact", &self.impact);
        put(&mut form, "description", &self.description);
        form
    }
}

#[derive(Args)]
pub struct MeetingsCmd {
    #[command(subcommand)]
    pub action: Option<MeetingsAction>,
}

#[derive(Subcommand)]
pub enum MeetingsAction {
    /// Schedule a meeting
    Add(MeetingAddArgs),
}

#[derive(Args)]
pub struct MeetingAddArgs {
    /// Meeting type (status, sponsor, ...)
    #[arg(value_name = "TYPE")]
    pub kind: String,
    /// e.g. 2025-03-01T09:30
    #[arg(long)]
    pub scheduled_at: Option<String>,
    #[arg(long)]
    pub duration_mins: Option<String>,
    /// Comma-separated names
    #[arg(long)]
    pub attendees: Option<String>,
    #[arg(long)]
    pub agenda: Option<String>,
}

impl FormArgs for MeetingAddArgs {
    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        form.set("type", self.kind.as_str());
        put(&mut form, "scheduled_at", &self.scheduled_at);
        put(&mut form, "duration_mins", &self.duration_mins);
        put(&mut form, "attendees", &self.attendees);
        put(&mut form, "agenda", &self.agenda);
        form
    }
}

#[derive(Args)]
pub struct LessonsCmd {
    #[command(subcommand)]
    pub action: Option<LessonsAction>,
}

#[derive(Subcommand)]
pub enum LessonsAction {
    /// Record a lesson
    Add(LessonAddArgs),
}

#[derive(Args)]
pub struct LessonAddArgs {
    pub category: String,
    #[arg(long)]
    pub went_well: Option<String>,
    #[arg(long)]
    pub improve: Option<String>,
    #[arg(long)]
    pub actions: Option<String>,
}

impl FormArgs for LessonAddArgs {
    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        form.set("category", self.category.as_str());
        put(&mut form, "went_well", &self.went_well);
        put(&mut form, "improve", &self.improve);
        put(&mut form, "actions", &self.actions);
        form
    }
}

// ---------------------------------------------------------------------------
// Phase and config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct PhaseArgs {
    /// Phase name; an unknown name shows nothing
    pub name: String,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Set a key, e.g. `pb config set api.base_url http://pm:4000/api`
    Set {
        key: String,
        value: String,
    },
    /// Print the config file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn risk_flags_become_form_fields() {
        let cli = Cli::try_parse_from([
            "pb",
            "risks",
            "add",
            "Vendor delay",
            "--probability",
            "2",
            "--impact",
            "5",
        ])
        .unwrap();
        let Some(Commands::Risks(RisksCmd {
            action: Some(RisksAction::Add(args)),
        })) = cli.command
        else {
            panic!("expected risks add");
        };
        let form = args.to_form();
        assert_eq!(form.get("title"), Some("Vendor delay"));
        assert_eq!(form.get("probability"), Some("2"));
        assert_eq!(form.get("owner"), None);
    }

    #[test]
    fn signed_off_flag_without_value_means_true() {
        let cli = Cli::try_parse_from(["pb", "charter", "set", "--signed-off"]).unwrap();
        let Some(Commands::Charter(CharterCmd {
            action: Some(CharterAction::Set(args)),
        })) = cli.command
        else {
            panic!("expected charter set");
        };
        assert_eq!(args.signed_off, Some(true));
        let mut form = FormValues::new();
        form.set_checked("signed_off", false);
        args.apply_to(&mut form);
        assert!(form.is_checked("signed_off"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pb", "tasks", "--json", "--project", "7"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.project.as_deref(), Some("7"));
    }
}
