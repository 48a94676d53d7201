use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tb", about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - tasks, labels and modules on a local board"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,

    /// Log debug output (overridden by TB_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new board in the current directory
    Init(InitArgs),
    /// Create a task
    Add(AddArgs),
    /// Change fields of an existing task
    Edit(EditArgs),
    /// List tasks
    List(ListArgs),
    /// Show task details
    Show(IdArg),
    /// Delete a task (and remove it from every module)
    Rm(IdArg),
    /// List or manage labels
    Label(LabelCmd),
    /// List or manage statuses
    Status(StatusCmd),
    /// List or manage modules
    Module(ModuleCmd),
    /// Validate store integrity
    Check,
    /// View the recovery log
    Recovery(RecoveryArgs),
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Project name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Initial status (repeatable, first is the default; default: todo, in-progress, done)
    #[arg(long = "status")]
    pub statuses: Vec<String>,
    /// Task ID prefix (default: T)
    #[arg(long)]
    pub prefix: Option<String>,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Task description
    #[arg(long)]
    pub desc: Option<String>,
    /// Status (default: from project.toml)
    #[arg(long)]
    pub status: Option<String>,
    /// Due date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub due: Option<String>,
    /// Attach a label from the catalog (repeatable)
    #[arg(long)]
    pub label: Vec<String>,
    /// Link the new task into this module (at the top)
    #[arg(long)]
    pub module: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long)]
    pub desc: Option<String>,
    /// New status
    #[arg(long)]
    pub status: Option<String>,
    /// New due date (YYYY-MM-DD or RFC 3339)
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
    /// Attach a label from the catalog (repeatable)
    #[arg(long)]
    pub label: Vec<String>,
    /// Detach a label (repeatable)
    #[arg(long)]
    pub unlabel: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by label title
    #[arg(long)]
    pub label: Option<String>,
    /// Only tasks in this module, in module order
    #[arg(long)]
    pub module: Option<String>,
    /// Regex matched against ID, title, description and labels
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: String,
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LabelCmd {
    #[command(subcommand)]
    pub action: Option<LabelAction>,
}

#[derive(Subcommand)]
pub enum LabelAction {
    /// List labels (default)
    List,
    /// Add a label to the catalog
    Add(LabelAddArgs),
    /// Remove a label and detach it from every task
    Rm(TitleArg),
}

#[derive(Args)]
pub struct LabelAddArgs {
    /// Label title
    pub title: String,
    /// Display color (#RRGGBB)
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Args)]
pub struct TitleArg {
    pub title: String,
}

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct StatusCmd {
    #[command(subcommand)]
    pub action: Option<StatusAction>,
}

#[derive(Subcommand)]
pub enum StatusAction {
    /// List statuses (default)
    List,
    /// Add a status
    Add(StatusAddArgs),
    /// Remove a status no task uses
    Rm(NameArg),
    /// Set the status preselected for new tasks
    Default(NameArg),
}

#[derive(Args)]
pub struct StatusAddArgs {
    /// Status name
    pub name: String,
    /// Display color (#RRGGBB)
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Args)]
pub struct NameArg {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Modules
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ModuleCmd {
    #[command(subcommand)]
    pub action: Option<ModuleAction>,
}

#[derive(Subcommand)]
pub enum ModuleAction {
    /// List modules (default)
    List,
    /// Create a module
    Add(ModuleAddArgs),
    /// Show a module and its tasks
    Show(ModuleIdArg),
    /// Link a task into a module (at the top)
    Link(ModuleTaskArgs),
    /// Remove a task from a module
    Unlink(ModuleTaskArgs),
    /// Delete a module (its tasks are kept)
    Rm(ModuleIdArg),
}

#[derive(Args)]
pub struct ModuleAddArgs {
    /// Module ID (lowercase with hyphens)
    pub id: String,
    /// Module title
    pub title: String,
}

#[derive(Args)]
pub struct ModuleIdArg {
    /// Module ID
    pub id: String,
}

#[derive(Args)]
pub struct ModuleTaskArgs {
    /// Module ID
    pub module: String,
    /// Task ID
    pub task: String,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryArgs {
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Print the path to the recovery log instead
    #[arg(long)]
    pub path: bool,
}
