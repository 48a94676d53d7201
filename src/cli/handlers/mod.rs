mod init;
pub use init::cmd_init;

use std::path::PathBuf;
use std::sync::Mutex;

/// Global override for project directory (set by -C flag)
static PROJECT_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::form::{DraftEdit, FormContext, TaskForm};
use crate::io::config_io;
use crate::io::lock::FileLock;
use crate::io::project_io::{self, ProjectError};
use crate::io::recovery;
use crate::model::label::Label;
use crate::model::project::Project;
use crate::model::store::Store;
use crate::notify::StderrNotifier;
use crate::ops::{check, label_ops, module_ops, search, status_ops, task_ops};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;

    if let Some(ref dir) = cli.project_dir {
        set_project_dir(dir)?;
    }

    match cli.command {
        None => Err("no command given (run `tb` without arguments for the board)".into()),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args, cli.project_dir.as_deref()),

            // Tasks
            Commands::Add(args) => cmd_add(args, json),
            Commands::Edit(args) => cmd_edit(args, json),
            Commands::List(args) => cmd_list(args, json),
            Commands::Show(args) => cmd_show(args, json),
            Commands::Rm(args) => cmd_rm(args, json),

            // Catalogs
            Commands::Label(cmd) => cmd_label(cmd, json),
            Commands::Status(cmd) => cmd_status(cmd, json),
            Commands::Module(cmd) => cmd_module(cmd, json),

            // Maintenance
            Commands::Check => cmd_check(json),
            Commands::Recovery(args) => cmd_recovery(args, json),
        },
    }
}

/// Resolve and remember the `-C` directory for [`load_project_cwd`].
pub fn set_project_dir(dir: &str) -> CmdResult {
    let abs = std::fs::canonicalize(dir)
        .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
    PROJECT_DIR_OVERRIDE
        .lock()
        .map_err(|_| "project dir lock poisoned")?
        .replace(abs);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn project_start_dir() -> Result<PathBuf, ProjectError> {
    let override_dir = PROJECT_DIR_OVERRIDE
        .lock()
        .ok()
        .and_then(|guard| guard.clone());
    match override_dir {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().map_err(ProjectError::IoError),
    }
}

pub fn load_project_cwd() -> Result<Project, ProjectError> {
    let root = project_io::discover_project(&project_start_dir()?)?;
    project_io::load_project(&root)
}

/// Take the board lock, then read the project under it, so a writer never
/// saves a store another writer has replaced since it was read.
fn lock_and_load() -> Result<(Project, FileLock), Box<dyn std::error::Error>> {
    let root = project_io::discover_project(&project_start_dir()?)?;
    let lock = FileLock::acquire_default(&root.join(project_io::BOARD_DIR))?;
    Ok((project_io::load_project(&root)?, lock))
}

fn save(project: &Project) -> Result<(), ProjectError> {
    project_io::save_store(&project.board_dir, &project.store)
}

fn notifier(json: bool) -> StderrNotifier {
    StderrNotifier { quiet: json }
}

/// Look a label up in the catalog so the task gets its color too
fn catalog_label(store: &Store, title: &str) -> Result<Label, String> {
    store.label(title).cloned().ok_or_else(|| {
        format!(
            "label not found: {} (create it with `tb label add {}`)",
            title, title
        )
    })
}

/// Run a form to completion on the project's store and return the task ID.
fn submit_form(
    project: &mut Project,
    mut form: TaskForm,
    edits: Vec<DraftEdit>,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    for edit in edits {
        form.apply(edit)?;
    }
    let mut toasts = notifier(json);
    let mut ctx = FormContext {
        store: &mut project.store,
        notifier: &mut toasts,
        limits: &project.config.limits,
        id_prefix: &project.config.ids.task_prefix,
    };
    Ok(form.submit(&mut ctx)?)
}

fn print_task(project: &Project, task_id: &str, json: bool) -> CmdResult {
    let task = task_ops::find_task(&project.store, task_id)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&task_to_json(task, &project.store))?
        );
    } else {
        println!("{}", task.id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, json: bool) -> CmdResult {
    let (mut project, _lock) = lock_and_load()?;

    let form = TaskForm::create(project.config.statuses.default.clone(), args.module);
    let mut edits = vec![DraftEdit::Title(args.title)];
    if let Some(desc) = args.desc {
        edits.push(DraftEdit::Description(desc));
    }
    if let Some(status) = args.status {
        edits.push(DraftEdit::Status(status));
    }
    if let Some(due) = args.due {
        edits.push(DraftEdit::DueDate(due));
    }
    for title in &args.label {
        edits.push(DraftEdit::ToggleLabel {
            label: catalog_label(&project.store, title)?,
            checked: true,
        });
    }

    let id = submit_form(&mut project, form, edits, json)?;
    save(&project)?;
    print_task(&project, &id, json)
}

fn cmd_edit(args: EditArgs, json: bool) -> CmdResult {
    let (mut project, _lock) = lock_and_load()?;

    let task = task_ops::find_task(&project.store, &args.id)?.clone();
    let form = TaskForm::edit(task);

    let mut edits = Vec::new();
    if let Some(title) = args.title {
        edits.push(DraftEdit::Title(title));
    }
    if let Some(desc) = args.desc {
        edits.push(DraftEdit::Description(desc));
    }
    if let Some(status) = args.status {
        edits.push(DraftEdit::Status(status));
    }
    if let Some(due) = args.due {
        edits.push(DraftEdit::DueDate(due));
    } else if args.clear_due {
        edits.push(DraftEdit::DueDate(String::new()));
    }
    for title in &args.label {
        edits.push(DraftEdit::ToggleLabel {
            label: catalog_label(&project.store, title)?,
            checked: true,
        });
    }
    for title in args.unlabel {
        edits.push(DraftEdit::ToggleLabel {
            label: Label::new(title),
            checked: false,
        });
    }

    let id = submit_form(&mut project, form, edits, json)?;
    save(&project)?;
    print_task(&project, &id, json)
}

fn cmd_list(args: ListArgs, json: bool) -> CmdResult {
    let project = load_project_cwd()?;
    let store = &project.store;

    if let Some(ref module_id) = args.module
        && store.module(module_id).is_none()
    {
        return Err(format!("module not found: {}", module_id).into());
    }
    let pattern = match args.search.as_deref() {
        Some(p) => Some(
            search::compile_pattern(p).ok_or_else(|| format!("invalid pattern: {}", p))?,
        ),
        None => None,
    };

    let filter = search::TaskFilter {
        status: args.status.as_deref(),
        label: args.label.as_deref(),
        module: args.module.as_deref(),
        pattern: pattern.as_ref(),
    };
    let tasks = search::filter_tasks(store, &filter);

    if json {
        let results: Vec<TaskJson> = tasks.iter().map(|t| task_to_json(t, store)).collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for task in tasks {
            println!("{}", format_task_line(task));
        }
    }
    Ok(())
}

fn cmd_show(args: IdArg, json: bool) -> CmdResult {
    let project = load_project_cwd()?;
    let task = task_ops::find_task(&project.store, &args.id)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&task_to_json(task, &project.store))?
        );
    } else {
        for line in format_task_detail(task, &project.store) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_rm(args: IdArg, json: bool) -> CmdResult {
    let (mut project, _lock) = lock_and_load()?;

    let removed = task_ops::delete_task(&mut project.store, &mut notifier(json), &args.id)?;
    save(&project)?;
    recovery::log_task_deletion(&project.board_dir, &removed);

    if json {
        println!("{}", serde_json::to_string_pretty(&removed)?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

fn cmd_label(cmd: LabelCmd, json: bool) -> CmdResult {
    match cmd.action.unwrap_or(LabelAction::List) {
        LabelAction::List => {
            let project = load_project_cwd()?;
            let store = &project.store;
            if json {
                let labels: Vec<LabelJson> =
                    store.labels.iter().map(|l| label_to_json(l, store)).collect();
                println!("{}", serde_json::to_string_pretty(&labels)?);
            } else {
                for label in &store.labels {
                    println!("{}", format_label_line(label, store));
                }
            }
            Ok(())
        }
        LabelAction::Add(args) => {
            let (mut project, _lock) = lock_and_load()?;
            label_ops::create_label(
                &mut project.store,
                &mut notifier(json),
                &project.config.limits,
                &args.title,
                args.color.as_deref(),
            )?;
            save(&project)?;
            Ok(())
        }
        LabelAction::Rm(args) => {
            let (mut project, _lock) = lock_and_load()?;
            let detached =
                label_ops::delete_label(&mut project.store, &mut notifier(json), &args.title)?;
            save(&project)?;
            if json {
                println!("{}", serde_json::json!({ "title": args.title, "detached": detached }));
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

fn cmd_status(cmd: StatusCmd, json: bool) -> CmdResult {
    match cmd.action.unwrap_or(StatusAction::List) {
        StatusAction::List => {
            let project = load_project_cwd()?;
            let store = &project.store;
            let default = project.config.statuses.default.as_str();
            if json {
                let statuses: Vec<StatusJson> = store
                    .statuses
                    .iter()
                    .map(|s| status_to_json(s, store, default))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&statuses)?);
            } else {
                for status in &store.statuses {
                    println!("{}", format_status_line(status, store, default));
                }
            }
            Ok(())
        }
        StatusAction::Add(args) => {
            let (mut project, _lock) = lock_and_load()?;
            status_ops::create_status(
                &mut project.store,
                &mut notifier(json),
                &args.name,
                args.color.as_deref(),
            )?;
            save(&project)?;
            Ok(())
        }
        StatusAction::Rm(args) => {
            let (mut project, _lock) = lock_and_load()?;
            if project.config.statuses.default == args.name {
                return Err(format!(
                    "{} is the default status; pick another with `tb status default` first",
                    args.name
                )
                .into());
            }
            status_ops::delete_status(&mut project.store, &mut notifier(json), &args.name)?;
            save(&project)?;
            Ok(())
        }
        StatusAction::Default(args) => {
            let (project, _lock) = lock_and_load()?;
            if project.store.status(&args.name).is_none() {
                return Err(status_ops::StatusError::NotFound(args.name).into());
            }
            let (_, mut doc) = config_io::read_config(&project.board_dir)?;
            config_io::set_default_status(&mut doc, &args.name);
            config_io::write_config(&project.board_dir, &doc)?;
            tracing::info!(status = %args.name, "default status changed");
            if !json {
                eprintln!("Default status is now {}", args.name);
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Modules
// ---------------------------------------------------------------------------

fn cmd_module(cmd: ModuleCmd, json: bool) -> CmdResult {
    match cmd.action.unwrap_or(ModuleAction::List) {
        ModuleAction::List => {
            let project = load_project_cwd()?;
            if json {
                let modules: Vec<ModuleJson> =
                    project.store.modules.iter().map(module_to_json).collect();
                println!("{}", serde_json::to_string_pretty(&modules)?);
            } else {
                for module in &project.store.modules {
                    println!("{}", format_module_line(module));
                }
            }
            Ok(())
        }
        ModuleAction::Show(args) => {
            let project = load_project_cwd()?;
            let store = &project.store;
            let module = store
                .module(&args.id)
                .ok_or_else(|| module_ops::ModuleError::NotFound(args.id.clone()))?;
            let filter = search::TaskFilter {
                module: Some(module.id.as_str()),
                ..Default::default()
            };
            let tasks = search::filter_tasks(store, &filter);
            if json {
                let detail = ModuleDetailJson {
                    id: module.id.clone(),
                    title: module.title.clone(),
                    tasks: tasks.iter().map(|t| task_to_json(t, store)).collect(),
                };
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                println!("{}", format_module_header(module));
                println!();
                for task in tasks {
                    println!("{}", format_task_line(task));
                }
            }
            Ok(())
        }
        ModuleAction::Add(args) => {
            let (mut project, _lock) = lock_and_load()?;
            module_ops::create_module(
                &mut project.store,
                &mut notifier(json),
                &project.config.limits,
                &args.id,
                &args.title,
            )?;
            save(&project)?;
            Ok(())
        }
        ModuleAction::Link(args) => {
            let (mut project, _lock) = lock_and_load()?;
            module_ops::link_task(
                &mut project.store,
                &mut notifier(json),
                &args.module,
                &args.task,
            )?;
            save(&project)?;
            Ok(())
        }
        ModuleAction::Unlink(args) => {
            let (mut project, _lock) = lock_and_load()?;
            module_ops::unlink_task(
                &mut project.store,
                &mut notifier(json),
                &args.module,
                &args.task,
            )?;
            save(&project)?;
            Ok(())
        }
        ModuleAction::Rm(args) => {
            let (mut project, _lock) = lock_and_load()?;
            module_ops::delete_module(&mut project.store, &mut notifier(json), &args.id)?;
            save(&project)?;
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

fn cmd_check(json: bool) -> CmdResult {
    let project = load_project_cwd()?;
    let result = check::check_store(&project.store, &project.config.limits);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if !result.errors.is_empty() {
            println!("Errors:");
            for err in &result.errors {
                match err {
                    check::CheckError::DanglingModuleTask { module_id, task_id } => {
                        println!("  [{}] lists missing task {}", module_id, task_id);
                    }
                    check::CheckError::UnknownStatus { task_id, status } => {
                        println!("  {} has unknown status \"{}\"", task_id, status);
                    }
                    check::CheckError::DuplicateId { task_id, count } => {
                        println!("  {} is used by {} tasks", task_id, count);
                    }
                    check::CheckError::DuplicateLabel { task_id, label } => {
                        println!("  {} has label #{} twice", task_id, label);
                    }
                }
            }
        }
        if !result.warnings.is_empty() {
            if !result.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &result.warnings {
                match warn {
                    check::CheckWarning::UncataloguedLabel { task_id, label } => {
                        println!("  {} has label #{} missing from the catalog", task_id, label);
                    }
                    check::CheckWarning::OverLimit {
                        task_id,
                        field,
                        length,
                        limit,
                    } => {
                        println!("  {} {} is {} characters (limit {})", task_id, field, length, limit);
                    }
                    check::CheckWarning::RepeatedModuleTask { module_id, task_id } => {
                        println!("  [{}] lists {} more than once", module_id, task_id);
                    }
                }
            }
        }
        if result.valid {
            println!("✓ store is valid");
        } else {
            println!("✗ store has errors");
        }
    }

    if result.valid {
        Ok(())
    } else {
        Err(format!("{} error(s) found", result.errors.len()).into())
    }
}

fn cmd_recovery(args: RecoveryArgs, json: bool) -> CmdResult {
    let root = project_io::discover_project(&project_start_dir()?)?;
    let board_dir = root.join(project_io::BOARD_DIR);

    if args.path {
        println!("{}", recovery::recovery_log_path(&board_dir).display());
        return Ok(());
    }

    let entries = recovery::read_recovery_entries(&board_dir, Some(args.limit.unwrap_or(10)));
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("recovery log is empty");
    } else {
        for entry in &entries {
            print!("{}", entry.to_markdown());
        }
    }
    Ok(())
}
