use serde::Serialize;

use crate::model::label::Label;
use crate::model::module::Module;
use crate::model::status::Status;
use crate::model::store::Store;
use crate::model::task::Task;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub labels: Vec<String>,
    pub modules: Vec<String>,
}

#[derive(Serialize)]
pub struct LabelJson {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub tasks: usize,
}

#[derive(Serialize)]
pub struct StatusJson {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub default: bool,
    pub tasks: usize,
}

#[derive(Serialize)]
pub struct ModuleJson {
    pub id: String,
    pub title: String,
    pub tasks: Vec<String>,
}

#[derive(Serialize)]
pub struct ModuleDetailJson {
    pub id: String,
    pub title: String,
    pub tasks: Vec<TaskJson>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task, store: &Store) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        status: task.status.clone(),
        due_date: task
            .due_date
            .map(|d| d.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
        labels: task.labels.iter().map(|l| l.title.clone()).collect(),
        modules: store
            .modules_of(&task.id)
            .iter()
            .map(|m| m.id.clone())
            .collect(),
    }
}

pub fn label_to_json(label: &Label, store: &Store) -> LabelJson {
    LabelJson {
        title: label.title.clone(),
        color: label.color.clone(),
        tasks: store
            .tasks
            .iter()
            .filter(|t| t.labels.contains(label))
            .count(),
    }
}

pub fn status_to_json(status: &Status, store: &Store, default: &str) -> StatusJson {
    StatusJson {
        name: status.name.clone(),
        color: status.color.clone(),
        default: status.name == default,
        tasks: store.tasks.iter().filter(|t| t.status == status.name).count(),
    }
}

pub fn module_to_json(module: &Module) -> ModuleJson {
    ModuleJson {
        id: module.id.clone(),
        title: module.title.clone(),
        tasks: module.tasks.clone(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn labels_suffix(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|l| format!(" #{}", l.title))
        .collect()
}

/// One-line summary: `T-001 [todo] Title #bug  due 2025-03-09`
pub fn format_task_line(task: &Task) -> String {
    let due = match task.due_day() {
        day if day.is_empty() => String::new(),
        day => format!("  due {}", day),
    };
    format!(
        "{} [{}] {}{}{}",
        task.id,
        task.status,
        task.title,
        labels_suffix(&task.labels),
        due
    )
}

/// Detailed task view
pub fn format_task_detail(task: &Task, store: &Store) -> Vec<String> {
    let mut lines = vec![format!("{} {}", task.id, task.title)];
    lines.push(format!("status: {}", task.status));
    if task.due_date.is_some() {
        lines.push(format!("due: {}", task.due_day()));
    }
    if !task.labels.is_empty() {
        lines.push(format!("labels:{}", labels_suffix(&task.labels)));
    }
    let modules = store.modules_of(&task.id);
    if !modules.is_empty() {
        let ids: Vec<&str> = modules.iter().map(|m| m.id.as_str()).collect();
        lines.push(format!("modules: {}", ids.join(", ")));
    }
    if !task.description.is_empty() {
        lines.push(String::new());
        lines.extend(task.description.lines().map(|l| format!("  {}", l)));
    }
    lines
}

pub fn format_label_line(label: &Label, store: &Store) -> String {
    let json = label_to_json(label, store);
    match &label.color {
        Some(color) => format!("#{}  {}  ({} tasks)", label.title, color, json.tasks),
        None => format!("#{}  ({} tasks)", label.title, json.tasks),
    }
}

pub fn format_status_line(status: &Status, store: &Store, default: &str) -> String {
    let json = status_to_json(status, store, default);
    let marker = if json.default { "*" } else { " " };
    format!("{} {}  ({} tasks)", marker, status.name, json.tasks)
}

pub fn format_module_line(module: &Module) -> String {
    format!(
        "{}  {}  ({} tasks)",
        module.id,
        module.title,
        module.tasks.len()
    )
}

pub fn format_module_header(module: &Module) -> String {
    format!("== {} ({}) ==", module.title, module.id)
}
