use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::model::config::Limits;
use crate::model::label::Label;
use crate::model::module::Module;
use crate::model::status::Status;
use crate::model::store::Store;
use crate::model::task::Task;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("valid slug regex"));

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color regex"));

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Violation {
            field,
            message: message.into(),
        }
    }
}

/// Every rule an entity failed, in field order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Whether any violation is on the given field
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validation rules for an entity type
pub trait Schema<E> {
    fn check(&self, entity: &E, out: &mut Vec<Violation>);

    fn validate(&self, entity: &E) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        self.check(entity, &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}

/// Fill in a fresh entity and hand it back only if it passes the schema.
///
/// Nothing is committed here: the caller stores the returned entity, so a
/// failed validation leaves every collection untouched.
pub fn create_and_validate<E, S>(
    schema: &S,
    mut fresh: E,
    populate: impl FnOnce(&mut E),
) -> Result<E, ValidationError>
where
    S: Schema<E>,
{
    populate(&mut fresh);
    schema.validate(&fresh)?;
    Ok(fresh)
}

fn check_title(
    field: &'static str,
    value: &str,
    limit: usize,
    out: &mut Vec<Violation>,
) {
    if value.trim().is_empty() {
        out.push(Violation::new(field, "cannot be empty"));
    }
    check_length(field, value, limit, out);
}

fn check_length(field: &'static str, value: &str, limit: usize, out: &mut Vec<Violation>) {
    let len = value.chars().count();
    if len > limit {
        out.push(Violation::new(
            field,
            format!("is {} characters, limit is {}", len, limit),
        ));
    }
}

fn check_color(color: Option<&str>, out: &mut Vec<Violation>) {
    if let Some(c) = color
        && !HEX_COLOR_RE.is_match(c)
    {
        out.push(Violation::new("color", format!("\"{}\" is not a #RRGGBB color", c)));
    }
}

/// Whether `s` is a `#RRGGBB` color
pub fn is_hex_color(s: &str) -> bool {
    HEX_COLOR_RE.is_match(s)
}

/// Whether `s` is a lowercase slug usable as a module ID
pub fn is_slug(s: &str) -> bool {
    SLUG_RE.is_match(s)
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// Rules for a task: non-blank title within limit, description within limit,
/// a known status, and labels unique by title.
#[derive(Debug, Clone)]
pub struct TaskSchema {
    pub title_limit: usize,
    pub description_limit: usize,
    pub statuses: Vec<String>,
}

impl TaskSchema {
    pub fn new(limits: &Limits, statuses: &[Status]) -> Self {
        TaskSchema {
            title_limit: limits.task_title,
            description_limit: limits.task_description,
            statuses: statuses.iter().map(|s| s.name.clone()).collect(),
        }
    }

    pub fn for_store(limits: &Limits, store: &Store) -> Self {
        Self::new(limits, &store.statuses)
    }
}

impl Schema<Task> for TaskSchema {
    fn check(&self, task: &Task, out: &mut Vec<Violation>) {
        if task.id.is_empty() {
            out.push(Violation::new("id", "missing"));
        }
        check_title("title", &task.title, self.title_limit, out);
        check_length("description", &task.description, self.description_limit, out);
        if !self.statuses.iter().any(|s| *s == task.status) {
            out.push(Violation::new(
                "status",
                format!("unknown status \"{}\"", task.status),
            ));
        }
        let mut seen = HashSet::new();
        for label in &task.labels {
            if !seen.insert(label.title.as_str()) {
                out.push(Violation::new(
                    "labels",
                    format!("label \"{}\" attached twice", label.title),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LabelSchema {
    pub title_limit: usize,
    /// Titles already in the catalog
    pub existing: Vec<String>,
}

impl LabelSchema {
    pub fn new(limits: &Limits, store: &Store) -> Self {
        LabelSchema {
            title_limit: limits.label_title,
            existing: store.labels.iter().map(|l| l.title.clone()).collect(),
        }
    }
}

impl Schema<Label> for LabelSchema {
    fn check(&self, label: &Label, out: &mut Vec<Violation>) {
        check_title("title", &label.title, self.title_limit, out);
        if self.existing.iter().any(|t| *t == label.title) {
            out.push(Violation::new(
                "title",
                format!("label \"{}\" already exists", label.title),
            ));
        }
        check_color(label.color.as_deref(), out);
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StatusSchema {
    pub existing: Vec<String>,
}

impl StatusSchema {
    pub fn new(store: &Store) -> Self {
        StatusSchema {
            existing: store.status_names(),
        }
    }
}

impl Schema<Status> for StatusSchema {
    fn check(&self, status: &Status, out: &mut Vec<Violation>) {
        if status.name.trim().is_empty() {
            out.push(Violation::new("name", "cannot be empty"));
        }
        if self.existing.iter().any(|s| *s == status.name) {
            out.push(Violation::new(
                "name",
                format!("status \"{}\" already exists", status.name),
            ));
        }
        check_color(status.color.as_deref(), out);
    }
}

// ---------------------------------------------------------------------------
// Module
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ModuleSchema {
    pub title_limit: usize,
    pub existing: Vec<String>,
}

impl ModuleSchema {
    pub fn new(limits: &Limits, store: &Store) -> Self {
        ModuleSchema {
            title_limit: limits.module_title,
            existing: store.modules.iter().map(|m| m.id.clone()).collect(),
        }
    }
}

impl Schema<Module> for ModuleSchema {
    fn check(&self, module: &Module, out: &mut Vec<Violation>) {
        if !is_slug(&module.id) {
            out.push(Violation::new(
                "id",
                format!(
                    "invalid module id \"{}\", use lowercase with hyphens (e.g. \"my-module\")",
                    module.id
                ),
            ));
        } else if self.existing.iter().any(|id| *id == module.id) {
            out.push(Violation::new(
                "id",
                format!("module \"{}\" already exists", module.id),
            ));
        }
        check_title("title", &module.title, self.title_limit, out);
    }
}
