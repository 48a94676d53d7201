use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::config::Limits;
use crate::model::store::Store;
use crate::model::task::Task;

/// Structured result from `tb check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A consistency error (something that should be fixed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// A module lists a task ID that is not in the task collection
    #[serde(rename = "dangling_module_task")]
    DanglingModuleTask { module_id: String, task_id: String },
    /// A task's status is not one of the store's statuses
    #[serde(rename = "unknown_status")]
    UnknownStatus { task_id: String, status: String },
    /// Two tasks share an ID
    #[serde(rename = "duplicate_id")]
    DuplicateId { task_id: String, count: usize },
    /// The same label title is attached to a task more than once
    #[serde(rename = "duplicate_label")]
    DuplicateLabel { task_id: String, label: String },
}

/// A non-critical issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// A task carries a label that is not in the catalog
    #[serde(rename = "uncatalogued_label")]
    UncataloguedLabel { task_id: String, label: String },
    /// A task field exceeds its configured limit (e.g. after limits shrank)
    #[serde(rename = "over_limit")]
    OverLimit {
        task_id: String,
        field: String,
        length: usize,
        limit: usize,
    },
    /// A module lists the same task twice
    #[serde(rename = "repeated_module_task")]
    RepeatedModuleTask { module_id: String, task_id: String },
}

/// Validate the store and return structured results.
///
/// This is a read-only operation.
pub fn check_store(store: &Store, limits: &Limits) -> CheckResult {
    let mut result = CheckResult::default();

    let mut id_counts: HashMap<&str, usize> = HashMap::new();
    for task in &store.tasks {
        *id_counts.entry(task.id.as_str()).or_default() += 1;
    }
    let mut duplicates: Vec<(&str, usize)> =
        id_counts.iter().filter(|(_, c)| **c > 1).map(|(id, c)| (*id, *c)).collect();
    duplicates.sort();
    for (task_id, count) in duplicates {
        result.errors.push(CheckError::DuplicateId {
            task_id: task_id.to_string(),
            count,
        });
    }

    let statuses: HashSet<&str> = store.statuses.iter().map(|s| s.name.as_str()).collect();
    let catalog: HashSet<&str> = store.labels.iter().map(|l| l.title.as_str()).collect();
    for task in &store.tasks {
        check_task(task, &statuses, &catalog, limits, &mut result);
    }

    for module in &store.modules {
        let mut seen = HashSet::new();
        for task_id in &module.tasks {
            if !id_counts.contains_key(task_id.as_str()) {
                result.errors.push(CheckError::DanglingModuleTask {
                    module_id: module.id.clone(),
                    task_id: task_id.clone(),
                });
            }
            if !seen.insert(task_id.as_str()) {
                result.warnings.push(CheckWarning::RepeatedModuleTask {
                    module_id: module.id.clone(),
                    task_id: task_id.clone(),
                });
            }
        }
    }

    result.valid = result.errors.is_empty();
    result
}

fn check_task(
    task: &Task,
    statuses: &HashSet<&str>,
    catalog: &HashSet<&str>,
    limits: &Limits,
    result: &mut CheckResult,
) {
    if !statuses.contains(task.status.as_str()) {
        result.errors.push(CheckError::UnknownStatus {
            task_id: task.id.clone(),
            status: task.status.clone(),
        });
    }

    let mut seen = HashSet::new();
    for label in &task.labels {
        if !seen.insert(label.title.as_str()) {
            result.errors.push(CheckError::DuplicateLabel {
                task_id: task.id.clone(),
                label: label.title.clone(),
            });
        } else if !catalog.contains(label.title.as_str()) {
            result.warnings.push(CheckWarning::UncataloguedLabel {
                task_id: task.id.clone(),
                label: label.title.clone(),
            });
        }
    }

    for (field, value, limit) in [
        ("title", &task.title, limits.task_title),
        ("description", &task.description, limits.task_description),
    ] {
        let length = value.chars().count();
        if length > limit {
            result.warnings.push(CheckWarning::OverLimit {
                task_id: task.id.clone(),
                field: field.to_string(),
                length,
                limit,
            });
        }
    }
}
