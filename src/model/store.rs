use serde::{Deserialize, Serialize};

use super::label::Label;
use super::module::Module;
use super::status::Status;
use super::task::{Task, split_task_id};

/// The shared, persisted collections every form and command works against.
///
/// Nothing outside the store owns entity data: forms receive `&mut Store`
/// and mutate it only through the updaters and `ops` helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub statuses: Vec<Status>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Store {
    /// A store seeded with the given status names and nothing else
    pub fn with_statuses<S: AsRef<str>>(names: &[S]) -> Self {
        Store {
            statuses: names.iter().map(|n| Status::new(n.as_ref())).collect(),
            ..Default::default()
        }
    }

    /// Apply an update to the task collection
    pub fn set_tasks(&mut self, update: impl FnOnce(&mut Vec<Task>)) {
        update(&mut self.tasks);
    }

    /// Apply an update to the module collection
    pub fn set_modules(&mut self, update: impl FnOnce(&mut Vec<Module>)) {
        update(&mut self.modules);
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn label(&self, title: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.title == title)
    }

    pub fn status(&self, name: &str) -> Option<&Status> {
        self.statuses.iter().find(|s| s.name == name)
    }

    pub fn status_names(&self) -> Vec<String> {
        self.statuses.iter().map(|s| s.name.clone()).collect()
    }

    /// Modules whose task list contains the given task
    pub fn modules_of(&self, task_id: &str) -> Vec<&Module> {
        self.modules.iter().filter(|m| m.contains(task_id)).collect()
    }

    /// Next unused task ID for a prefix: one past the highest existing number.
    /// `None` once the highest number is `u32::MAX`.
    pub fn next_task_id(&self, prefix: &str) -> Option<String> {
        let max = self
            .tasks
            .iter()
            .filter_map(|t| split_task_id(&t.id))
            .filter(|(p, _)| *p == prefix)
            .map(|(_, n)| n)
            .max()
            .unwrap_or(0);
        let next = max.checked_add(1)?;
        Some(format!("{}-{:03}", prefix, next))
    }
}
