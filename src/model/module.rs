use serde::{Deserialize, Serialize};

/// A module groups tasks into an ordered list (newest first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Lowercase slug, e.g. `auth` or `billing-v2`
    pub id: String,
    pub title: String,
    /// Ids of member tasks, in display order
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl Module {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Module {
            id: id.into(),
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.tasks.iter().any(|t| t == task_id)
    }
}
