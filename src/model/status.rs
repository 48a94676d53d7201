use serde::{Deserialize, Serialize};

/// A workflow status a task can be in (e.g. `todo`, `in-progress`, `done`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub name: String,
    /// Optional `#RRGGBB` display color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Status {
    pub fn new(name: impl Into<String>) -> Self {
        Status {
            name: name.into(),
            color: None,
        }
    }
}
