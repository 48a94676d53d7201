use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration from project.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project: ProjectInfo,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub statuses: StatusConfig,
    #[serde(default)]
    pub ids: IdConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
}

/// Maximum field lengths, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default = "default_task_title")]
    pub task_title: usize,
    #[serde(default = "default_task_description")]
    pub task_description: usize,
    #[serde(default = "default_label_title")]
    pub label_title: usize,
    #[serde(default = "default_module_title")]
    pub module_title: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            task_title: default_task_title(),
            task_description: default_task_description(),
            label_title: default_label_title(),
            module_title: default_module_title(),
        }
    }
}

fn default_task_title() -> usize {
    50
}

fn default_task_description() -> usize {
    300
}

fn default_label_title() -> usize {
    24
}

fn default_module_title() -> usize {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Status preselected in the create form
    #[serde(default = "default_status")]
    pub default: String,
    /// Statuses written into a fresh store by `tb init`
    #[serde(default = "default_seed_statuses")]
    pub seed: Vec<String>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        StatusConfig {
            default: default_status(),
            seed: default_seed_statuses(),
        }
    }
}

fn default_status() -> String {
    "todo".to_string()
}

fn default_seed_statuses() -> Vec<String> {
    vec!["todo".into(), "in-progress".into(), "done".into()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdConfig {
    #[serde(default = "default_task_prefix")]
    pub task_prefix: String,
}

impl Default for IdConfig {
    fn default() -> Self {
        IdConfig {
            task_prefix: default_task_prefix(),
        }
    }
}

fn default_task_prefix() -> String {
    "T".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: IndexMap<String, String>,
    /// Status name → `#RRGGBB`, overriding the store's status colors
    #[serde(default)]
    pub status_colors: IndexMap<String, String>,
}
