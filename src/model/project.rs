use std::path::PathBuf;

use super::config::ProjectConfig;
use super::store::Store;

/// A fully loaded taskboard project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of `board/`)
    pub root: PathBuf,
    /// Path to the `board/` directory
    pub board_dir: PathBuf,
    /// Parsed project.toml
    pub config: ProjectConfig,
    /// Loaded store.json
    pub store: Store,
}
