use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::{RecoveryCategory, RecoveryEntry, atomic_write, log_recovery};
use crate::model::config::ProjectConfig;
use crate::model::project::Project;
use crate::model::store::Store;

/// Name of the project directory under the root
pub const BOARD_DIR: &str = "board";

/// Error type for project I/O operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("not a taskboard project: no board/ directory found (run `tb init`)")]
    NotAProject,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source} (content saved to the recovery log)")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse project.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit project.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("could not parse {path}: {source}")]
    StoreParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize store: {0}")]
    StoreSerializeError(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Walk up from `start` looking for a directory containing
/// `board/project.toml`.
pub fn discover_project(start: &Path) -> Result<PathBuf, ProjectError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(BOARD_DIR).join("project.toml").is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ProjectError::NotAProject);
        }
    }
}

/// Load config and store for the project rooted at `root`.
///
/// A missing `store.json` yields a store seeded with the configured statuses.
pub fn load_project(root: &Path) -> Result<Project, ProjectError> {
    let board_dir = root.join(BOARD_DIR);
    if !board_dir.is_dir() {
        return Err(ProjectError::NotAProject);
    }

    let config_path = board_dir.join("project.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| ProjectError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: ProjectConfig = toml::from_str(&config_text)?;
    let store = load_store(&board_dir, &config)?;

    tracing::debug!(
        root = %root.display(),
        tasks = store.tasks.len(),
        modules = store.modules.len(),
        "project loaded"
    );

    Ok(Project {
        root: root.to_path_buf(),
        board_dir,
        config,
        store,
    })
}

pub fn store_path(board_dir: &Path) -> PathBuf {
    board_dir.join("store.json")
}

/// Read `store.json`, falling back to a freshly seeded store when absent.
pub fn load_store(board_dir: &Path, config: &ProjectConfig) -> Result<Store, ProjectError> {
    let path = store_path(board_dir);
    if !path.exists() {
        return Ok(Store::with_statuses(&config.statuses.seed));
    }
    let text = fs::read_to_string(&path).map_err(|e| ProjectError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| ProjectError::StoreParseError { path, source: e })
}

/// Write the store atomically. On failure the serialized store is appended
/// to the recovery log so nothing is lost.
pub fn save_store(board_dir: &Path, store: &Store) -> Result<(), ProjectError> {
    let path = store_path(board_dir);
    let mut content = serde_json::to_string_pretty(store)?;
    content.push('\n');

    if let Err(e) = atomic_write(&path, content.as_bytes()) {
        tracing::error!(path = %path.display(), error = %e, "store write failed");
        log_recovery(
            board_dir,
            RecoveryEntry::new(RecoveryCategory::Write, "store write failed")
                .field("Target", "store.json")
                .field("Error", e.to_string())
                .body(content),
        );
        return Err(ProjectError::WriteError { path, source: e });
    }
    tracing::debug!(tasks = store.tasks.len(), "store saved");
    Ok(())
}
