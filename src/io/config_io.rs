use std::fs;
use std::path::Path;

use crate::io::project_io::ProjectError;
use crate::io::recovery::atomic_write;
use crate::model::config::ProjectConfig;

/// Read the project config, returning both the parsed config and the raw
/// toml_edit document for formatting-preserving edits.
pub fn read_config(
    board_dir: &Path,
) -> Result<(ProjectConfig, toml_edit::DocumentMut), ProjectError> {
    let config_path = board_dir.join("project.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| ProjectError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: ProjectConfig = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving comments and layout.
pub fn write_config(board_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ProjectError> {
    let config_path = board_dir.join("project.toml");
    atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| {
        ProjectError::WriteError {
            path: config_path,
            source: e,
        }
    })
}

/// Set `[statuses] default`
pub fn set_default_status(doc: &mut toml_edit::DocumentMut, status: &str) {
    if !doc.contains_key("statuses") {
        doc["statuses"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["statuses"]["default"] = toml_edit::value(status);
}
