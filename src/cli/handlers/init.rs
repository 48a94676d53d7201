use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::project_io::{self, BOARD_DIR};
use crate::model::config::StatusConfig;
use crate::model::store::Store;

const PROJECT_TOML_TEMPLATE: &str = r##"[project]
name = "{name}"

[statuses]
# Preselected in the create form
default = "{default}"
# Written into store.json by `tb init`; manage later with `tb status add/rm`
seed = [{seed}]

[ids]
# New tasks are numbered {prefix}-001, {prefix}-002, ...
task_prefix = "{prefix}"

# Field limits, in characters
[limits]
task_title = 50
task_description = 300
label_title = 24
module_title = 50

# --- UI Customization ---
# Uncomment and edit to override defaults.

[ui]
# show_key_hints = false
#
# [ui.colors]
# background = "#0C001B"
# text = "#A09BFE"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#5A5580"
# red = "#FF4444"
# green = "#44FF88"
#
# [ui.status_colors]
# todo = "#A09BFE"
# in-progress = "#FFD700"
# done = "#44FF88"
"##;

/// Validate a task ID prefix: uppercase letters and digits, starting with a letter.
fn validate_prefix(prefix: &str) -> Result<(), String> {
    let mut chars = prefix.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(format!(
            "invalid prefix \"{}\", use uppercase letters and digits (e.g. \"WEB\")",
            prefix
        ))
    }
}

fn validate_statuses(statuses: &[String]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for status in statuses {
        if status.trim().is_empty() {
            return Err("status name cannot be empty".to_string());
        }
        if status.contains('"') {
            return Err(format!("invalid status name {}", status));
        }
        if !seen.insert(status.as_str()) {
            return Err(format!("duplicate status \"{}\"", status));
        }
    }
    Ok(())
}

/// Infer a project name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_project_toml(name: &str, statuses: &[String], prefix: &str) -> String {
    let seed = statuses
        .iter()
        .map(|s| format!("\"{}\"", s))
        .collect::<Vec<_>>()
        .join(", ");
    PROJECT_TOML_TEMPLATE
        .replace("{name}", &name.replace('"', "\\\""))
        .replace("{default}", statuses.first().map_or("", String::as_str))
        .replace("{seed}", &seed)
        .replace("{prefix}", prefix)
}

/// Create `board/` with a project.toml and a store seeded with statuses.
pub fn cmd_init(args: InitArgs, dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match dir {
        Some(d) => fs::canonicalize(d).map_err(|e| format!("cannot resolve -C path '{}': {}", d, e))?,
        None => std::env::current_dir()?,
    };
    let board_dir = root.join(BOARD_DIR);
    if board_dir.is_dir() {
        return Err("taskboard project already exists in ./board/".into());
    }

    if let Some(parent) = root.parent()
        && let Ok(parent_root) = project_io::discover_project(parent)
    {
        eprintln!(
            "Note: parent project found at {}/",
            parent_root.join(BOARD_DIR).display()
        );
    }

    let statuses = if args.statuses.is_empty() {
        StatusConfig::default().seed
    } else {
        args.statuses
    };
    validate_statuses(&statuses)?;

    let prefix = args.prefix.unwrap_or_else(|| "T".to_string());
    validate_prefix(&prefix)?;

    let name = args.name.unwrap_or_else(|| {
        root.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .unwrap_or_else(|| "Untitled".to_string())
    });

    write_board(&board_dir, &name, &statuses, &prefix)?;
    tracing::info!(root = %root.display(), "board initialized");

    println!("Initialized taskboard project: {}", name);
    println!("  statuses: {}", statuses.join(", "));
    Ok(())
}

fn write_board(
    board_dir: &Path,
    name: &str,
    statuses: &[String],
    prefix: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(board_dir)?;
    fs::write(
        board_dir.join("project.toml"),
        render_project_toml(name, statuses, prefix),
    )?;
    project_io::save_store(board_dir, &Store::with_statuses(statuses))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::ProjectConfig;
    use tempfile::TempDir;

    #[test]
    fn test_validate_prefix() {
        assert!(validate_prefix("T").is_ok());
        assert!(validate_prefix("WEB2").is_ok());
        assert!(validate_prefix("web").is_err());
        assert!(validate_prefix("2X").is_err());
        assert!(validate_prefix("").is_err());
    }

    #[test]
    fn test_validate_statuses() {
        assert!(validate_statuses(&["todo".into(), "done".into()]).is_ok());
        assert!(validate_statuses(&["todo".into(), "todo".into()]).is_err());
        assert!(validate_statuses(&[" ".into()]).is_err());
    }

    #[test]
    fn test_infer_name() {
        assert_eq!(infer_name("my-cool-project"), "My Cool Project");
        assert_eq!(infer_name("board"), "Board");
    }

    #[test]
    fn test_rendered_template_parses() {
        let statuses = vec!["open".to_string(), "closed".to_string()];
        let text = render_project_toml("Demo", &statuses, "DM");
        let config: ProjectConfig = toml::from_str(&text).unwrap();
        assert_eq!(config.project.name, "Demo");
        assert_eq!(config.statuses.default, "open");
        assert_eq!(config.statuses.seed, statuses);
        assert_eq!(config.ids.task_prefix, "DM");
        assert_eq!(config.limits.task_description, 300);
    }

    #[test]
    fn test_write_board_seeds_store() {
        let tmp = TempDir::new().unwrap();
        let board_dir = tmp.path().join(BOARD_DIR);
        let statuses = vec!["todo".to_string(), "done".to_string()];
        write_board(&board_dir, "Demo", &statuses, "T").unwrap();

        let project = project_io::load_project(tmp.path()).unwrap();
        assert_eq!(project.store.status_names(), statuses);
        assert!(board_dir.join("store.json").exists());
    }
}
