use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Board view state carried across TUI sessions (`board/.state.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Module the board was filtered to, if any
    #[serde(default)]
    pub route: Option<String>,
    /// Cursor position per route; the unfiltered board uses the empty key
    #[serde(default)]
    pub cursors: HashMap<String, usize>,
}

impl UiState {
    pub fn cursor_for(&self, route: Option<&str>) -> usize {
        self.cursors.get(route.unwrap_or("")).copied().unwrap_or(0)
    }

    pub fn set_cursor(&mut self, route: Option<&str>, cursor: usize) {
        self.cursors.insert(route.unwrap_or("").to_string(), cursor);
    }
}

/// Read `.state.json`; a missing or unreadable file gives `None`
pub fn read_ui_state(board_dir: &Path) -> Option<UiState> {
    let content = fs::read_to_string(board_dir.join(".state.json")).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn write_ui_state(board_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(board_dir.join(".state.json"), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut state = UiState {
            route: Some("auth".into()),
            ..Default::default()
        };
        state.set_cursor(Some("auth"), 3);
        state.set_cursor(None, 7);

        write_ui_state(dir.path(), &state).unwrap();
        let loaded = read_ui_state(dir.path()).unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.cursor_for(Some("auth")), 3);
        assert_eq!(loaded.cursor_for(None), 7);
        assert_eq!(loaded.cursor_for(Some("billing")), 0);
    }

    #[test]
    fn test_read_missing_or_malformed_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
        fs::write(dir.path().join(".state.json"), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let state: UiState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, UiState::default());
    }
}
