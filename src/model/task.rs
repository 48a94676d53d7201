use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::label::Label;

/// A task in the shared store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Generated ID like `T-014`
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Name of one of the configured statuses
    pub status: String,
    /// Due date as a UTC timestamp (serialized as RFC 3339)
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Attached labels, unique by title
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Task {
    /// A fresh task with only its ID set; every other field is empty.
    pub fn new(id: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            status: String::new(),
            due_date: None,
            labels: Vec::new(),
        }
    }

    /// The `YYYY-MM-DD` part of the due date, or empty
    pub fn due_day(&self) -> String {
        format_due_day(self.due_date)
    }
}

/// Format a due date as `YYYY-MM-DD`, or empty when unset
pub fn format_due_day(due: Option<DateTime<Utc>>) -> String {
    due.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Split a task ID into its prefix and number (`T-014` → `("T", 14)`)
pub fn split_task_id(id: &str) -> Option<(&str, u32)> {
    let (prefix, num) = id.rsplit_once('-')?;
    Some((prefix, num.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_split_task_id() {
        assert_eq!(split_task_id("T-014"), Some(("T", 14)));
        assert_eq!(split_task_id("WEB-APP-3"), Some(("WEB-APP", 3)));
        assert_eq!(split_task_id("T014"), None);
        assert_eq!(split_task_id("T-x"), None);
    }

    #[test]
    fn test_due_day() {
        let mut task = Task::new("T-001");
        assert_eq!(task.due_day(), "");
        task.due_date = Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(task.due_day(), "2025-06-01");
    }

    #[test]
    fn test_serde_defaults() {
        let task: Task =
            serde_json::from_str(r#"{"id":"T-001","title":"x","status":"todo"}"#).unwrap();
        assert_eq!(task.description, "");
        assert!(task.due_date.is_none());
        assert!(task.labels.is_empty());
    }
}
