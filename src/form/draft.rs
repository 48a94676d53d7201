use chrono::{DateTime, NaiveDate, Utc};

use crate::model::label::{Label, dedupe_labels, has_label};
use crate::model::task::Task;

/// In-progress form state. Mirrors [`Task`] without the ID and may be
/// invalid (e.g. an empty title) until submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_date: Option<DateTime<Utc>>,
    pub labels: Vec<Label>,
}

impl TaskDraft {
    /// Blank draft for the create form
    pub fn new(default_status: impl Into<String>) -> Self {
        TaskDraft {
            title: String::new(),
            description: String::new(),
            status: default_status.into(),
            due_date: None,
            labels: Vec::new(),
        }
    }

    /// Draft pre-filled from an existing task, field for field
    pub fn from_task(task: &Task) -> Self {
        TaskDraft {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.clone(),
            due_date: task.due_date,
            labels: task.labels.clone(),
        }
    }

    /// Copy every draft field onto `task`, leaving its ID alone.
    /// Labels are deduplicated by title on the way.
    pub fn apply_to(&self, task: &mut Task) {
        task.title = self.title.clone();
        task.description = self.description.clone();
        task.status = self.status.clone();
        task.due_date = self.due_date;
        task.labels = dedupe_labels(&self.labels);
    }
}

/// A single-field change to a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    Title(String),
    Description(String),
    Status(String),
    /// Raw date input: `YYYY-MM-DD`, an RFC 3339 timestamp, or empty to clear
    DueDate(String),
    /// Checkbox change in the label picker
    ToggleLabel { label: Label, checked: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("invalid date \"{0}\": expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Parse due-date input into a UTC timestamp.
///
/// A bare date means midnight UTC on that day. Empty input clears the date.
pub fn parse_due_date(input: &str) -> Result<Option<DateTime<Utc>>, DraftError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    if let Ok(day) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(day.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()));
    }
    DateTime::parse_from_rfc3339(input)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|_| DraftError::InvalidDate(input.to_string()))
}

/// Produce the next draft from the current one and an edit.
///
/// Exactly one field changes; on error the caller keeps the old draft.
pub fn reduce(draft: &TaskDraft, edit: DraftEdit) -> Result<TaskDraft, DraftError> {
    let mut next = draft.clone();
    match edit {
        DraftEdit::Title(title) => next.title = title,
        DraftEdit::Description(description) => next.description = description,
        DraftEdit::Status(status) => next.status = status,
        DraftEdit::DueDate(raw) => next.due_date = parse_due_date(&raw)?,
        DraftEdit::ToggleLabel { label, checked } => {
            if checked {
                if !has_label(&next.labels, &label.title) {
                    next.labels.push(label);
                }
            } else {
                next.labels.retain(|l| l.title != label.title);
            }
        }
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> TaskDraft {
        TaskDraft {
            title: "Title".into(),
            description: "Body".into(),
            status: "todo".into(),
            due_date: None,
            labels: vec![Label::new("bug")],
        }
    }

    #[test]
    fn test_field_edit_touches_one_field() {
        let before = draft();
        let after = reduce(&before, DraftEdit::Description("New body".into())).unwrap();
        assert_eq!(after.description, "New body");
        assert_eq!(after.title, before.title);
        assert_eq!(after.status, before.status);
        assert_eq!(after.labels, before.labels);
        // Source draft is untouched
        assert_eq!(before.description, "Body");
    }

    #[test]
    fn test_parse_bare_date_is_midnight_utc() {
        let parsed = parse_due_date("2025-03-09").unwrap();
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 3, 9, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_parse_rfc3339_converts_to_utc() {
        let parsed = parse_due_date("2025-03-09T10:00:00+02:00").unwrap();
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 3, 9, 8, 0, 0).unwrap()));
    }

    #[test]
    fn test_parse_empty_clears() {
        assert_eq!(parse_due_date("").unwrap(), None);
        assert_eq!(parse_due_date("   ").unwrap(), None);
    }

    #[test]
    fn test_bad_date_is_an_error() {
        assert_eq!(
            parse_due_date("2025-02-30"),
            Err(DraftError::InvalidDate("2025-02-30".into()))
        );
        let before = draft();
        assert!(reduce(&before, DraftEdit::DueDate("next tuesday".into())).is_err());
    }

    #[test]
    fn test_toggle_adds_once() {
        let d = draft();
        let d = reduce(
            &d,
            DraftEdit::ToggleLabel {
                label: Label::new("ui"),
                checked: true,
            },
        )
        .unwrap();
        let d = reduce(
            &d,
            DraftEdit::ToggleLabel {
                label: Label::new("ui"),
                checked: true,
            },
        )
        .unwrap();
        let titles: Vec<&str> = d.labels.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["bug", "ui"]);
    }

    #[test]
    fn test_toggle_off_removes_by_title() {
        let d = reduce(
            &draft(),
            DraftEdit::ToggleLabel {
                label: Label::new("bug").with_color("#000000"),
                checked: false,
            },
        )
        .unwrap();
        assert!(d.labels.is_empty());
    }

    #[test]
    fn test_apply_to_keeps_id_and_dedupes() {
        let mut d = draft();
        d.labels.push(Label::new("bug"));
        let mut task = Task::new("T-042");
        d.apply_to(&mut task);
        assert_eq!(task.id, "T-042");
        assert_eq!(task.title, "Title");
        assert_eq!(task.labels.len(), 1);
    }
}
