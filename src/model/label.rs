use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A label that can be attached to any number of tasks.
///
/// Labels are identified by title: two labels with the same title are the
/// same label regardless of their styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub title: String,
    /// Optional `#RRGGBB` display color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Label {
    pub fn new(title: impl Into<String>) -> Self {
        Label {
            title: title.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

impl Eq for Label {}

/// Whether `labels` contains a label with the given title
pub fn has_label(labels: &[Label], title: &str) -> bool {
    labels.iter().any(|l| l.title == title)
}

/// Remove repeated titles, keeping the first occurrence and the original order
pub fn dedupe_labels(labels: &[Label]) -> Vec<Label> {
    let mut seen: IndexMap<&str, &Label> = IndexMap::new();
    for label in labels {
        seen.entry(label.title.as_str()).or_insert(label);
    }
    seen.into_values().cloned().collect()
}

/// Titles of the labels, in order
pub fn label_titles(labels: &[Label]) -> Vec<&str> {
    labels.iter().map(|l| l.title.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_compare_by_title() {
        let a = Label::new("bug").with_color("#FF4444");
        let b = Label::new("bug");
        assert_eq!(a, b);
        assert_ne!(a, Label::new("design"));
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let labels = vec![
            Label::new("bug").with_color("#FF0000"),
            Label::new("ui"),
            Label::new("bug").with_color("#00FF00"),
        ];
        let deduped = dedupe_labels(&labels);
        assert_eq!(label_titles(&deduped), vec!["bug", "ui"]);
        assert_eq!(deduped[0].color.as_deref(), Some("#FF0000"));
    }

    #[test]
    fn test_has_label_matches_title() {
        let labels = vec![Label::new("bug")];
        assert!(has_label(&labels, "bug"));
        assert!(!has_label(&labels, "Bug"));
    }
}
