use crate::model::config::Limits;
use crate::model::label::Label;
use crate::model::store::Store;
use crate::notify::{Notifier, Toast};
use crate::ops::validate::{LabelSchema, ValidationError, create_and_validate};

/// Error type for label operations
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("label not found: {0}")]
    NotFound(String),
    #[error("invalid label: {0}")]
    Invalid(#[from] ValidationError),
}

/// Validate and add a label to the catalog.
pub fn create_label(
    store: &mut Store,
    notifier: &mut dyn Notifier,
    limits: &Limits,
    title: &str,
    color: Option<&str>,
) -> Result<(), LabelError> {
    let schema = LabelSchema::new(limits, store);
    let label = create_and_validate(&schema, Label::new(""), |l| {
        l.title = title.to_string();
        l.color = color.map(str::to_string);
    })
    .inspect_err(|e| notifier.show_toast(Toast::error(e.to_string())))?;
    tracing::info!(label = title, "label created");
    store.labels.push(label);
    notifier.show_toast(Toast::success(format!("Label {} created", title)));
    Ok(())
}

/// Remove a label from the catalog and detach it from every task.
/// Returns the number of tasks it was detached from.
pub fn delete_label(
    store: &mut Store,
    notifier: &mut dyn Notifier,
    title: &str,
) -> Result<usize, LabelError> {
    let idx = store
        .labels
        .iter()
        .position(|l| l.title == title)
        .ok_or_else(|| LabelError::NotFound(title.to_string()))?;
    store.labels.remove(idx);
    let mut detached = 0;
    store.set_tasks(|tasks| {
        for task in tasks.iter_mut() {
            let before = task.labels.len();
            task.labels.retain(|l| l.title != title);
            if task.labels.len() != before {
                detached += 1;
            }
        }
    });
    tracing::info!(label = title, detached, "label deleted");
    notifier.show_toast(Toast::success(format!("Label {} deleted", title)));
    Ok(detached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use crate::notify::ToastLog;

    #[test]
    fn test_create_label() {
        let mut store = Store::default();
        let mut toasts = ToastLog::default();
        let limits = Limits::default();
        create_label(&mut store, &mut toasts, &limits, "bug", Some("#FF4444")).unwrap();
        assert_eq!(store.label("bug").unwrap().color.as_deref(), Some("#FF4444"));

        let dup = create_label(&mut store, &mut toasts, &limits, "bug", None);
        assert!(matches!(dup, Err(LabelError::Invalid(_))));
        assert_eq!(store.labels.len(), 1);
    }

    #[test]
    fn test_delete_label_detaches_from_tasks() {
        let mut store = Store::default();
        let mut toasts = ToastLog::default();
        store.labels = vec![Label::new("bug"), Label::new("ui")];
        let mut t = Task::new("T-001");
        t.labels = vec![Label::new("bug"), Label::new("ui")];
        store.tasks.push(t);

        let detached = delete_label(&mut store, &mut toasts, "bug").unwrap();
        assert_eq!(detached, 1);
        assert!(store.label("bug").is_none());
        assert_eq!(store.tasks[0].labels, vec![Label::new("ui")]);
    }

    #[test]
    fn test_delete_missing_label() {
        let mut store = Store::default();
        let mut toasts = ToastLog::default();
        assert!(matches!(
            delete_label(&mut store, &mut toasts, "nope"),
            Err(LabelError::NotFound(_))
        ));
    }
}
