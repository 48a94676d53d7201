use crate::model::status::Status;
use crate::model::store::Store;
use crate::notify::{Notifier, Toast};
use crate::ops::validate::{StatusSchema, ValidationError, create_and_validate};

/// Error type for status operations
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("status not found: {0}")]
    NotFound(String),
    #[error("status {status} is used by {count} task(s)")]
    InUse { status: String, count: usize },
    #[error("invalid status: {0}")]
    Invalid(#[from] ValidationError),
}

/// Validate and append a status.
pub fn create_status(
    store: &mut Store,
    notifier: &mut dyn Notifier,
    name: &str,
    color: Option<&str>,
) -> Result<(), StatusError> {
    let schema = StatusSchema::new(store);
    let status = create_and_validate(&schema, Status::new(""), |s| {
        s.name = name.to_string();
        s.color = color.map(str::to_string);
    })
    .inspect_err(|e| notifier.show_toast(Toast::error(e.to_string())))?;
    tracing::info!(status = name, "status created");
    store.statuses.push(status);
    notifier.show_toast(Toast::success(format!("Status {} created", name)));
    Ok(())
}

/// Remove a status that no task uses.
pub fn delete_status(
    store: &mut Store,
    notifier: &mut dyn Notifier,
    name: &str,
) -> Result<Status, StatusError> {
    let idx = store
        .statuses
        .iter()
        .position(|s| s.name == name)
        .ok_or_else(|| StatusError::NotFound(name.to_string()))?;
    let count = store.tasks.iter().filter(|t| t.status == name).count();
    if count > 0 {
        let err = StatusError::InUse {
            status: name.to_string(),
            count,
        };
        notifier.show_toast(Toast::error(err.to_string()));
        return Err(err);
    }
    let removed = store.statuses.remove(idx);
    notifier.show_toast(Toast::success(format!("Status {} deleted", name)));
    Ok(removed)
}
