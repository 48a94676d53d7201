use crate::form::draft::TaskDraft;
use crate::model::store::Store;
use crate::model::task::Task;
use crate::notify::{Notifier, Toast};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("task ID already exists: {0}")]
    DuplicateId(String),
    #[error("no task IDs left for prefix {0}")]
    IdsExhausted(String),
}

/// Find a task by ID
pub fn find_task<'a>(store: &'a Store, task_id: &str) -> Result<&'a Task, TaskError> {
    store
        .task(task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))
}

/// Commit a validated task to the store.
pub fn create_task(
    store: &mut Store,
    notifier: &mut dyn Notifier,
    task: Task,
) -> Result<(), TaskError> {
    if store.task(&task.id).is_some() {
        notifier.show_toast(Toast::error(format!("Task {} already exists", task.id)));
        return Err(TaskError::DuplicateId(task.id));
    }
    tracing::info!(task_id = %task.id, title = %task.title, "task created");
    let message = format!("Task {} created", task.id);
    store.set_tasks(|tasks| tasks.push(task));
    notifier.show_toast(Toast::success(message));
    Ok(())
}

/// Overwrite the editable fields of `old_task` (located by ID) with the draft.
pub fn edit_task(
    store: &mut Store,
    notifier: &mut dyn Notifier,
    draft: &TaskDraft,
    old_task: &Task,
) -> Result<(), TaskError> {
    let Some(task) = store.task_mut(&old_task.id) else {
        notifier.show_toast(Toast::error(format!("Task {} no longer exists", old_task.id)));
        return Err(TaskError::NotFound(old_task.id.clone()));
    };
    draft.apply_to(task);
    tracing::info!(task_id = %old_task.id, "task edited");
    notifier.show_toast(Toast::success(format!("Task {} updated", old_task.id)));
    Ok(())
}

/// Remove a task and drop its ID from every module.
pub fn delete_task(
    store: &mut Store,
    notifier: &mut dyn Notifier,
    task_id: &str,
) -> Result<Task, TaskError> {
    let idx = store
        .tasks
        .iter()
        .position(|t| t.id == task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    let removed = store.tasks.remove(idx);
    store.set_modules(|modules| {
        for module in modules.iter_mut() {
            module.tasks.retain(|id| id != task_id);
        }
    });
    tracing::info!(task_id, "task deleted");
    notifier.show_toast(Toast::success(format!("Task {} deleted", task_id)));
    Ok(removed)
}
