use crate::model::config::Limits;
use crate::model::module::Module;
use crate::model::store::Store;
use crate::notify::{Notifier, Toast};
use crate::ops::validate::{ModuleSchema, ValidationError, create_and_validate};

/// Error type for module operations
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("module not found: {0}")]
    NotFound(String),
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("invalid module: {0}")]
    Invalid(#[from] ValidationError),
}

/// Put `task_id` at the front of the matching module's task list.
///
/// Modules with other IDs are left untouched; a task already in the module
/// keeps its position.
pub fn prepend_task(modules: &mut [Module], module_id: &str, task_id: &str) {
    for module in modules.iter_mut().filter(|m| m.id == module_id) {
        if !module.contains(task_id) {
            module.tasks.insert(0, task_id.to_string());
        }
    }
}

/// Validate and add a new, empty module.
pub fn create_module(
    store: &mut Store,
    notifier: &mut dyn Notifier,
    limits: &Limits,
    id: &str,
    title: &str,
) -> Result<(), ModuleError> {
    let schema = ModuleSchema::new(limits, store);
    let module = create_and_validate(&schema, Module::new(id, ""), |m| {
        m.title = title.to_string();
    })
    .inspect_err(|e| notifier.show_toast(Toast::error(e.to_string())))?;
    tracing::info!(module_id = id, "module created");
    store.set_modules(|modules| modules.push(module));
    notifier.show_toast(Toast::success(format!("Module {} created", id)));
    Ok(())
}

/// Link an existing task into a module (at the front).
pub fn link_task(
    store: &mut Store,
    notifier: &mut dyn Notifier,
    module_id: &str,
    task_id: &str,
) -> Result<(), ModuleError> {
    if store.module(module_id).is_none() {
        return Err(ModuleError::NotFound(module_id.to_string()));
    }
    if store.task(task_id).is_none() {
        return Err(ModuleError::TaskNotFound(task_id.to_string()));
    }
    store.set_modules(|modules| prepend_task(modules, module_id, task_id));
    notifier.show_toast(Toast::success(format!("{} linked to {}", task_id, module_id)));
    Ok(())
}

/// Remove a task from a module. The task itself is kept.
pub fn unlink_task(
    store: &mut Store,
    notifier: &mut dyn Notifier,
    module_id: &str,
    task_id: &str,
) -> Result<(), ModuleError> {
    let module = store
        .modules
        .iter_mut()
        .find(|m| m.id == module_id)
        .ok_or_else(|| ModuleError::NotFound(module_id.to_string()))?;
    let before = module.tasks.len();
    module.tasks.retain(|id| id != task_id);
    if module.tasks.len() == before {
        return Err(ModuleError::TaskNotFound(task_id.to_string()));
    }
    notifier.show_toast(Toast::success(format!(
        "{} unlinked from {}",
        task_id, module_id
    )));
    Ok(())
}

/// Delete a module. Its tasks stay in the store.
pub fn delete_module(
    store: &mut Store,
    notifier: &mut dyn Notifier,
    module_id: &str,
) -> Result<Module, ModuleError> {
    let idx = store
        .modules
        .iter()
        .position(|m| m.id == module_id)
        .ok_or_else(|| ModuleError::NotFound(module_id.to_string()))?;
    let removed = store.modules.remove(idx);
    tracing::info!(module_id, "module deleted");
    notifier.show_toast(Toast::success(format!("Module {} deleted", module_id)));
    Ok(removed)
}
