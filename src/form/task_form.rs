use crate::model::config::Limits;
use crate::model::store::Store;
use crate::model::task::Task;
use crate::notify::{Notifier, Toast};
use crate::ops::module_ops::prepend_task;
use crate::ops::task_ops::{TaskError, create_task, edit_task};
use crate::ops::validate::{Schema, TaskSchema, ValidationError, Violation, create_and_validate};

use super::draft::{DraftEdit, DraftError, TaskDraft, reduce};
use super::label_picker::LabelPicker;

/// Whether the form creates a new task or edits an existing one.
/// Fixed for the lifetime of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Task),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Open,
    /// Submit succeeded; the form is closed and the task is in the store
    Submitted { task_id: String },
    /// Dismissed without submitting
    Closed,
}

/// Everything that can happen to an open form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Edit(DraftEdit),
    ShowLabels,
    HideLabels,
    Submit,
    Close,
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error("task is invalid: {0}")]
    Invalid(#[from] ValidationError),
    #[error("module not found: {0}")]
    UnknownModule(String),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("form is already closed")]
    NotOpen,
}

/// What a submit needs from the outside world
pub struct FormContext<'a> {
    pub store: &'a mut Store,
    pub notifier: &'a mut dyn Notifier,
    pub limits: &'a Limits,
    /// Prefix for generated task IDs (`T` gives `T-001`)
    pub id_prefix: &'a str,
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    mode: FormMode,
    /// Module the form was opened from; new tasks are linked into it
    route: Option<String>,
    draft: TaskDraft,
    labels: LabelPicker,
    phase: FormPhase,
    violations: Vec<Violation>,
}

impl TaskForm {
    pub fn create(default_status: impl Into<String>, route: Option<String>) -> Self {
        TaskForm::new(FormMode::Create, TaskDraft::new(default_status), route)
    }

    pub fn edit(task: Task) -> Self {
        let draft = TaskDraft::from_task(&task);
        TaskForm::new(FormMode::Edit(task), draft, None)
    }

    fn new(mode: FormMode, draft: TaskDraft, route: Option<String>) -> Self {
        TaskForm {
            mode,
            route,
            draft,
            labels: LabelPicker::default(),
            phase: FormPhase::Open,
            violations: Vec::new(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn heading(&self) -> &'static str {
        if self.is_edit() {
            "Update Task"
        } else {
            "Create Task"
        }
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == FormPhase::Open
    }

    pub fn label_picker(&self) -> &LabelPicker {
        &self.labels
    }

    pub fn label_picker_mut(&mut self) -> &mut LabelPicker {
        &mut self.labels
    }

    /// Rule failures from the last rejected submit
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Dispatch one event. Returns the phase the form is in afterwards.
    pub fn dispatch(
        &mut self,
        event: FormEvent,
        ctx: &mut FormContext<'_>,
    ) -> Result<&FormPhase, FormError> {
        if !self.is_open() {
            return Err(FormError::NotOpen);
        }
        match event {
            FormEvent::Edit(edit) => self.apply(edit)?,
            FormEvent::ShowLabels => self.labels.open(),
            FormEvent::HideLabels => self.labels.close(),
            FormEvent::Submit => {
                self.submit(ctx)?;
            }
            FormEvent::Close => self.close(),
        }
        Ok(&self.phase)
    }

    /// Apply a field edit. A rejected edit leaves the draft as it was.
    pub fn apply(&mut self, edit: DraftEdit) -> Result<(), FormError> {
        if !self.is_open() {
            return Err(FormError::NotOpen);
        }
        self.draft = reduce(&self.draft, edit)?;
        Ok(())
    }

    /// Discard the draft. The store is never touched.
    pub fn close(&mut self) {
        if self.is_open() {
            tracing::debug!(edit = self.is_edit(), "task form closed");
            self.labels.close();
            self.phase = FormPhase::Closed;
        }
    }

    /// Validate the draft and commit it. On success the form closes and the
    /// task ID is returned; on failure the store is unchanged and the form
    /// stays open.
    pub fn submit(&mut self, ctx: &mut FormContext<'_>) -> Result<String, FormError> {
        if !self.is_open() {
            return Err(FormError::NotOpen);
        }
        let result = match &self.mode {
            FormMode::Create => self.submit_create(ctx),
            FormMode::Edit(old_task) => self.submit_edit(old_task, ctx),
        };
        match result {
            Ok(task_id) => {
                self.violations.clear();
                self.labels.close();
                self.phase = FormPhase::Submitted {
                    task_id: task_id.clone(),
                };
                Ok(task_id)
            }
            Err(FormError::Invalid(err)) => {
                tracing::debug!(%err, "task form rejected");
                ctx.notifier.show_toast(Toast::error(err.to_string()));
                self.violations = err.violations.clone();
                Err(FormError::Invalid(err))
            }
            Err(err) => Err(err),
        }
    }

    fn submit_create(&self, ctx: &mut FormContext<'_>) -> Result<String, FormError> {
        if let Some(module_id) = &self.route
            && ctx.store.module(module_id).is_none()
        {
            ctx.notifier
                .show_toast(Toast::error(format!("Module {} not found", module_id)));
            return Err(FormError::UnknownModule(module_id.clone()));
        }

        let schema = TaskSchema::for_store(ctx.limits, ctx.store);
        let Some(id) = ctx.store.next_task_id(ctx.id_prefix) else {
            ctx.notifier.show_toast(Toast::error(format!(
                "No task IDs left for prefix {}",
                ctx.id_prefix
            )));
            return Err(TaskError::IdsExhausted(ctx.id_prefix.to_string()).into());
        };
        let task = create_and_validate(&schema, Task::new(id), |task| {
            self.draft.apply_to(task)
        })?;
        let task_id = task.id.clone();

        create_task(ctx.store, ctx.notifier, task)?;
        if let Some(module_id) = &self.route {
            ctx.store
                .set_modules(|modules| prepend_task(modules, module_id, &task_id));
        }
        Ok(task_id)
    }

    fn submit_edit(&self, old_task: &Task, ctx: &mut FormContext<'_>) -> Result<String, FormError> {
        let schema = TaskSchema::for_store(ctx.limits, ctx.store);
        let mut candidate = old_task.clone();
        self.draft.apply_to(&mut candidate);
        schema.validate(&candidate)?;

        edit_task(ctx.store, ctx.notifier, &self.draft, old_task)?;
        Ok(old_task.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::label::Label;
    use crate::model::module::Module;
    use crate::notify::{ToastKind, ToastLog};

    fn store() -> Store {
        let mut store = Store::with_statuses(&["todo", "done"]);
        store.labels = vec![Label::new("bug"), Label::new("ui")];
        store
    }

    fn submit(form: &mut TaskForm, store: &mut Store, toasts: &mut ToastLog) -> Result<String, FormError> {
        let limits = Limits::default();
        let mut ctx = FormContext {
            store,
            notifier: toasts,
            limits: &limits,
            id_prefix: "T",
        };
        form.submit(&mut ctx)
    }

    #[test]
    fn test_create_form_starts_blank() {
        let form = TaskForm::create("todo", None);
        assert_eq!(form.draft(), &TaskDraft::new("todo"));
        assert_eq!(form.heading(), "Create Task");
        assert!(!form.label_picker().is_visible());
    }

    #[test]
    fn test_create_submit_adds_task_and_closes() {
        let mut store = store();
        let mut toasts = ToastLog::default();
        let mut form = TaskForm::create("todo", None);
        form.apply(DraftEdit::Title("Write docs".into())).unwrap();

        let id = submit(&mut form, &mut store, &mut toasts).unwrap();
        assert_eq!(id, "T-001");
        assert_eq!(store.tasks.len(), 1);
        assert_eq!(store.tasks[0].title, "Write docs");
        assert_eq!(
            form.phase(),
            &FormPhase::Submitted {
                task_id: "T-001".into()
            }
        );
        assert_eq!(toasts.latest().unwrap().kind, ToastKind::Success);
    }

    #[test]
    fn test_invalid_submit_keeps_form_open() {
        let mut store = store();
        let before = store.clone();
        let mut toasts = ToastLog::default();
        let mut form = TaskForm::create("todo", None);

        let err = submit(&mut form, &mut store, &mut toasts).unwrap_err();
        assert!(matches!(err, FormError::Invalid(_)));
        assert_eq!(store, before);
        assert!(form.is_open());
        assert_eq!(form.violations()[0].field, "title");
        assert_eq!(toasts.latest().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn test_route_prepends_new_task() {
        let mut store = store();
        let mut t1 = Task::new("T-001");
        t1.title = "First".into();
        t1.status = "todo".into();
        store.tasks.push(t1);
        let mut m1 = Module::new("m1", "One");
        m1.tasks = vec!["T-001".into()];
        store.modules.push(m1);

        let mut toasts = ToastLog::default();
        let mut form = TaskForm::create("todo", Some("m1".into()));
        form.apply(DraftEdit::Title("Second".into())).unwrap();
        submit(&mut form, &mut store, &mut toasts).unwrap();

        assert_eq!(store.module("m1").unwrap().tasks, vec!["T-002", "T-001"]);
    }

    #[test]
    fn test_unknown_route_is_rejected_without_mutation() {
        let mut store = store();
        let before = store.clone();
        let mut toasts = ToastLog::default();
        let mut form = TaskForm::create("todo", Some("ghost".into()));
        form.apply(DraftEdit::Title("Orphan".into())).unwrap();

        let err = submit(&mut form, &mut store, &mut toasts).unwrap_err();
        assert!(matches!(err, FormError::UnknownModule(id) if id == "ghost"));
        assert_eq!(store, before);
    }

    #[test]
    fn test_exhausted_ids_reject_create() {
        let mut store = store();
        let mut last = Task::new("T-4294967295");
        last.title = "Last".into();
        last.status = "todo".into();
        store.tasks.push(last);
        let before = store.clone();

        let mut toasts = ToastLog::default();
        let mut form = TaskForm::create("todo", None);
        form.apply(DraftEdit::Title("One more".into())).unwrap();

        let err = submit(&mut form, &mut store, &mut toasts).unwrap_err();
        assert!(matches!(err, FormError::Task(TaskError::IdsExhausted(ref p)) if p == "T"));
        assert_eq!(store, before);
        assert!(form.is_open());
        assert_eq!(toasts.latest().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn test_edit_form_prefills_and_updates() {
        let mut store = store();
        let mut task = Task::new("T-003");
        task.title = "Old".into();
        task.status = "todo".into();
        task.labels = vec![Label::new("bug")];
        store.tasks.push(task.clone());

        let mut form = TaskForm::edit(task.clone());
        assert_eq!(form.heading(), "Update Task");
        assert_eq!(form.draft(), &TaskDraft::from_task(&task));

        form.apply(DraftEdit::Status("done".into())).unwrap();
        let mut toasts = ToastLog::default();
        submit(&mut form, &mut store, &mut toasts).unwrap();
        let saved = store.task("T-003").unwrap();
        assert_eq!(saved.status, "done");
        assert_eq!(saved.title, "Old");
    }

    #[test]
    fn test_invalid_edit_leaves_store_alone() {
        let mut store = store();
        let mut task = Task::new("T-003");
        task.title = "Old".into();
        task.status = "todo".into();
        store.tasks.push(task.clone());
        let before = store.clone();

        let mut form = TaskForm::edit(task);
        form.apply(DraftEdit::Title(String::new())).unwrap();
        let mut toasts = ToastLog::default();
        assert!(submit(&mut form, &mut store, &mut toasts).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_closed_form_refuses_events() {
        let mut store = store();
        let before = store.clone();
        let mut toasts = ToastLog::default();
        let limits = Limits::default();
        let mut form = TaskForm::create("todo", None);
        form.apply(DraftEdit::Title("Never saved".into())).unwrap();

        let mut ctx = FormContext {
            store: &mut store,
            notifier: &mut toasts,
            limits: &limits,
            id_prefix: "T",
        };
        assert_eq!(form.dispatch(FormEvent::ShowLabels, &mut ctx).unwrap(), &FormPhase::Open);
        assert_eq!(form.dispatch(FormEvent::Close, &mut ctx).unwrap(), &FormPhase::Closed);
        assert!(matches!(
            form.dispatch(FormEvent::Submit, &mut ctx),
            Err(FormError::NotOpen)
        ));
        assert_eq!(store, before);
    }
}
