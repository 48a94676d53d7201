//! Behavioral properties of the task form, driven through the public API
//! against an in-memory store.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use taskboard::form::{DraftEdit, FormContext, FormError, FormEvent, FormPhase, TaskForm};
use taskboard::model::config::Limits;
use taskboard::model::label::Label;
use taskboard::model::module::Module;
use taskboard::model::store::Store;
use taskboard::model::task::Task;
use taskboard::notify::{ToastKind, ToastLog};

fn seeded_store() -> Store {
    let mut store = Store::with_statuses(&["todo", "in-progress", "done"]);
    store.labels = vec![
        Label::new("bug").with_color("#FF4444"),
        Label::new("ui"),
        Label::new("infra"),
    ];
    let mut existing = Task::new("T-001");
    existing.title = "Existing".into();
    existing.status = "todo".into();
    store.tasks.push(existing);
    let mut module = Module::new("m1", "Module one");
    module.tasks.push("T-001".into());
    store.modules.push(module);
    store
}

fn dispatch(
    form: &mut TaskForm,
    event: FormEvent,
    store: &mut Store,
    toasts: &mut ToastLog,
) -> Result<FormPhase, FormError> {
    let limits = Limits::default();
    let mut ctx = FormContext {
        store,
        notifier: toasts,
        limits: &limits,
        id_prefix: "T",
    };
    form.dispatch(event, &mut ctx).cloned()
}

fn toggle(title: &str, checked: bool) -> FormEvent {
    FormEvent::Edit(DraftEdit::ToggleLabel {
        label: Label::new(title),
        checked,
    })
}

fn label_titles(labels: &[Label]) -> Vec<&str> {
    labels.iter().map(|l| l.title.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn test_valid_create_adds_exactly_one_task_matching_the_draft() {
    let drafts: Vec<Vec<FormEvent>> = vec![
        vec![FormEvent::Edit(DraftEdit::Title("Fix login".into()))],
        vec![
            FormEvent::Edit(DraftEdit::Title("Ship".into())),
            FormEvent::Edit(DraftEdit::Description("Before Friday".into())),
            FormEvent::Edit(DraftEdit::Status("done".into())),
            FormEvent::Edit(DraftEdit::DueDate("2025-03-09".into())),
            toggle("ui", true),
            toggle("bug", true),
            toggle("ui", true),
        ],
        vec![
            FormEvent::Edit(DraftEdit::Title("x".repeat(50))),
            FormEvent::Edit(DraftEdit::Description("d".repeat(300))),
        ],
    ];

    for events in drafts {
        let mut store = seeded_store();
        let mut toasts = ToastLog::default();
        let mut form = TaskForm::create("todo", None);
        for event in events {
            dispatch(&mut form, event, &mut store, &mut toasts).unwrap();
        }
        let draft = form.draft().clone();
        let before = store.tasks.len();

        let phase = dispatch(&mut form, FormEvent::Submit, &mut store, &mut toasts).unwrap();
        let FormPhase::Submitted { task_id } = phase else {
            panic!("expected submit to succeed, got {:?}", phase);
        };

        assert_eq!(store.tasks.len(), before + 1);
        let created = store.task(&task_id).unwrap();
        assert_eq!(created.title, draft.title);
        assert_eq!(created.description, draft.description);
        assert_eq!(created.status, draft.status);
        assert_eq!(created.due_date, draft.due_date);
        assert_eq!(label_titles(&created.labels), label_titles(&draft.labels));

        let mut titles = label_titles(&created.labels);
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), created.labels.len());
    }
}

#[test]
fn test_create_parses_due_date_as_midnight_utc() {
    let mut store = seeded_store();
    let mut toasts = ToastLog::default();
    let mut form = TaskForm::create("todo", None);
    dispatch(&mut form, FormEvent::Edit(DraftEdit::Title("Dated".into())), &mut store, &mut toasts).unwrap();
    dispatch(&mut form, FormEvent::Edit(DraftEdit::DueDate("2025-03-09".into())), &mut store, &mut toasts).unwrap();
    dispatch(&mut form, FormEvent::Submit, &mut store, &mut toasts).unwrap();

    let task = store.tasks.last().unwrap();
    assert_eq!(
        task.due_date,
        Some(Utc.with_ymd_and_hms(2025, 3, 9, 0, 0, 0).unwrap())
    );
}

#[test]
fn test_invalid_create_leaves_store_untouched() {
    let bad_titles = ["".to_string(), "   ".to_string(), "x".repeat(51)];

    for title in bad_titles {
        let mut store = seeded_store();
        let before = store.clone();
        let mut toasts = ToastLog::default();
        let mut form = TaskForm::create("todo", Some("m1".into()));
        dispatch(&mut form, FormEvent::Edit(DraftEdit::Title(title.clone())), &mut store, &mut toasts).unwrap();

        let err = dispatch(&mut form, FormEvent::Submit, &mut store, &mut toasts).unwrap_err();
        assert!(matches!(err, FormError::Invalid(_)), "title {:?}", title);
        assert_eq!(store, before);
        assert!(form.is_open());
        assert_eq!(toasts.latest().map(|t| t.kind), Some(ToastKind::Error));
    }
}

#[test]
fn test_overlong_description_is_rejected() {
    let mut store = seeded_store();
    let before = store.clone();
    let mut toasts = ToastLog::default();
    let mut form = TaskForm::create("todo", None);
    dispatch(&mut form, FormEvent::Edit(DraftEdit::Title("Fine".into())), &mut store, &mut toasts).unwrap();
    dispatch(&mut form, FormEvent::Edit(DraftEdit::Description("d".repeat(301))), &mut store, &mut toasts).unwrap();

    let err = dispatch(&mut form, FormEvent::Submit, &mut store, &mut toasts).unwrap_err();
    match err {
        FormError::Invalid(v) => assert!(v.has_field("description")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store, before);
}

#[test]
fn test_unparseable_date_is_a_typed_error_and_keeps_the_draft() {
    let mut store = seeded_store();
    let mut toasts = ToastLog::default();
    let mut form = TaskForm::create("todo", None);
    dispatch(&mut form, FormEvent::Edit(DraftEdit::DueDate("2025-03-09".into())), &mut store, &mut toasts).unwrap();
    let before = form.draft().clone();

    let err = dispatch(&mut form, FormEvent::Edit(DraftEdit::DueDate("soon".into())), &mut store, &mut toasts)
        .unwrap_err();
    assert!(matches!(err, FormError::Draft(_)));
    assert_eq!(form.draft(), &before);
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[test]
fn test_toggling_a_label_on_then_off_is_identity() {
    let starts: Vec<Vec<&str>> = vec![vec![], vec!["bug"], vec!["bug", "infra"]];

    for start in starts {
        for candidate in ["bug", "ui", "infra"] {
            if start.contains(&candidate) {
                continue;
            }
            let mut store = seeded_store();
            let mut toasts = ToastLog::default();
            let mut form = TaskForm::create("todo", None);
            for title in &start {
                dispatch(&mut form, toggle(title, true), &mut store, &mut toasts).unwrap();
            }
            let before = label_titles(&form.draft().labels)
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>();

            dispatch(&mut form, toggle(candidate, true), &mut store, &mut toasts).unwrap();
            dispatch(&mut form, toggle(candidate, false), &mut store, &mut toasts).unwrap();

            assert_eq!(label_titles(&form.draft().labels), before);
        }
    }
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

#[test]
fn test_edit_draft_mirrors_the_existing_task() {
    let mut task = Task::new("T-042");
    task.title = "Migrate DB".into();
    task.description = "Move to Postgres 16".into();
    task.status = "in-progress".into();
    task.due_date = Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap());
    task.labels = vec![Label::new("infra"), Label::new("bug").with_color("#FF4444")];

    let form = TaskForm::edit(task.clone());
    let draft = form.draft();
    assert_eq!(draft.title, task.title);
    assert_eq!(draft.description, task.description);
    assert_eq!(draft.status, task.status);
    assert_eq!(draft.due_date, task.due_date);
    assert_eq!(draft.labels, task.labels);
    assert_eq!(draft.labels[1].color.as_deref(), Some("#FF4444"));
}

#[test]
fn test_edit_is_validated_like_create() {
    let mut store = seeded_store();
    let before = store.clone();
    let mut toasts = ToastLog::default();
    let existing = store.task("T-001").unwrap().clone();
    let mut form = TaskForm::edit(existing);
    dispatch(&mut form, FormEvent::Edit(DraftEdit::Title(String::new())), &mut store, &mut toasts).unwrap();

    let err = dispatch(&mut form, FormEvent::Submit, &mut store, &mut toasts).unwrap_err();
    assert!(matches!(err, FormError::Invalid(_)));
    assert_eq!(store, before);
}

#[test]
fn test_edit_replaces_the_task_in_place() {
    let mut store = seeded_store();
    let mut toasts = ToastLog::default();
    let existing = store.task("T-001").unwrap().clone();
    let mut form = TaskForm::edit(existing);
    dispatch(&mut form, FormEvent::Edit(DraftEdit::Title("Renamed".into())), &mut store, &mut toasts).unwrap();
    dispatch(&mut form, FormEvent::Submit, &mut store, &mut toasts).unwrap();

    assert_eq!(store.tasks.len(), 1);
    assert_eq!(store.tasks[0].id, "T-001");
    assert_eq!(store.tasks[0].title, "Renamed");
    assert_eq!(store.modules[0].tasks, vec!["T-001"]);
}

// ---------------------------------------------------------------------------
// Modules
// ---------------------------------------------------------------------------

#[test]
fn test_create_from_module_route_prepends_to_that_module() {
    let mut store = seeded_store();
    store.modules.push(Module::new("m2", "Module two"));
    let mut toasts = ToastLog::default();
    let mut form = TaskForm::create("todo", Some("m1".into()));
    dispatch(&mut form, FormEvent::Edit(DraftEdit::Title("Second".into())), &mut store, &mut toasts).unwrap();

    let phase = dispatch(&mut form, FormEvent::Submit, &mut store, &mut toasts).unwrap();
    let FormPhase::Submitted { task_id } = phase else {
        panic!("expected submit to succeed");
    };

    assert_eq!(task_id, "T-002");
    assert_eq!(store.modules[0].tasks, vec!["T-002", "T-001"]);
    assert!(store.modules[1].tasks.is_empty());
}

#[test]
fn test_unknown_module_route_creates_nothing() {
    let mut store = seeded_store();
    let before = store.clone();
    let mut toasts = ToastLog::default();
    let mut form = TaskForm::create("todo", Some("ghost".into()));
    dispatch(&mut form, FormEvent::Edit(DraftEdit::Title("Orphan".into())), &mut store, &mut toasts).unwrap();

    let err = dispatch(&mut form, FormEvent::Submit, &mut store, &mut toasts).unwrap_err();
    assert!(matches!(err, FormError::UnknownModule(ref id) if id == "ghost"));
    assert_eq!(store, before);
}

// ---------------------------------------------------------------------------
// Close
// ---------------------------------------------------------------------------

#[test]
fn test_closing_before_submit_changes_nothing() {
    let mut store = seeded_store();
    let before = store.clone();
    let mut toasts = ToastLog::default();
    let mut form = TaskForm::create("todo", Some("m1".into()));
    dispatch(&mut form, FormEvent::Edit(DraftEdit::Title("Draft".into())), &mut store, &mut toasts).unwrap();
    dispatch(&mut form, toggle("bug", true), &mut store, &mut toasts).unwrap();
    dispatch(&mut form, FormEvent::ShowLabels, &mut store, &mut toasts).unwrap();

    let phase = dispatch(&mut form, FormEvent::Close, &mut store, &mut toasts).unwrap();
    assert_eq!(phase, FormPhase::Closed);
    assert_eq!(store, before);
    assert!(!form.label_picker().is_visible());

    let err = dispatch(&mut form, FormEvent::Submit, &mut store, &mut toasts).unwrap_err();
    assert!(matches!(err, FormError::NotOpen));
    assert_eq!(store, before);
}

#[test]
fn test_successful_submit_notifies_once() {
    let mut store = seeded_store();
    let mut toasts = ToastLog::default();
    let mut form = TaskForm::create("todo", None);
    dispatch(&mut form, FormEvent::Edit(DraftEdit::Title("Quiet".into())), &mut store, &mut toasts).unwrap();
    dispatch(&mut form, FormEvent::Submit, &mut store, &mut toasts).unwrap();

    let successes = toasts
        .iter()
        .filter(|t| t.kind == ToastKind::Success)
        .count();
    assert_eq!(successes, 1);
}
