use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::form::{DraftEdit, FormEvent};
use crate::notify::{Notifier, Toast};
use crate::tui::app::{App, FormField};
use crate::util::unicode;

/// Longest accepted due-date text (an RFC 3339 timestamp with offset)
const DATE_INPUT_MAX: usize = 25;

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    let Some(view) = app.form.as_ref() else {
        return;
    };
    let focus = view.focus;

    if view.form.label_picker().is_visible() {
        handle_label_picker(app, key);
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('s') {
            app.submit_form();
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.dispatch_form(FormEvent::Close),
        KeyCode::Tab => app.set_form_focus(focus.next()),
        KeyCode::BackTab => app.set_form_focus(focus.prev()),
        _ => match focus {
            FormField::Title | FormField::Description => handle_text_field(app, focus, key),
            FormField::Status => handle_status(app, key),
            FormField::DueDate => handle_date(app, key),
            FormField::Labels => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    app.dispatch_form(FormEvent::ShowLabels);
                }
            }
            FormField::Save => {
                if key.code == KeyCode::Enter {
                    app.submit_form();
                }
            }
        },
    }
}

/// Typing and backspace at the end of the title or description. Input past
/// the configured limit is dropped before it reaches the draft.
fn handle_text_field(app: &mut App, field: FormField, key: KeyEvent) {
    let Some(view) = app.form.as_ref() else {
        return;
    };
    let limits = &app.project.config.limits;
    let (mut value, limit) = match field {
        FormField::Title => (view.form.draft().title.clone(), limits.task_title),
        _ => (
            view.form.draft().description.clone(),
            limits.task_description,
        ),
    };

    match key.code {
        KeyCode::Char(c) => {
            if !unicode::push_within_limit(&mut value, c, limit) {
                return;
            }
        }
        KeyCode::Backspace => unicode::pop_grapheme(&mut value),
        KeyCode::Enter => {
            app.set_form_focus(field.next());
            return;
        }
        _ => return,
    }

    let edit = match field {
        FormField::Title => DraftEdit::Title(value),
        _ => DraftEdit::Description(value),
    };
    app.form_edit(edit);
}

fn handle_status(app: &mut App, key: KeyEvent) {
    let step: isize = match key.code {
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => 1,
        KeyCode::Left | KeyCode::Char('h') => -1,
        KeyCode::Enter => {
            app.set_form_focus(FormField::Status.next());
            return;
        }
        _ => return,
    };
    let Some(view) = app.form.as_ref() else {
        return;
    };
    let names = app.project.store.status_names();
    if names.is_empty() {
        app.toasts
            .show_toast(Toast::error("No statuses defined (add one with `tb status add`)"));
        return;
    }
    let len = names.len() as isize;
    let current = names
        .iter()
        .position(|n| *n == view.form.draft().status)
        .map_or(if step > 0 { -1 } else { 0 }, |i| i as isize);
    let next = (current + step).rem_euclid(len) as usize;
    app.form_edit(DraftEdit::Status(names[next].clone()));
}

fn handle_date(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Enter {
        app.set_form_focus(FormField::DueDate.next());
        return;
    }
    let Some(view) = app.form.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char(c) => {
            unicode::push_within_limit(&mut view.date_input, c, DATE_INPUT_MAX);
        }
        KeyCode::Backspace => unicode::pop_grapheme(&mut view.date_input),
        _ => {}
    }
}

fn handle_label_picker(app: &mut App, key: KeyEvent) {
    let catalog_len = app.project.store.labels.len();
    let Some(view) = app.form.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => view.form.label_picker_mut().move_down(catalog_len),
        KeyCode::Char('k') | KeyCode::Up => view.form.label_picker_mut().move_up(),
        KeyCode::Char(' ') => {
            let edit = view
                .form
                .label_picker()
                .toggle_at_cursor(&app.project.store.labels, &view.form.draft().labels);
            if let Some(edit) = edit {
                app.form_edit(edit);
            }
        }
        KeyCode::Esc | KeyCode::Enter => app.dispatch_form(FormEvent::HideLabels),
        _ => {}
    }
}
