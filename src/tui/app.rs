use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::form::{DraftEdit, FormContext, FormError, FormEvent, FormPhase, TaskForm};
use crate::io::lock::FileLock;
use crate::io::project_io::{self, ProjectError, discover_project, load_project};
use crate::io::recovery;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::watcher::{BoardWatcher, FileEvent};
use crate::logging::{self, LogTarget};
use crate::model::{Project, Store, Task};
use crate::notify::{Notifier, Toast, ToastLog};
use crate::ops::search::{TaskFilter, compile_pattern, filter_tasks};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
}

/// Focusable rows of the task form, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Status,
    DueDate,
    Labels,
    Save,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Title,
        FormField::Description,
        FormField::Status,
        FormField::DueDate,
        FormField::Labels,
        FormField::Save,
    ];

    fn index(self) -> usize {
        FormField::ALL
            .iter()
            .position(|f| *f == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Self {
        FormField::ALL[(self.index() + 1) % FormField::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let len = FormField::ALL.len();
        FormField::ALL[(self.index() + len - 1) % len]
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Status => "Status",
            FormField::DueDate => "Due date",
            FormField::Labels => "Labels",
            FormField::Save => "Save",
        }
    }
}

/// An open task form plus the TUI-only state around it
#[derive(Debug, Clone)]
pub struct FormView {
    pub form: TaskForm,
    pub focus: FormField,
    /// Raw due-date text; parsed into the draft when focus leaves the field
    pub date_input: String,
    /// Text the draft's due date was last shown as. Leaving the field with
    /// this text untouched keeps the stored time of day.
    date_shown: String,
}

impl FormView {
    fn new(form: TaskForm) -> Self {
        let date_input = crate::model::format_due_day(form.draft().due_date);
        FormView {
            form,
            focus: FormField::Title,
            date_shown: date_input.clone(),
            date_input,
        }
    }
}

/// How a save of the in-memory store ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Persisted {
    Saved,
    /// Another writer changed store.json since we last read it
    Conflict,
    Failed,
}

/// Main application state
pub struct App {
    pub project: Project,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    /// Module the board is filtered to; new tasks are linked into it
    pub route: Option<String>,
    pub cursor: usize,
    pub form: Option<FormView>,
    pub toasts: ToastLog,
    /// Search mode: current query being typed
    pub search_input: String,
    /// Last executed search pattern, applied as a board filter
    pub last_search: Option<String>,
    /// An external write arrived while a form was open
    pub pending_reload: bool,
    pub ui_state: UiState,
    /// store.json as last read or written by this process
    disk_store: Store,
}

impl App {
    pub fn new(project: Project) -> Self {
        let theme = Theme::from_config(&project.config.ui);
        let disk_store = project.store.clone();
        App {
            project,
            theme,
            mode: Mode::Navigate,
            should_quit: false,
            route: None,
            cursor: 0,
            form: None,
            toasts: ToastLog::default(),
            search_input: String::new(),
            last_search: None,
            pending_reload: false,
            ui_state: UiState::default(),
            disk_store,
        }
    }

    // -----------------------------------------------------------------------
    // Board
    // -----------------------------------------------------------------------

    /// Get the active search regex for filtering and highlighting.
    /// In Search mode: compiles from current input. In Navigate: from last_search.
    pub fn active_search_re(&self) -> Option<Regex> {
        let pattern = match self.mode {
            Mode::Search if !self.search_input.is_empty() => &self.search_input,
            Mode::Navigate => self.last_search.as_deref()?,
            _ => return None,
        };
        compile_pattern(pattern)
    }

    /// Tasks shown on the board: the current route's tasks in module order,
    /// narrowed by the last search
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let pattern = self.last_search.as_deref().and_then(compile_pattern);
        let filter = TaskFilter {
            module: self.route.as_deref(),
            pattern: pattern.as_ref(),
            ..Default::default()
        };
        filter_tasks(&self.project.store, &filter)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.cursor).copied()
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible_tasks().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn move_cursor_down(&mut self) {
        let len = self.visible_tasks().len();
        if len > 0 {
            self.cursor = (self.cursor + 1).min(len - 1);
        }
    }

    pub fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Title of the current route, or "All tasks" for the unfiltered board
    pub fn route_title(&self) -> &str {
        match &self.route {
            Some(id) => self
                .project
                .store
                .module(id)
                .map_or(id.as_str(), |m| m.title.as_str()),
            None => "All tasks",
        }
    }

    /// Switch to another route, remembering the cursor of the one we leave
    pub fn set_route(&mut self, route: Option<String>) {
        self.ui_state.set_cursor(self.route.as_deref(), self.cursor);
        self.cursor = self.ui_state.cursor_for(route.as_deref());
        self.route = route;
        self.clamp_cursor();
    }

    /// All tasks → first module → ... → last module → All tasks
    pub fn cycle_route(&mut self) {
        let modules = &self.project.store.modules;
        let next = match &self.route {
            None => modules.first().map(|m| m.id.clone()),
            Some(current) => modules
                .iter()
                .position(|m| &m.id == current)
                .and_then(|i| modules.get(i + 1))
                .map(|m| m.id.clone()),
        };
        self.set_route(next);
    }

    // -----------------------------------------------------------------------
    // Task form
    // -----------------------------------------------------------------------

    /// Open the create form; the task will be linked into the current route
    pub fn open_create_form(&mut self) {
        let form = TaskForm::create(
            self.project.config.statuses.default.clone(),
            self.route.clone(),
        );
        self.form = Some(FormView::new(form));
    }

    pub fn open_edit_form(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            self.toasts.show_toast(Toast::info("No task selected"));
            return;
        };
        self.form = Some(FormView::new(TaskForm::edit(task)));
    }

    /// Send one event to the open form and react to the phase it ends in.
    pub fn dispatch_form(&mut self, event: FormEvent) {
        if event == FormEvent::Submit && self.pending_reload {
            self.apply_reload();
        }
        let Some(view) = self.form.as_mut() else {
            return;
        };
        let before_submit = (event == FormEvent::Submit).then(|| view.clone());
        let mut ctx = FormContext {
            store: &mut self.project.store,
            notifier: &mut self.toasts,
            limits: &self.project.config.limits,
            id_prefix: &self.project.config.ids.task_prefix,
        };
        let outcome = view.form.dispatch(event, &mut ctx).cloned();

        match outcome {
            Ok(FormPhase::Open) => {}
            Ok(FormPhase::Submitted { task_id }) => {
                self.form = None;
                match self.persist() {
                    Persisted::Saved | Persisted::Failed => self.select_task(&task_id),
                    // Hand the draft back so it can be submitted against the fresh board
                    Persisted::Conflict => self.form = before_submit,
                }
            }
            Ok(FormPhase::Closed) => {
                self.form = None;
                if self.pending_reload {
                    self.apply_reload();
                }
            }
            // Already reported through the notifier
            Err(FormError::Invalid(_) | FormError::UnknownModule(_) | FormError::Task(_)) => {}
            Err(err) => self.toasts.show_toast(Toast::error(err.to_string())),
        }
    }

    pub fn form_edit(&mut self, edit: DraftEdit) {
        self.dispatch_form(FormEvent::Edit(edit));
    }

    /// Parse the typed due date into the draft. Returns false (and leaves
    /// the draft alone) when the text is not a date. Unchanged text is not
    /// re-parsed, so a stored time of day survives tabbing through the field.
    pub fn commit_date_input(&mut self) -> bool {
        let Some(view) = self.form.as_mut() else {
            return false;
        };
        if view.date_input == view.date_shown {
            return true;
        }
        match view.form.apply(DraftEdit::DueDate(view.date_input.clone())) {
            Ok(()) => {
                view.date_input = crate::model::format_due_day(view.form.draft().due_date);
                view.date_shown = view.date_input.clone();
                true
            }
            Err(err) => {
                self.toasts.show_toast(Toast::error(err.to_string()));
                false
            }
        }
    }

    /// Move form focus, committing the date text when leaving its field
    pub fn set_form_focus(&mut self, field: FormField) {
        let leaving_date = self
            .form
            .as_ref()
            .is_some_and(|v| v.focus == FormField::DueDate && field != FormField::DueDate);
        if leaving_date && !self.commit_date_input() {
            return;
        }
        if let Some(view) = self.form.as_mut() {
            view.focus = field;
        }
    }

    pub fn submit_form(&mut self) {
        let on_date = self
            .form
            .as_ref()
            .is_some_and(|v| v.focus == FormField::DueDate);
        if on_date && !self.commit_date_input() {
            return;
        }
        self.dispatch_form(FormEvent::Submit);
    }

    fn select_task(&mut self, task_id: &str) {
        if let Some(idx) = self.visible_tasks().iter().position(|t| t.id == task_id) {
            self.cursor = idx;
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write the store under the board lock, reporting failures as toasts.
    ///
    /// store.json is re-read under the lock first. If another writer changed
    /// it since this process last saw it, nothing is written: the board is
    /// reloaded from disk instead.
    fn persist(&mut self) -> Persisted {
        let board_dir = self.project.board_dir.clone();
        let _lock = match FileLock::acquire_default(&board_dir) {
            Ok(lock) => lock,
            Err(e) => {
                self.toasts.show_toast(Toast::error(e.to_string()));
                return Persisted::Failed;
            }
        };
        match project_io::load_store(&board_dir, &self.project.config) {
            Ok(on_disk) if on_disk != self.disk_store => {
                tracing::warn!(tasks = on_disk.tasks.len(), "store changed on disk, save refused");
                self.adopt_store(on_disk);
                self.toasts.show_toast(Toast::error(
                    "Board changed on disk and was reloaded; save again to apply your change",
                ));
                return Persisted::Conflict;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "store unreadable, save refused");
                self.toasts
                    .show_toast(Toast::error(format!("Save failed: {}", e)));
                return Persisted::Failed;
            }
        }
        match project_io::save_store(&board_dir, &self.project.store) {
            Ok(()) => {
                self.disk_store = self.project.store.clone();
                Persisted::Saved
            }
            Err(e) => {
                self.toasts.show_toast(Toast::error(e.to_string()));
                Persisted::Failed
            }
        }
    }

    /// Replace the board with a store read from disk
    fn adopt_store(&mut self, store: Store) {
        self.disk_store = store.clone();
        self.project.store = store;
        if let Some(route) = &self.route
            && self.project.store.module(route).is_none()
        {
            self.route = None;
        }
        self.clamp_cursor();
    }

    /// Re-read store.json after another process wrote it. Deferred while a
    /// form is open.
    pub fn reload_store(&mut self) {
        if self.form.as_ref().is_some_and(|v| v.form.is_open()) {
            tracing::debug!("reload deferred until the form closes");
            self.pending_reload = true;
            return;
        }
        self.apply_reload();
    }

    fn apply_reload(&mut self) {
        self.pending_reload = false;

        match project_io::load_store(&self.project.board_dir, &self.project.config) {
            Ok(store) if store == self.project.store => self.disk_store = store,
            Ok(store) => {
                tracing::info!(tasks = store.tasks.len(), "store reloaded");
                self.adopt_store(store);
                self.toasts.show_toast(Toast::info("Board reloaded"));
            }
            Err(e) => {
                tracing::warn!(error = %e, "store reload failed");
                if let ProjectError::StoreParseError { source, .. } = &e {
                    recovery::log_unreadable_store(&self.project.board_dir, &source.to_string());
                }
                self.toasts
                    .show_toast(Toast::error(format!("Reload failed: {}", e)));
            }
        }
    }

    pub fn handle_file_events(&mut self, events: Vec<FileEvent>) {
        let mut changed = false;
        for FileEvent::Changed(paths) in events {
            tracing::debug!(?paths, "board files changed");
            changed = true;
        }
        if changed {
            self.reload_store();
        }
    }
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App) {
    let Some(state) = read_ui_state(&app.project.board_dir) else {
        return;
    };
    let route = state
        .route
        .clone()
        .filter(|id| app.project.store.module(id).is_some());
    app.cursor = state.cursor_for(route.as_deref());
    app.route = route;
    app.ui_state = state;
    app.clamp_cursor();
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &mut App) {
    app.ui_state.route = app.route.clone();
    app.ui_state.set_cursor(app.route.as_deref(), app.cursor);
    if let Err(e) = write_ui_state(&app.project.board_dir, &app.ui_state) {
        tracing::warn!(error = %e, "could not save UI state");
    }
}

/// Run the TUI application
pub fn run(project_dir: Option<&str>, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let start = match project_dir {
        Some(d) => std::fs::canonicalize(d)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", d, e))?,
        None => std::env::current_dir()?,
    };
    let root: PathBuf = discover_project(&start)?;
    let project = load_project(&root)?;

    // The terminal belongs to the board, so tracing goes to a file
    logging::init(
        LogTarget::File(&project.board_dir.join(".debug.log")),
        verbose,
    );

    let watcher = match BoardWatcher::start(&project.board_dir) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "file watching disabled");
            None
        }
    };

    let mut app = App::new(project);
    restore_ui_state(&mut app);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    save_ui_state(&mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&BoardWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if let Some(watcher) = watcher {
            let events = watcher.poll();
            if !events.is_empty() {
                app.handle_file_events(events);
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Module;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn test_focus_order_wraps() {
        assert_eq!(FormField::Title.next(), FormField::Description);
        assert_eq!(FormField::Save.next(), FormField::Title);
        assert_eq!(FormField::Title.prev(), FormField::Save);
    }

    #[test]
    fn test_cycle_route_visits_every_module_then_all() {
        let mut app = app_with_tasks();
        assert_eq!(app.route, None);
        app.cycle_route();
        assert_eq!(app.route.as_deref(), Some("auth"));
        app.cycle_route();
        assert_eq!(app.route.as_deref(), Some("billing"));
        app.cycle_route();
        assert_eq!(app.route, None);
    }

    #[test]
    fn test_route_restricts_visible_tasks_in_module_order() {
        let mut app = app_with_tasks();
        app.set_route(Some("auth".into()));
        let ids: Vec<&str> = app.visible_tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["T-002", "T-001"]);
        assert_eq!(app.route_title(), "Authentication");
    }

    #[test]
    fn test_cursor_is_remembered_per_route() {
        let mut app = app_with_tasks();
        app.move_cursor_down();
        app.move_cursor_down();
        assert_eq!(app.cursor, 2);
        app.set_route(Some("auth".into()));
        assert_eq!(app.cursor, 0);
        app.set_route(None);
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn test_search_narrows_the_board() {
        let mut app = app_with_tasks();
        app.last_search = Some("invoice".into());
        let ids: Vec<&str> = app.visible_tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["T-003"]);
    }

    #[test]
    fn test_create_from_route_links_task_first() {
        let mut app = app_with_tasks();
        app.set_route(Some("billing".into()));
        app.open_create_form();
        app.form_edit(DraftEdit::Title("Refunds".into()));
        app.submit_form();

        assert!(app.form.is_none());
        let billing = app.project.store.module("billing").unwrap();
        assert_eq!(billing.tasks, vec!["T-004", "T-003"]);
        assert_eq!(app.selected_task().unwrap().id, "T-004");
    }

    #[test]
    fn test_invalid_submit_keeps_form_and_store() {
        let mut app = app_with_tasks();
        let before = app.project.store.clone();
        app.open_create_form();
        app.submit_form();

        assert!(app.form.is_some());
        assert_eq!(app.project.store, before);
        assert!(app.toasts.latest().unwrap().message.contains("title"));
    }

    #[test]
    fn test_bad_date_blocks_focus_change() {
        let mut app = app_with_tasks();
        app.open_create_form();
        app.set_form_focus(FormField::DueDate);
        if let Some(view) = app.form.as_mut() {
            view.date_input = "next week".into();
        }
        app.set_form_focus(FormField::Labels);

        let view = app.form.as_ref().unwrap();
        assert_eq!(view.focus, FormField::DueDate);
        assert_eq!(view.form.draft().due_date, None);
    }

    #[test]
    fn test_reload_is_deferred_while_form_open() {
        let mut app = app_with_tasks();
        app.open_create_form();
        app.reload_store();
        assert!(app.pending_reload);
        assert_eq!(app.project.store.tasks.len(), 3);
    }

    #[test]
    fn test_reload_drops_route_to_deleted_module() {
        let mut app = app_with_tasks();
        app.set_route(Some("auth".into()));
        app.project.store.modules.push(Module::new("gone", "Gone"));
        app.route = Some("gone".into());
        // No store.json on disk: reload yields a freshly seeded store
        app.reload_store();
        assert_eq!(app.route, None);
        assert!(app.project.store.tasks.is_empty());
    }

    #[test]
    fn test_broken_store_keeps_board_and_logs_text() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut app = app_with_tasks();
        app.project.board_dir = tmp.path().to_path_buf();
        std::fs::write(tmp.path().join("store.json"), "{ oops").unwrap();

        app.reload_store();

        assert_eq!(app.project.store.tasks.len(), 3);
        assert!(app.toasts.latest().unwrap().message.starts_with("Reload failed"));
        let entries = recovery::read_recovery_entries(tmp.path(), None);
        assert_eq!(entries[0].category, recovery::RecoveryCategory::Parser);
        assert_eq!(entries[0].body, "{ oops");
    }

    /// The test board pointed at a real directory, with store.json matching
    /// what the app holds.
    fn app_on_disk(tmp: &tempfile::TempDir) -> App {
        let mut app = app_with_tasks();
        app.project.board_dir = tmp.path().to_path_buf();
        project_io::save_store(tmp.path(), &app.project.store).unwrap();
        app.disk_store = app.project.store.clone();
        app
    }

    #[test]
    fn test_submit_saves_store_to_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut app = app_on_disk(&tmp);
        app.open_create_form();
        app.form_edit(DraftEdit::Title("Write docs".into()));
        app.submit_form();

        assert!(app.form.is_none());
        let on_disk = project_io::load_store(tmp.path(), &app.project.config).unwrap();
        assert_eq!(on_disk, app.project.store);
        assert_eq!(on_disk.task("T-004").unwrap().title, "Write docs");
    }

    #[test]
    fn test_submit_after_outside_write_keeps_both_changes() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut app = app_on_disk(&tmp);

        // Another tb process adds a task while the TUI still shows the old board
        let mut other = app.project.store.clone();
        let mut added = Task::new("T-004");
        added.title = "From CLI".into();
        added.status = "todo".into();
        other.tasks.push(added);
        project_io::save_store(tmp.path(), &other).unwrap();

        app.open_create_form();
        app.form_edit(DraftEdit::Title("From TUI".into()));
        app.submit_form();

        // Refused: disk untouched, board reloaded, draft handed back
        let on_disk = project_io::load_store(tmp.path(), &app.project.config).unwrap();
        assert_eq!(on_disk, other);
        assert_eq!(app.project.store, other);
        let view = app.form.as_ref().unwrap();
        assert_eq!(view.form.draft().title, "From TUI");
        assert!(view.form.is_open());
        assert!(app.toasts.latest().unwrap().message.contains("changed on disk"));

        app.submit_form();

        assert!(app.form.is_none());
        let on_disk = project_io::load_store(tmp.path(), &app.project.config).unwrap();
        assert_eq!(on_disk.tasks.len(), 5);
        assert_eq!(on_disk.task("T-004").unwrap().title, "From CLI");
        assert_eq!(on_disk.task("T-005").unwrap().title, "From TUI");
    }
}
