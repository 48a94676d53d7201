use std::path::PathBuf;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::{Label, Module, Project, ProjectConfig, Store, Task};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// A project with default config and an empty seeded store. The board
/// directory does not exist, so saves fail with an error toast.
pub fn minimal_project() -> Project {
    let config: ProjectConfig = toml::from_str("[project]\nname = \"Test\"\n").unwrap();
    let store = Store::with_statuses(&config.statuses.seed);
    Project {
        root: PathBuf::from("/nonexistent/taskboard-test"),
        board_dir: PathBuf::from("/nonexistent/taskboard-test/board"),
        config,
        store,
    }
}

fn task(id: &str, title: &str, status: &str, labels: &[&str]) -> Task {
    let mut task = Task::new(id);
    task.title = title.into();
    task.status = status.into();
    task.labels = labels.iter().map(|l| Label::new(*l)).collect();
    task
}

/// Three tasks, labels `bug` and `ui`, modules `auth` and `billing`.
pub fn project_with_tasks() -> Project {
    let mut project = minimal_project();
    let store = &mut project.store;
    store.labels = vec![Label::new("bug").with_color("#FF4444"), Label::new("ui")];
    store.tasks = vec![
        task("T-001", "Fix login", "todo", &["bug"]),
        task("T-002", "Add OAuth", "in-progress", &[]),
        task("T-003", "Send invoice emails", "done", &["ui"]),
    ];
    let mut auth = Module::new("auth", "Authentication");
    auth.tasks = vec!["T-002".into(), "T-001".into()];
    let mut billing = Module::new("billing", "Billing");
    billing.tasks = vec!["T-003".into()];
    store.modules = vec![auth, billing];
    project
}

pub fn app_with_tasks() -> App {
    App::new(project_with_tasks())
}
