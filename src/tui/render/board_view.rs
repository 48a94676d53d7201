use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use regex::Regex;

use crate::model::Task;
use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::{pad_to_width, push_right_aligned, spans_width};
use super::push_highlighted_spans;

/// Render the task list for the current route, scrolled to keep the cursor
/// in view
pub fn render_board_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let tasks = app.visible_tasks();

    if tasks.is_empty() {
        let message = match (&app.route, &app.last_search) {
            (_, Some(pattern)) => format!(" No tasks match /{}", pattern),
            (Some(_), None) => format!(" No tasks in {} (n to add one)", app.route_title()),
            (None, None) => " No tasks yet (n to add one)".to_string(),
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(app.theme.dim).bg(bg),
        )))
        .style(Style::default().bg(bg));
        frame.render_widget(paragraph, area);
        return;
    }

    let height = area.height as usize;
    let scroll = if height == 0 {
        0
    } else {
        app.cursor.saturating_sub(height - 1)
    };
    let search_re = app.active_search_re();
    let id_width = tasks
        .iter()
        .map(|t| unicode::display_width(&t.id))
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = tasks
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(i, task)| {
            render_task_line(
                app,
                task,
                i == app.cursor,
                id_width,
                area.width as usize,
                search_re.as_ref(),
            )
        })
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn render_task_line<'a>(
    app: &'a App,
    task: &'a Task,
    is_cursor: bool,
    id_width: usize,
    width: usize,
    search_re: Option<&Regex>,
) -> Line<'a> {
    let theme = &app.theme;
    let bg = if is_cursor {
        theme.selection_bg
    } else {
        theme.background
    };
    let fill = Style::default().bg(bg);

    let mut spans: Vec<Span> = Vec::new();
    spans.push(Span::styled(
        if is_cursor { "\u{258E}" } else { " " }, // ▎
        Style::default().fg(theme.highlight).bg(bg),
    ));
    spans.push(Span::styled(
        format!("{:<w$}  ", task.id, w = id_width),
        Style::default().fg(theme.dim).bg(bg),
    ));
    spans.push(Span::styled(
        format!("{:<12}", unicode::truncate_to_width(&task.status, 11)),
        Style::default()
            .fg(theme.status_color(&app.project.store, &task.status))
            .bg(bg),
    ));

    // Title gets whatever is left after the due date column
    let due = task.due_day();
    let due_width = if due.is_empty() { 0 } else { due.len() + 2 };
    let labels_width: usize = task
        .labels
        .iter()
        .map(|l| unicode::display_width(&l.title) + 2)
        .sum();
    let room = width
        .saturating_sub(spans_width(&spans) + due_width + labels_width + 1)
        .max(8);
    let title = unicode::truncate_to_width(&task.title, room);
    let title_style = Style::default()
        .fg(if is_cursor {
            theme.text_bright
        } else {
            theme.text
        })
        .bg(bg);
    let highlight_style = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);
    push_highlighted_spans(&mut spans, &title, title_style, highlight_style, search_re);

    for label in &task.labels {
        spans.push(Span::styled(" ", fill));
        spans.push(Span::styled(
            format!("#{}", label.title),
            Style::default().fg(theme.label_color(label)).bg(bg),
        ));
    }

    if !due.is_empty() {
        push_right_aligned(
            &mut spans,
            Span::styled(
                format!("{} ", due),
                Style::default()
                    .fg(theme.yellow)
                    .bg(bg)
                    .add_modifier(Modifier::ITALIC),
            ),
            width,
            fill,
        );
    }

    if is_cursor {
        pad_to_width(&mut spans, width, fill);
    }
    Line::from(spans)
}
