use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, FormField, FormView};

use super::helpers::centered_rect_fixed;
use super::label_picker::render_label_picker;
use super::widgets::{DateInput, DescriptionInput, StatusSelect, TitleInput};

const FORM_W: u16 = 60;
/// Rows for the fields, the save button and up to three violations
const FORM_H: u16 = 24;

/// Render the create/update form as a modal over the board
pub fn render_task_form(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = &app.form else {
        return;
    };
    let theme = &app.theme;
    let bg = theme.background;

    let popup = centered_rect_fixed(FORM_W, FORM_H, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .title(Span::styled(
            format!(" {} ", view.form.heading()),
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(1),
            Constraint::Length(5), // description
            Constraint::Length(1),
            Constraint::Length(2), // status
            Constraint::Length(1),
            Constraint::Length(2), // due date
            Constraint::Length(1),
            Constraint::Length(2), // labels
            Constraint::Length(1),
            Constraint::Length(1), // save
            Constraint::Min(0),    // violations
        ])
        .split(inner);

    let draft = view.form.draft();
    let limits = &app.project.config.limits;
    let invalid = |field: &str| view.form.violations().iter().any(|v| v.field == field);
    let focused = |field: FormField| view.focus == field && !view.form.label_picker().is_visible();

    frame.render_widget(
        TitleInput {
            value: &draft.title,
            limit: limits.task_title,
            focused: focused(FormField::Title),
            invalid: invalid("title"),
            theme,
        },
        rows[0],
    );
    frame.render_widget(
        DescriptionInput {
            value: &draft.description,
            limit: limits.task_description,
            focused: focused(FormField::Description),
            invalid: invalid("description"),
            theme,
        },
        rows[2],
    );
    let options = app.project.store.status_names();
    frame.render_widget(
        StatusSelect {
            value: &draft.status,
            options: &options,
            color: theme.status_color(&app.project.store, &draft.status),
            focused: focused(FormField::Status),
            invalid: invalid("status"),
            theme,
        },
        rows[4],
    );
    frame.render_widget(
        DateInput {
            value: &view.date_input,
            focused: focused(FormField::DueDate),
            invalid: false,
            theme,
        },
        rows[6],
    );
    render_labels_row(frame, app, view, focused(FormField::Labels), invalid("labels"), rows[8]);
    render_save_row(frame, app, view, focused(FormField::Save), rows[10]);
    render_violations(frame, app, view, rows[11]);

    if view.form.label_picker().is_visible() {
        render_label_picker(frame, app, view, popup);
    }
}

/// Selected labels as colored chips
fn render_labels_row(
    frame: &mut Frame,
    app: &App,
    view: &FormView,
    focused: bool,
    invalid: bool,
    area: Rect,
) {
    let theme = &app.theme;
    let bg = theme.background;
    let marker = if focused { "\u{25B8} " } else { "  " };
    let label_fg = match (invalid, focused) {
        (true, _) => theme.red,
        (false, true) => theme.highlight,
        (false, false) => theme.text,
    };
    let mut header = vec![
        Span::styled(marker, Style::default().fg(theme.highlight).bg(bg)),
        Span::styled(
            "Labels",
            Style::default()
                .fg(label_fg)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if focused {
        header.push(Span::styled(
            "  Enter to choose",
            Style::default().fg(theme.dim).bg(bg),
        ));
    }

    let mut chips = vec![Span::styled("  ", Style::default().bg(bg))];
    let labels = &view.form.draft().labels;
    if labels.is_empty() {
        chips.push(Span::styled("None", Style::default().fg(theme.dim).bg(bg)));
    }
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            chips.push(Span::styled(" ", Style::default().bg(bg)));
        }
        chips.push(Span::styled(
            format!("#{}", label.title),
            Style::default().fg(theme.label_color(label)).bg(bg),
        ));
    }

    let paragraph = Paragraph::new(vec![Line::from(header), Line::from(chips)])
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn render_save_row(frame: &mut Frame, app: &App, view: &FormView, focused: bool, area: Rect) {
    let theme = &app.theme;
    let caption = if view.form.is_edit() { "Update" } else { "Save" };
    let style = if focused {
        Style::default()
            .fg(theme.background)
            .bg(theme.highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_bright).bg(theme.selection_bg)
    };
    let line = Line::from(vec![
        Span::styled("  ", Style::default().bg(theme.background)),
        Span::styled(format!(" {} ", caption), style),
        Span::styled(
            "  Ctrl-S",
            Style::default().fg(theme.dim).bg(theme.background),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.background)),
        area,
    );
}

fn render_violations(frame: &mut Frame, app: &App, view: &FormView, area: Rect) {
    let theme = &app.theme;
    let lines: Vec<Line> = view
        .form
        .violations()
        .iter()
        .map(|v| {
            Line::from(Span::styled(
                format!("  {}: {}", v.field, v.message),
                Style::default().fg(theme.red).bg(theme.background),
            ))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(theme.background)),
        area,
    );
}
