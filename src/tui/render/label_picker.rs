use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::form::LabelPicker;
use crate::tui::app::{App, FormView};
use crate::util::unicode;

use super::helpers::{centered_rect_fixed, pad_to_width};

const PICKER_W: u16 = 34;
const MAX_ROWS: usize = 12;

/// Label sub-form: the catalog as a checklist over the task form
pub fn render_label_picker(frame: &mut Frame, app: &App, view: &FormView, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let picker = view.form.label_picker();
    let rows = LabelPicker::rows(&app.project.store.labels, &view.form.draft().labels);

    let visible = rows.len().clamp(1, MAX_ROWS);
    // Borders, rows, blank line, key hints
    let height = visible as u16 + 4;
    let popup = centered_rect_fixed(PICKER_W, height, area);
    frame.render_widget(Clear, popup);

    let inner_w = PICKER_W.saturating_sub(2) as usize;
    let cursor = picker.cursor();
    let first = cursor.saturating_sub(MAX_ROWS - 1);

    let mut lines: Vec<Line> = Vec::new();
    if rows.is_empty() {
        lines.push(Line::from(Span::styled(
            " No labels (tb label add)",
            Style::default().fg(theme.dim).bg(bg),
        )));
    }
    for (i, (label, checked)) in rows.iter().enumerate().skip(first).take(MAX_ROWS) {
        let is_cursor = i == cursor;
        let row_bg = if is_cursor { theme.selection_bg } else { bg };
        let check = if *checked { "[x] " } else { "[ ] " };
        let mut spans = vec![
            Span::styled(" ", Style::default().bg(row_bg)),
            Span::styled(
                check,
                Style::default()
                    .fg(if *checked { theme.green } else { theme.dim })
                    .bg(row_bg),
            ),
            Span::styled(
                unicode::truncate_to_width(&label.title, inner_w.saturating_sub(6)),
                Style::default().fg(theme.label_color(label)).bg(row_bg),
            ),
        ];
        if is_cursor {
            pad_to_width(&mut spans, inner_w, Style::default().bg(row_bg));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Space toggle  Esc done",
        Style::default().fg(theme.dim).bg(bg),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .title(Span::styled(
            " Labels ",
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    frame.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().bg(bg)),
        popup,
    );
}
