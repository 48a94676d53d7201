use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::notify::ToastKind;
use crate::tui::app::{App, Mode};

use super::helpers::push_right_aligned;

const BOARD_HINTS: &str = "n new  e edit  m module  / search  q quit";
const FORM_HINTS: &str = "Tab next  \u{2190}/\u{2192} status  Ctrl-S save  Esc close";

/// Render the status row (bottom of screen): search prompt, latest toast,
/// or the active search, with key hints on the right
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let mut spans: Vec<Span> = Vec::new();

    if app.form.is_none() && app.mode == Mode::Search {
        spans.push(Span::styled(
            format!("/{}", app.search_input),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        )); // ▌ cursor
        push_right_aligned(
            &mut spans,
            Span::styled(
                "Enter search  Esc cancel",
                Style::default().fg(app.theme.dim).bg(bg),
            ),
            width,
            Style::default().bg(bg),
        );
    } else {
        if let Some(toast) = app.toasts.latest() {
            let fg = match toast.kind {
                ToastKind::Success => app.theme.green,
                ToastKind::Error => app.theme.red,
                ToastKind::Info => app.theme.text,
            };
            spans.push(Span::styled(
                format!(" {}", toast.message),
                Style::default().fg(fg).bg(bg),
            ));
        } else if app.form.is_none()
            && let Some(pattern) = &app.last_search
        {
            spans.push(Span::styled(
                format!("/{}  Esc clear", pattern),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }

        if app.project.config.ui.show_key_hints {
            let hints = if app.form.is_some() {
                FORM_HINTS
            } else {
                BOARD_HINTS
            };
            push_right_aligned(
                &mut spans,
                Span::styled(hints, Style::default().fg(app.theme.dim).bg(bg)),
                width,
                Style::default().bg(bg),
            );
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
