//! Field inputs for the task form.
//!
//! Each widget is stateless: it renders a value handed to it, a focus
//! marker and (for text fields) an `n/limit` counter. Editing happens in the
//! input handler, which enforces the limits before the draft changes.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use crate::tui::theme::Theme;
use crate::util::unicode;

use super::helpers::push_right_aligned;

const CURSOR: &str = "\u{258C}"; // ▌

/// Header row shared by every field: focus marker, label, right-hand note
fn header_line<'a>(
    theme: &Theme,
    label: &'a str,
    focused: bool,
    invalid: bool,
    note: Option<Span<'a>>,
    width: usize,
) -> Line<'a> {
    let bg = theme.background;
    let marker = if focused { "\u{25B8} " } else { "  " }; // ▸
    let label_fg = if invalid {
        theme.red
    } else if focused {
        theme.highlight
    } else {
        theme.text
    };
    let mut spans = vec![
        Span::styled(marker, Style::default().fg(theme.highlight).bg(bg)),
        Span::styled(
            label,
            Style::default()
                .fg(label_fg)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(note) = note {
        push_right_aligned(&mut spans, note, width, Style::default().bg(bg));
    }
    Line::from(spans)
}

fn counter_span<'a>(theme: &Theme, value: &str, limit: usize) -> Span<'a> {
    let count = value.chars().count();
    let fg = if count >= limit { theme.yellow } else { theme.dim };
    Span::styled(
        format!("{}/{}", count, limit),
        Style::default().fg(fg).bg(theme.background),
    )
}

/// Value row(s): the text, with a block cursor at the end when focused
fn value_spans<'a>(theme: &Theme, value: &'a str, placeholder: &'a str, focused: bool) -> Vec<Span<'a>> {
    let bg = theme.background;
    let mut spans = vec![Span::styled("  ", Style::default().bg(bg))];
    if value.is_empty() && !focused {
        spans.push(Span::styled(
            placeholder,
            Style::default().fg(theme.dim).bg(bg),
        ));
    } else {
        spans.push(Span::styled(
            value,
            Style::default().fg(theme.text_bright).bg(bg),
        ));
    }
    if focused {
        spans.push(Span::styled(
            CURSOR,
            Style::default().fg(theme.highlight).bg(bg),
        ));
    }
    spans
}

// ---------------------------------------------------------------------------
// TitleInput
// ---------------------------------------------------------------------------

/// Single-line title: header with counter, then the value truncated to fit
pub struct TitleInput<'a> {
    pub value: &'a str,
    pub limit: usize,
    pub focused: bool,
    pub invalid: bool,
    pub theme: &'a Theme,
}

impl Widget for TitleInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width as usize;
        let counter = counter_span(self.theme, self.value, self.limit);
        let header = header_line(self.theme, "Title", self.focused, self.invalid, Some(counter), width);

        // Keep the end of the title (where typing happens) in view
        let shown = if unicode::display_width(self.value) + 3 > width {
            tail_to_width(self.value, width.saturating_sub(4))
        } else {
            self.value
        };
        let value = Line::from(value_spans(self.theme, shown, "Untitled", self.focused));

        Paragraph::new(vec![header, value])
            .style(Style::default().bg(self.theme.background))
            .render(area, buf);
    }
}

/// Longest suffix of `s` that fits in `max_cells`
fn tail_to_width(s: &str, max_cells: usize) -> &str {
    let mut start = s.len();
    let mut width = 0;
    while let Some(prev) = unicode::prev_grapheme_boundary(s, start) {
        let w = unicode::display_width(&s[prev..start]);
        if width + w > max_cells {
            break;
        }
        width += w;
        start = prev;
    }
    &s[start..]
}

// ---------------------------------------------------------------------------
// DescriptionInput
// ---------------------------------------------------------------------------

/// Multi-line description, word-wrapped into the rows below the header
pub struct DescriptionInput<'a> {
    pub value: &'a str,
    pub limit: usize,
    pub focused: bool,
    pub invalid: bool,
    pub theme: &'a Theme,
}

impl Widget for DescriptionInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let width = area.width as usize;
        let counter = counter_span(self.theme, self.value, self.limit);
        let header = header_line(
            self.theme,
            "Description",
            self.focused,
            self.invalid,
            Some(counter),
            width,
        );
        Paragraph::new(header)
            .style(Style::default().bg(self.theme.background))
            .render(Rect { height: 1, ..area }, buf);

        let body = Rect {
            x: area.x + 2,
            y: area.y + 1,
            width: area.width.saturating_sub(2),
            height: area.height - 1,
        };
        let mut spans = value_spans(self.theme, self.value, "No description", self.focused);
        spans.remove(0);
        // Wrapped text scrolls so the last row (the cursor) stays visible
        let wrapped_rows = wrapped_row_count(self.value, body.width as usize);
        let scroll = wrapped_rows.saturating_sub(body.height as usize) as u16;
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(self.theme.background))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(body, buf);
    }
}

fn wrapped_row_count(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    // +1 for the cursor cell
    (unicode::display_width(text) + 1).div_ceil(width)
}

// ---------------------------------------------------------------------------
// StatusSelect
// ---------------------------------------------------------------------------

/// Status picker: `◀ in-progress ▶`, with the position among all statuses
pub struct StatusSelect<'a> {
    pub value: &'a str,
    pub options: &'a [String],
    pub color: Color,
    pub focused: bool,
    pub invalid: bool,
    pub theme: &'a Theme,
}

impl Widget for StatusSelect<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg = self.theme.background;
        let width = area.width as usize;
        let position = self
            .options
            .iter()
            .position(|o| o == self.value)
            .map_or_else(|| "?".to_string(), |i| (i + 1).to_string());
        let note = Span::styled(
            format!("{}/{}", position, self.options.len()),
            Style::default().fg(self.theme.dim).bg(bg),
        );
        let header = header_line(self.theme, "Status", self.focused, self.invalid, Some(note), width);

        let arrow_fg = if self.focused {
            self.theme.highlight
        } else {
            self.theme.dim
        };
        let value = Line::from(vec![
            Span::styled("  \u{25C0} ", Style::default().fg(arrow_fg).bg(bg)), // ◀
            Span::styled(
                self.value,
                Style::default()
                    .fg(self.color)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" \u{25B6}", Style::default().fg(arrow_fg).bg(bg)), // ▶
        ]);

        Paragraph::new(vec![header, value])
            .style(Style::default().bg(bg))
            .render(area, buf);
    }
}

// ---------------------------------------------------------------------------
// DateInput
// ---------------------------------------------------------------------------

/// Due date typed as text; parsed when focus leaves the field
pub struct DateInput<'a> {
    pub value: &'a str,
    pub focused: bool,
    pub invalid: bool,
    pub theme: &'a Theme,
}

impl Widget for DateInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width as usize;
        let hint = Span::styled(
            "YYYY-MM-DD",
            Style::default().fg(self.theme.dim).bg(self.theme.background),
        );
        let header = header_line(self.theme, "Due date", self.focused, self.invalid, Some(hint), width);
        let value = Line::from(value_spans(self.theme, self.value, "None", self.focused));

        Paragraph::new(vec![header, value])
            .style(Style::default().bg(self.theme.background))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::render_to_string;

    #[test]
    fn test_title_input_shows_counter_and_cursor() {
        let theme = Theme::default();
        let output = render_to_string(30, 2, |frame, area| {
            frame.render_widget(
                TitleInput {
                    value: "Fix login",
                    limit: 50,
                    focused: true,
                    invalid: false,
                    theme: &theme,
                },
                area,
            );
        });
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "\u{25B8} Title                   9/50");
        assert_eq!(lines[1], "  Fix login\u{258C}");
    }

    #[test]
    fn test_empty_unfocused_title_shows_placeholder() {
        let theme = Theme::default();
        let output = render_to_string(30, 2, |frame, area| {
            frame.render_widget(
                TitleInput {
                    value: "",
                    limit: 50,
                    focused: false,
                    invalid: true,
                    theme: &theme,
                },
                area,
            );
        });
        assert!(output.contains("0/50"));
        assert!(output.contains("Untitled"));
    }

    #[test]
    fn test_long_title_keeps_its_end_visible() {
        assert_eq!(tail_to_width("abcdefgh", 3), "fgh");
        assert_eq!(tail_to_width("ab", 5), "ab");
    }

    #[test]
    fn test_description_wraps() {
        let theme = Theme::default();
        let output = render_to_string(20, 4, |frame, area| {
            frame.render_widget(
                DescriptionInput {
                    value: "one two three four five six",
                    limit: 300,
                    focused: false,
                    invalid: false,
                    theme: &theme,
                },
                area,
            );
        });
        assert!(output.contains("27/300"));
        assert!(output.lines().count() >= 3);
        assert!(output.contains("one two"));
    }

    #[test]
    fn test_status_select_shows_position() {
        let theme = Theme::default();
        let options = vec!["todo".to_string(), "in-progress".to_string(), "done".to_string()];
        let output = render_to_string(30, 2, |frame, area| {
            frame.render_widget(
                StatusSelect {
                    value: "in-progress",
                    options: &options,
                    color: theme.yellow,
                    focused: false,
                    invalid: false,
                    theme: &theme,
                },
                area,
            );
        });
        assert!(output.contains("2/3"));
        assert!(output.contains("\u{25C0} in-progress \u{25B6}"));
    }

    #[test]
    fn test_date_input_placeholder() {
        let theme = Theme::default();
        let output = render_to_string(30, 2, |frame, area| {
            frame.render_widget(
                DateInput {
                    value: "",
                    focused: false,
                    invalid: false,
                    theme: &theme,
                },
                area,
            );
        });
        assert!(output.contains("Due date"));
        assert!(output.contains("YYYY-MM-DD"));
        assert!(output.contains("None"));
    }
}
