use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;

use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Append a padding span so the line fills `width` cells
pub(super) fn pad_to_width(spans: &mut Vec<Span<'_>>, width: usize, style: Style) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

/// Push `right` flush against the right edge after `spans`, if it fits
pub(super) fn push_right_aligned<'a>(
    spans: &mut Vec<Span<'a>>,
    right: Span<'a>,
    width: usize,
    fill: Style,
) {
    let used = spans_width(spans);
    let right_w = unicode::display_width(&right.content);
    if used + right_w < width {
        spans.push(Span::styled(" ".repeat(width - used - right_w), fill));
        spans.push(right);
    }
}

pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
