use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.split('\t')
        .enumerate()
        .map(|(i, part)| {
            let w = UnicodeWidthStr::width(part);
            if i > 0 { w + 4 } else { w }
        })
        .sum()
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 1 {
        return "\u{2026}".to_string();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = grapheme_display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Previous grapheme boundary before `byte_offset`. Returns None if at start.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset == 0 {
        return None;
    }
    s[..byte_offset]
        .grapheme_indices(true)
        .last()
        .map(|(i, _)| i)
}

/// Remove the last grapheme cluster (backspace at end of input).
pub fn pop_grapheme(s: &mut String) {
    if let Some(start) = prev_grapheme_boundary(s, s.len()) {
        s.truncate(start);
    }
}

/// Append `c` unless that would take `s` past `limit` characters.
/// Returns whether the character was accepted.
pub fn push_within_limit(s: &mut String, c: char, limit: usize) -> bool {
    if s.chars().count() >= limit {
        return false;
    }
    s.push(c);
    true
}

fn grapheme_display_width(g: &str) -> usize {
    if g == "\t" {
        return 4;
    }
    UnicodeWidthStr::width(g)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_ascii_and_wide() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width("你好"), 4);
        assert_eq!(display_width("🎉"), 2);
        assert_eq!(display_width("cafe\u{0301}"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn test_display_width_tab() {
        assert_eq!(display_width("a\tb"), 6);
    }

    #[test]
    fn test_truncate_fits() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
        assert_eq!(truncate_to_width("你好世界", 5), "你好…");
        assert_eq!(truncate_to_width("hello", 1), "…");
        assert_eq!(truncate_to_width("hello", 0), "");
    }

    #[test]
    fn test_prev_boundary() {
        assert_eq!(prev_grapheme_boundary("abc", 3), Some(2));
        assert_eq!(prev_grapheme_boundary("abc", 0), None);
        let s = "e\u{0301}x";
        assert_eq!(prev_grapheme_boundary(s, 3), Some(0));
    }

    #[test]
    fn test_pop_removes_whole_cluster() {
        let mut s = "cafe\u{0301}".to_string();
        pop_grapheme(&mut s);
        assert_eq!(s, "caf");
        let mut flag = "ok🇯🇵".to_string();
        pop_grapheme(&mut flag);
        assert_eq!(flag, "ok");
        let mut empty = String::new();
        pop_grapheme(&mut empty);
        assert_eq!(empty, "");
    }

    #[test]
    fn test_push_respects_limit() {
        let mut s = "ab".to_string();
        assert!(push_within_limit(&mut s, 'c', 3));
        assert!(!push_within_limit(&mut s, 'd', 3));
        assert_eq!(s, "abc");
        let mut wide = "éé".to_string();
        assert!(push_within_limit(&mut wide, 'é', 3));
    }
}
