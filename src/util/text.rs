use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Width of `s` in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Shorten `s` to at most `max_cells` cells, ending in `…` when cut.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Cursor position after moving one grapheme right, or `None` at the end.
pub fn next_grapheme_boundary(s: &str, cursor: usize) -> Option<usize> {
    let rest = s.get(cursor..).filter(|rest| !rest.is_empty())?;
    let first = rest.graphemes(true).next().map_or(0, str::len);
    Some(cursor + first)
}

/// Cursor position after moving one grapheme left, or `None` at the start.
pub fn prev_grapheme_boundary(s: &str, cursor: usize) -> Option<usize> {
    let head = s.get(..cursor).filter(|head| !head.is_empty())?;
    head.grapheme_indices(true).next_back().map(|(i, _)| i)
}

/// `cursor` pulled back onto the nearest char boundary at or before it.
pub fn clamp_cursor(s: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(s.len());
    while !s.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

/// Terminal column of a byte cursor, with each newline drawn as one `↵` cell.
pub fn cursor_column(s: &str, cursor: usize) -> usize {
    let head = &s[..clamp_cursor(s, cursor)];
    head.split('\n').map(display_width).sum::<usize>() + head.matches('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_cells() {
        assert_eq!(display_width("Atlas"), 5);
        assert_eq!(display_width("计划"), 4);
        assert_eq!(display_width("cafe\u{0301}"), 4);
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("Vendor delay", 20), "Vendor delay");
        assert_eq!(truncate_to_width("Vendor delay", 12), "Vendor delay");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate_to_width("Vendor delay", 7), "Vendor\u{2026}");
        assert_eq!(truncate_to_width("计划阶段", 5), "计划\u{2026}");
        assert_eq!(truncate_to_width("Atlas", 1), "\u{2026}");
        assert_eq!(truncate_to_width("Atlas", 0), "");
    }

    #[test]
    fn cursor_moves_by_grapheme() {
        let s = "e\u{0301}x";
        assert_eq!(next_grapheme_boundary(s, 0), Some(3));
        assert_eq!(next_grapheme_boundary(s, 3), Some(4));
        assert_eq!(next_grapheme_boundary(s, 4), None);
        assert_eq!(prev_grapheme_boundary(s, 4), Some(3));
        assert_eq!(prev_grapheme_boundary(s, 3), Some(0));
        assert_eq!(prev_grapheme_boundary(s, 0), None);
    }

    #[test]
    fn cursor_column_uses_cell_width() {
        assert_eq!(cursor_column("计划", 3), 2);
        assert_eq!(cursor_column("ab", 10), 2);
        assert_eq!(cursor_column("a\nb", 3), 3);
    }

    #[test]
    fn clamp_cursor_lands_on_char_boundary() {
        assert_eq!(clamp_cursor("计划", 4), 3);
        assert_eq!(clamp_cursor("计划", 1), 0);
        assert_eq!(clamp_cursor("计划", 99), 6);
        assert_eq!(clamp_cursor("ab", 1), 1);
    }
}
