use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to fit within `max_cells`, appending `…` if truncated. Never
/// splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1; // reserve 1 cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Keep the end of `s` that fits within `max_cells`, prefixed with `…` if
/// anything was dropped. Used for inputs, where the caret sits at the end.
pub fn tail_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut start = s.len();
    for (i, grapheme) in s.grapheme_indices(true).rev() {
        let gw = display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        start = i;
    }
    format!("\u{2026}{}", &s[start..])
}

/// Byte offset where the last grapheme cluster of `s` starts
pub fn last_grapheme_start(s: &str) -> usize {
    s.grapheme_indices(true).next_back().map_or(0, |(i, _)| i)
}

/// Remove the last grapheme cluster (backspace at end of input)
pub fn pop_grapheme(s: &mut String) {
    let start = last_grapheme_start(s);
    s.truncate(start);
}

/// Collapse line breaks so multi-line values fit a single row
pub fn single_line(s: &str) -> String {
    s.replace("\r\n", " ").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello\u{2026}");
        assert_eq!(truncate_to_width("hello", 0), "");
        // Wide chars take two cells
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本\u{2026}");
    }

    #[test]
    fn truncate_keeps_clusters_whole() {
        let scientist = "\u{1F469}\u{200D}\u{1F52C}";
        let out = truncate_to_width(&format!("{}xyz", scientist), 3);
        // Either the whole cluster fits or none of it does
        assert!(out == format!("{}\u{2026}", scientist) || out == "\u{2026}");

        assert_eq!(truncate_to_width("cafe\u{301} noir", 5), "cafe\u{301}\u{2026}");
    }

    #[test]
    fn tail() {
        assert_eq!(tail_to_width("hello", 10), "hello");
        assert_eq!(tail_to_width("hello world", 6), "\u{2026}world");
        assert_eq!(tail_to_width("noir cafe\u{301}", 5), "\u{2026}cafe\u{301}");
    }

    #[test]
    fn pop_removes_whole_cluster() {
        let mut s = String::from("cafe\u{301}");
        pop_grapheme(&mut s);
        assert_eq!(s, "caf");

        let mut s = String::from("a\u{1F469}\u{200D}\u{1F52C}");
        pop_grapheme(&mut s);
        assert_eq!(s, "a");

        let mut s = String::new();
        pop_grapheme(&mut s);
        assert_eq!(s, "");
    }

    #[test]
    fn collapse_newlines() {
        assert_eq!(single_line("a\nb\r\nc"), "a b c");
    }
}
