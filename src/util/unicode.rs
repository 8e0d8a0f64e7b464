use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Get the display width of a string (handling wide chars like CJK)
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut a string to at most `max_width` columns, ending in an ellipsis when cut.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut out = String::new();
    let mut width = 0;
    for g in s.graphemes(true) {
        let w = display_width(g);
        if width + w > budget {
            break;
        }
        width += w;
        out.push_str(g);
    }
    out.push('…');
    out
}
