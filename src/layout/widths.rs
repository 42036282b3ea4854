//! Pane widths, truncation and dedenting
//!
//! The view is laid out as four columns separated by single spaces:
//!
//! ```text
//! <nums> <source pane> <nums> <instruction pane>
//! ```
//!
//! [`column_widths`] splits what is left after both number gutters and the
//! separators between the two panes. [`truncate`] then fits each text cell to
//! its pane, counting terminal display columns rather than bytes.

use unicode_width::UnicodeWidthChar;

/// Marker appended to truncated text; one display column wide
pub const ELLIPSIS: char = '…';

/// Widths of the source (left) and instruction (right) panes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneWidths {
    pub left: usize,
    pub right: usize,
}

impl PaneWidths {
    pub fn total(&self) -> usize {
        self.left + self.right
    }
}

impl From<(usize, usize)> for PaneWidths {
    fn from((left, right): (usize, usize)) -> Self {
        PaneWidths { left, right }
    }
}

/// Split the usable terminal width between the two panes
///
/// `ratio` is the share of the source pane and is clamped to `[0, 1]`; any odd
/// column goes to the left pane.
pub fn column_widths(
    number_column_width: usize,
    ratio: f64,
    terminal_width: usize,
    border_overhead: usize,
) -> PaneWidths {
    let combined = terminal_width
        .saturating_sub(border_overhead)
        .saturating_sub(number_column_width * 2);
    let ratio = if ratio.is_nan() { 0.5 } else { ratio.clamp(0.0, 1.0) };
    let left = ((combined as f64 * ratio).ceil() as usize).min(combined);

    PaneWidths {
        left,
        right: combined - left,
    }
}

/// Columns between tab stops when source lines are expanded
pub const TAB_SIZE: usize = 4;

fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Display width of a string in terminal columns
///
/// Control characters count as zero columns, the same way [`truncate`]
/// counts them.
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Replace tabs with spaces up to the next tab stop and drop other control
/// characters, so that every remaining char has a definite width
pub fn expand_tabs(line: &str, tab_size: usize) -> String {
    let mut column = 0;
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        if ch == '\t' {
            let fill = if tab_size == 0 { 0 } else { tab_size - column % tab_size };
            out.extend(std::iter::repeat(' ').take(fill));
            column += fill;
        } else if !ch.is_control() {
            column += char_width(ch);
            out.push(ch);
        }
    }
    out
}

/// Fit a line into `width` columns, marking the cut with [`ELLIPSIS`]
pub fn truncate(line: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if display_width(line) <= width {
        return line.to_string();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::with_capacity(width + ELLIPSIS.len_utf8());
    for ch in line.chars() {
        let w = char_width(ch);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    out
}

/// Pad (or cut) a string to exactly `width` display columns
pub fn pad_to(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(display_width(&text));
    format!("{}{}", text, " ".repeat(fill))
}

/// Right-justify a string in `width` display columns
pub fn right_justify(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{}", " ".repeat(fill), text)
}

/// Remove the whitespace prefix shared by every non-blank line
///
/// Blank lines do not take part and come out empty. Tabs and spaces are
/// compared literally, so `"\t"` and `"    "` have no common prefix.
pub fn dedent(lines: &mut [String]) {
    let mut common: Option<&str> = None;
    for line in lines.iter().filter(|l| !l.trim().is_empty()) {
        let indent = &line[..line.len() - line.trim_start().len()];
        common = Some(match common {
            None => indent,
            Some(prefix) => common_prefix(prefix, indent),
        });
    }
    let cut = common.map(str::len).unwrap_or(0);

    for line in lines.iter_mut() {
        if line.trim().is_empty() {
            line.clear();
        } else if cut > 0 {
            line.replace_range(..cut, "");
        }
    }
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((idx, _), _)| idx)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}
