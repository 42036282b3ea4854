//! Pager status bar: visible line range on the left, keybindings on the right

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// `first-last/total` of the visible lines, 1-based
pub fn position_text(scroll: usize, viewport: usize, total: usize) -> String {
    if total == 0 {
        return "0/0".to_string();
    }
    let first = scroll.min(total - 1) + 1;
    let last = (scroll + viewport).min(total).max(first);
    format!("{}-{}/{}", first, last, total)
}

/// Render the status bar at the bottom.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    scroll: usize,
    viewport: usize,
    total: usize,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let at_end = scroll + viewport >= total;
    let left_spans = vec![
        Span::styled(
            format!(" {} ", position_text(scroll, viewport, total)),
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            if at_end { " END " } else { "" },
            Style::default()
                .bg(DEFAULT_THEME.secondary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.status_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.status_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.status_bg)
        .fg(DEFAULT_THEME.comment);

    let right_spans = vec![
        Span::styled(" ↑/↓ ", key_style),
        Span::styled(" scroll ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" page ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" Home/End ", key_style),
        Span::styled(" top/bottom ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled("q", key_style),
        Span::styled(" quit ", desc_style),
    ];

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.status_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_text() {
        assert_eq!(position_text(0, 10, 0), "0/0");
        assert_eq!(position_text(0, 10, 100), "1-10/100");
        assert_eq!(position_text(95, 10, 100), "96-100/100");
        assert_eq!(position_text(0, 10, 3), "1-3/3");
    }
}
