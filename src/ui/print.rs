//! Plain printing of styled lines
//!
//! Used when the output is not paged. Styles are emitted as crossterm
//! commands; with `styled` off only the text is written, which is what ends
//! up in files and pipes.

use crossterm::{
    queue,
    style::{
        Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
        SetForegroundColor,
    },
};
use ratatui::{
    style::{Color, Modifier},
    text::Line,
};
use std::io::{self, Write};

/// Write `lines` to `out`, one terminal row each
pub fn print_lines<W: Write>(out: &mut W, lines: &[Line<'_>], styled: bool) -> io::Result<()> {
    for line in lines {
        for span in &line.spans {
            if !styled {
                queue!(out, Print(&span.content))?;
                continue;
            }

            let style = line.style.patch(span.style);
            if let Some(fg) = style.fg {
                queue!(out, SetForegroundColor(to_crossterm(fg)))?;
            }
            if let Some(bg) = style.bg {
                queue!(out, SetBackgroundColor(to_crossterm(bg)))?;
            }
            if style.add_modifier.contains(Modifier::BOLD) {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            if style.add_modifier.contains(Modifier::UNDERLINED) {
                queue!(out, SetAttribute(Attribute::Underlined))?;
            }
            queue!(
                out,
                Print(&span.content),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()
}

fn to_crossterm(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Style;
    use ratatui::text::Span;

    fn lines() -> Vec<Line<'static>> {
        vec![
            Line::from(vec![
                Span::styled("OFF ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled("ARGS", Style::default().fg(Color::Indexed(33))),
            ]),
            Line::from("12 JUMP_FORWARD"),
        ]
    }

    #[test]
    fn test_unstyled_output_is_plain_text() {
        let mut out = Vec::new();
        print_lines(&mut out, &lines(), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "OFF ARGS\n12 JUMP_FORWARD\n");
    }

    #[test]
    fn test_styled_output_carries_escape_codes() {
        let mut out = Vec::new();
        print_lines(&mut out, &lines(), true).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("\x1b["));
        assert!(text.contains("OFF "));
        assert!(text.contains("12 JUMP_FORWARD"));
        assert_eq!(text.matches('\n').count(), 2);
    }

    #[test]
    fn test_color_mapping() {
        assert_eq!(to_crossterm(Color::Red), TermColor::DarkRed);
        assert_eq!(to_crossterm(Color::LightRed), TermColor::Red);
        assert_eq!(
            to_crossterm(Color::Rgb(1, 2, 3)),
            TermColor::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}
