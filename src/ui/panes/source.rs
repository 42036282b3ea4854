//! Source pane rendering with syntax highlighting
//!
//! Highlighting is delegated to [syntect](https://docs.rs/syntect) using one
//! of its bundled themes. The whole pane is highlighted with a single
//! [`HighlightLines`] so that multi-line constructs such as docstrings keep
//! their state across rows.
//!
//! Rows arrive already dedented and truncated; this module only colors them
//! and pads them to the pane width on the theme background.

use crate::layout::widths::{display_width, pad_to};
use crate::ui::errors::DisplayError;
use log::warn;
use ratatui::{
    style::{Color, Style},
    text::Span,
};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style as SynStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

/// Theme used when none is given
pub const DEFAULT_SYNTAX_THEME: &str = "base16-ocean.dark";

/// Bundled syntaxes plus the selected theme
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Result<Self, DisplayError> {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(theme_name)
            .ok_or_else(|| DisplayError::UnknownTheme {
                name: theme_name.to_string(),
                available: theme_set.themes.keys().cloned().collect(),
            })?;

        Ok(Highlighter {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    /// Background of the selected theme, used behind both panes
    pub fn background(&self) -> Option<Color> {
        self.theme
            .settings
            .background
            .map(|c| Color::Rgb(c.r, c.g, c.b))
    }

    /// Highlight source rows, padding each to `width` columns
    pub fn highlight(
        &self,
        lines: &[String],
        language: &str,
        width: usize,
    ) -> Vec<Vec<Span<'static>>> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(language)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let base = match self.background() {
            Some(bg) => Style::default().bg(bg),
            None => Style::default(),
        };

        lines
            .iter()
            .map(|line| {
                let with_newline = format!("{}\n", line);
                let tokens = match highlighter.highlight_line(&with_newline, &self.syntax_set) {
                    Ok(tokens) => tokens,
                    Err(err) => {
                        warn!("cannot highlight {:?} as {}: {}", line, language, err);
                        Vec::new()
                    }
                };

                let mut spans = token_spans(&tokens, line, base);
                let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
                if used < width {
                    spans.push(Span::styled(pad_to("", width - used), base));
                }
                spans
            })
            .collect()
    }
}

/// Turn syntect tokens into spans; no tokens leaves the line unstyled
fn token_spans(tokens: &[(SynStyle, &str)], line: &str, base: Style) -> Vec<Span<'static>> {
    if tokens.is_empty() {
        return vec![Span::styled(line.to_string(), base)];
    }
    tokens
        .iter()
        .map(|(syn_style, token)| (syn_style.foreground, token.trim_end_matches('\n')))
        .filter(|(_, token)| !token.is_empty())
        .map(|(fg, token)| Span::styled(token.to_string(), base.fg(Color::Rgb(fg.r, fg.g, fg.b))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_theme() {
        let err = Highlighter::new("no-such-theme").err().unwrap();
        let DisplayError::UnknownTheme { name, available } = &err else {
            panic!("Expected UnknownTheme, got {:?}", err);
        };
        assert_eq!(name, "no-such-theme");
        assert!(available.iter().any(|t| t == DEFAULT_SYNTAX_THEME));
        assert!(err.to_string().contains(DEFAULT_SYNTAX_THEME));
    }

    #[test]
    fn test_highlight_pads_rows() {
        let highlighter = Highlighter::new(DEFAULT_SYNTAX_THEME).unwrap();
        let lines = vec!["def f():".to_string(), "".to_string(), "    return 1".to_string()];

        let rows = highlighter.highlight(&lines, "python", 20);

        assert_eq!(rows.len(), 3);
        for (row, line) in rows.iter().zip(&lines) {
            let text: String = row.iter().map(|s| s.content.as_ref()).collect();
            assert_eq!(text.trim_end(), line.as_str());
            assert_eq!(display_width(&text), 20);
        }
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let highlighter = Highlighter::new(DEFAULT_SYNTAX_THEME).unwrap();
        let rows = highlighter.highlight(&["x := 1".to_string()], "no-such-language", 6);
        let text: String = rows[0].iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "x := 1");
    }

    #[test]
    fn test_line_without_tokens_stays_plain() {
        let base = Style::default().bg(Color::Black);
        let spans = token_spans(&[], "    return 1", base);

        assert_eq!(spans, vec![Span::styled("    return 1", base)]);
    }
}
