//! Side-by-side rendering of one function
//!
//! A [`Display`] is the finished picture of a function: a title rule, the
//! grid header and one line per aligned row, laid out as
//!
//! ```text
//! <numbers> <source pane> <numbers> <instruction grid>
//! ```
//!
//! Lines are plain ratatui [`Line`]s so the same display can be printed
//! straight to stdout or scrolled in the pager.

use crate::layout::widths::{display_width, right_justify, truncate};
use crate::layout::{build_listing, JumpPalette, LayoutOptions, Listing};
use crate::target::FunctionNode;
use crate::ui::errors::DisplayError;
use crate::ui::panes::bytecode::{grid_header, grid_row};
use crate::ui::panes::source::Highlighter;
use crate::ui::theme::DEFAULT_THEME;
use log::debug;
use rand::Rng;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const RULE: char = '─';

/// Rendered lines of one function, ready to print or page
#[derive(Debug, Clone, PartialEq)]
pub struct Display {
    pub lines: Vec<Line<'static>>,
    /// Terminal rows the display occupies
    pub height: usize,
}

impl Display {
    /// Lay out and render a function
    ///
    /// `file` is the file of the module that defines the function, shown in
    /// the title. The title rule takes a random color from `palette`.
    pub fn render<R: Rng + ?Sized>(
        function: &FunctionNode,
        file: Option<&str>,
        options: &LayoutOptions,
        palette: &JumpPalette,
        highlighter: &Highlighter,
        rng: &mut R,
    ) -> Result<Self, DisplayError> {
        let listing = build_listing(
            &function.instructions,
            function.source.as_ref(),
            options,
            palette,
            rng,
        )?;
        let rule_color = palette.choose(rng).unwrap_or(DEFAULT_THEME.primary);
        let title = Title::new(function, file);

        Ok(Self::build(
            &title,
            &listing,
            highlighter,
            &function.language,
            rule_color,
            options.terminal_width,
        ))
    }

    /// Render an already built listing
    pub fn build(
        title: &Title,
        listing: &Listing,
        highlighter: &Highlighter,
        language: &str,
        rule_color: Color,
        terminal_width: usize,
    ) -> Self {
        let background = highlighter.background();
        let pane_style = match background {
            Some(bg) => Style::default().bg(bg),
            None => Style::default(),
        };
        let number_width = listing.number_width;
        let widths = listing.widths;

        let mut lines = Vec::with_capacity(listing.len() + 2);
        lines.push(title.rule(rule_color, terminal_width));

        let blank_gutter = " ".repeat(number_width);
        let mut header = vec![
            Span::raw(format!("{} ", blank_gutter)),
            Span::styled(" ".repeat(widths.left), pane_style),
            Span::raw(format!(" {} ", blank_gutter)),
        ];
        header.extend(clip(grid_header(&listing.grid, background), widths.right));
        lines.push(Line::from(header));

        let highlighted = highlighter.highlight(&listing.rows.source, language, widths.left);
        let gutter_style = Style::default().fg(DEFAULT_THEME.line_number);

        for (source, (_, row, number)) in highlighted.into_iter().zip(listing.rows.iter()) {
            let gutter = right_justify(number, number_width);
            let mut spans = Vec::with_capacity(source.len() + 8);
            spans.push(Span::styled(gutter.clone(), gutter_style));
            spans.push(Span::raw(" "));
            spans.extend(source);
            spans.push(Span::raw(" "));
            spans.push(Span::styled(gutter, gutter_style));
            spans.push(Span::raw(" "));
            spans.extend(clip(grid_row(row, &listing.grid, background), widths.right));
            lines.push(Line::from(spans));
        }

        debug!("display '{}': {} lines", title.name, lines.len());
        let height = lines.len();
        Display { lines, height }
    }
}

/// Heading of a display: `function pkg.mod.f from pkg/mod.py:3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub kind: String,
    pub name: String,
    pub location: String,
}

impl Title {
    pub fn new(function: &FunctionNode, file: Option<&str>) -> Self {
        let qualname = function.qualname.as_deref().unwrap_or(&function.name);
        let line = function
            .source
            .as_ref()
            .map(|s| s.start_line.to_string())
            .unwrap_or_else(|| "?".to_string());

        Title {
            kind: "function".to_string(),
            name: format!("{}.{}", function.module, qualname),
            location: format!("{}:{}", file.unwrap_or("?"), line),
        }
    }

    pub fn text(&self) -> String {
        format!("{} {} from {}", self.kind, self.name, self.location)
    }

    /// The title centered in a horizontal rule `width` columns wide
    pub fn rule(&self, color: Color, width: usize) -> Line<'static> {
        let style = Style::default().fg(color);
        let fill = width.saturating_sub(display_width(&self.text()) + 2);
        let left = fill / 2;
        let right = fill - left;

        let mut spans = Vec::with_capacity(5);
        if left > 0 {
            spans.push(Span::styled(format!("{} ", rule(left)), style));
        }
        spans.push(Span::styled(format!("{} ", self.kind), style));
        spans.push(Span::styled(
            self.name.clone(),
            style.add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" from {}", self.location), style));
        if right > 0 {
            spans.push(Span::styled(format!(" {}", rule(right)), style));
        }
        Line::from(spans)
    }
}

fn rule(width: usize) -> String {
    std::iter::repeat(RULE).take(width).collect()
}

/// Cut a run of spans down to `width` columns
fn clip(spans: Vec<Span<'static>>, width: usize) -> Vec<Span<'static>> {
    let mut remaining = width;
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        let w = display_width(&span.content);
        if w <= remaining {
            remaining -= w;
            out.push(span);
        } else {
            if remaining > 0 {
                out.push(Span::styled(truncate(&span.content, remaining), span.style));
            }
            break;
        }
    }
    out
}
