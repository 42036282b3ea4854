//! Instruction grid rendering
//!
//! Each instruction row becomes four padded cells (offset, mnemonic, operand,
//! operand text). Cells that belong to a jump keep the jump color assigned by
//! the layout engine; everything else is drawn in the grid text color on the
//! theme background.

use crate::layout::widths::{display_width, pad_to, truncate};
use crate::layout::{Cell, GridColumns, InstructionRow, GRID_HEADERS};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

fn base_style(background: Option<Color>) -> Style {
    match background {
        Some(bg) => Style::default().bg(bg),
        None => Style::default(),
    }
}

fn widths(grid: &GridColumns) -> [usize; 4] {
    [grid.offset, grid.mnemonic, grid.operand, grid.operand_text]
}

/// Header row of the grid
pub fn grid_header(grid: &GridColumns, background: Option<Color>) -> Vec<Span<'static>> {
    let header_style = base_style(background)
        .fg(DEFAULT_THEME.grid_header)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    GRID_HEADERS
        .iter()
        .zip(widths(grid))
        .filter(|(_, width)| *width > 0)
        .flat_map(|(header, width)| {
            // underline the title only, not the gap after it
            let title = truncate(header, width - 1);
            let gap = " ".repeat(width - display_width(&title));
            [
                Span::styled(title, header_style),
                Span::styled(gap, base_style(background)),
            ]
        })
        .filter(|span| !span.content.is_empty())
        .collect()
}

fn cell_span(cell: &Cell, width: usize, background: Option<Color>) -> Span<'static> {
    let style = base_style(background).fg(cell.color.unwrap_or(DEFAULT_THEME.grid_text));
    Span::styled(pad_to(&cell.text, width), style)
}

/// One grid row; blank rows are a run of background-colored spaces
pub fn grid_row(
    row: &InstructionRow,
    grid: &GridColumns,
    background: Option<Color>,
) -> Vec<Span<'static>> {
    let [offset, mnemonic, operand, operand_text] = widths(grid);
    match row {
        InstructionRow::Blank => {
            let total = offset + mnemonic + operand + operand_text;
            vec![Span::styled(pad_to("", total), base_style(background))]
        }
        InstructionRow::Instruction(cells) => vec![
            cell_span(&cells.offset, offset, background),
            cell_span(&cells.mnemonic, mnemonic, background),
            cell_span(&cells.operand, operand, background),
            cell_span(&cells.operand_text, operand_text, background),
        ],
    }
}
