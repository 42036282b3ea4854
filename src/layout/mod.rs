//! Alignment and layout engine
//!
//! Turns one function's instruction stream and source text into a
//! [`Listing`]: three parallel, equally long row sequences that are already
//! dedented, fitted to the terminal and colorized. Nothing in this module
//! performs I/O.
//!
//! # Pipeline
//!
//! ```text
//! instructions ─┬─> jumps::assign_jump_colors ─┐
//!               └──────────────────────────────┴─> align::align ─> dedent
//!                 ─> widths::column_widths ─> widths::truncate ─> Listing
//! ```
//!
//! - [`instruction`]: the instruction and source models
//! - [`jumps`]: jump-target color assignment from a [`JumpPalette`]
//! - [`align`]: the row alignment state machine
//! - [`widths`]: pane widths, truncation and dedenting

pub mod align;
pub mod errors;
pub mod instruction;
pub mod jumps;
pub mod widths;

pub use align::{
    align, AlignedRows, Cell, InstructionCells, InstructionRow, NO_SOURCE_SENTINEL,
};
pub use errors::LayoutError;
pub use instruction::{Instruction, SourceText};
pub use jumps::{assign_jump_colors, JumpColorMap, JumpPalette};
pub use widths::{column_widths, dedent, truncate, PaneWidths};

use log::debug;
use rand::Rng;
use widths::display_width;

/// Column headers of the instruction grid
pub const GRID_HEADERS: [&str; 4] = ["OFF", "OPERATION", "ARGS", ""];

/// Terminal geometry and split preferences
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub terminal_width: usize,
    /// Share of the usable width given to the source pane
    pub ratio: f64,
    /// Columns taken by the separators between the four columns
    pub border_overhead: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            terminal_width: 80,
            ratio: 0.5,
            border_overhead: 3,
        }
    }
}

/// Widths of the four instruction grid columns
///
/// Each fixed column is one wider than its widest cell so neighbouring cells
/// never touch. `operand_text` gets whatever the instruction pane has left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridColumns {
    pub offset: usize,
    pub mnemonic: usize,
    pub operand: usize,
    pub operand_text: usize,
}

impl GridColumns {
    fn measure(rows: &[InstructionRow], pane_width: usize) -> Self {
        let widest = |header: &str, cell: fn(&InstructionCells) -> &Cell| {
            rows.iter()
                .filter_map(InstructionRow::cells)
                .map(|cells| display_width(&cell(cells).text))
                .chain(std::iter::once(display_width(header)))
                .max()
                .unwrap_or(0)
                + 1
        };

        let mut grid = GridColumns {
            offset: widest(GRID_HEADERS[0], |c| &c.offset),
            mnemonic: widest(GRID_HEADERS[1], |c| &c.mnemonic),
            operand: widest(GRID_HEADERS[2], |c| &c.operand),
            operand_text: 0,
        };
        grid.operand_text = pane_width.saturating_sub(grid.fixed_width());
        grid
    }

    /// Width of the offset, mnemonic and operand columns together
    pub fn fixed_width(&self) -> usize {
        self.offset + self.mnemonic + self.operand
    }
}

/// Everything the renderer needs for one function
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub rows: AlignedRows,
    pub jump_colors: JumpColorMap,
    pub number_width: usize,
    pub widths: PaneWidths,
    pub grid: GridColumns,
}

impl Listing {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Align, fit and colorize one function
///
/// Returns either a complete listing or an error; never a partial one.
pub fn build_listing<R: Rng + ?Sized>(
    instructions: &[Instruction],
    source: Option<&SourceText>,
    options: &LayoutOptions,
    palette: &JumpPalette,
    rng: &mut R,
) -> Result<Listing, LayoutError> {
    let jump_colors = assign_jump_colors(instructions, palette, rng)?;
    let mut rows = align(instructions, source, &jump_colors)?;

    dedent(&mut rows.source);

    let number_width = rows.number_width();
    let widths = column_widths(
        number_width,
        options.ratio,
        options.terminal_width,
        options.border_overhead,
    );

    for line in rows.source.iter_mut() {
        *line = truncate(line, widths.left);
    }

    let grid = GridColumns::measure(&rows.instructions, widths.right);
    for row in rows.instructions.iter_mut() {
        if let InstructionRow::Instruction(cells) = row {
            cells.operand_text.text = truncate(&cells.operand_text.text, grid.operand_text);
        }
    }

    debug!(
        "listing: {} rows, {} jump targets, panes {}+{}, gutter {}",
        rows.len(),
        jump_colors.len(),
        widths.left,
        widths.right,
        number_width
    );

    Ok(Listing {
        rows,
        jump_colors,
        number_width,
        widths,
        grid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_grid_columns_fit_widest_cell() {
        let instructions = vec![
            Instruction::new(0, "LOAD_GLOBAL")
                .with_operand(1, "NULL + print")
                .on_line(2),
            Instruction::new(10, "CALL").with_operand(1, ""),
        ];
        let source = SourceText::new(1, ["def f():", "    print()"]);
        let options = LayoutOptions {
            terminal_width: 60,
            ..Default::default()
        };

        let listing = build_listing(
            &instructions,
            Some(&source),
            &options,
            &JumpPalette::default(),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();

        // headers win where they are wider than every cell
        assert_eq!(listing.grid.offset, 4);
        assert_eq!(listing.grid.mnemonic, "LOAD_GLOBAL".len() + 1);
        assert_eq!(listing.grid.operand, "ARGS".len() + 1);
        assert_eq!(
            listing.grid.operand_text,
            listing.widths.right - listing.grid.fixed_width()
        );
    }

    #[test]
    fn test_listing_is_dedented_and_truncated() {
        let source = SourceText::new(
            4,
            [
                "    def method(self):",
                "        return self.some_rather_long_attribute_name",
            ],
        );
        let instructions = vec![
            Instruction::new(0, "LOAD_FAST").with_operand(0, "self").on_line(5),
            Instruction::new(2, "LOAD_ATTR")
                .with_operand(0, "some_rather_long_attribute_name"),
            Instruction::new(4, "RETURN_VALUE"),
        ];
        let options = LayoutOptions {
            terminal_width: 50,
            ..Default::default()
        };

        let listing = build_listing(
            &instructions,
            Some(&source),
            &options,
            &JumpPalette::default(),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();

        // 50 - 3 - 2 * 1 = 45, split 23 / 22
        assert_eq!(listing.widths, PaneWidths::from((23, 22)));
        assert_eq!(listing.rows.source[0], "def method(self):");
        for line in &listing.rows.source {
            assert!(display_width(line) <= 23);
        }
        assert!(listing.rows.source.last().unwrap().ends_with('…'));
    }

    #[test]
    fn test_palette_exhaustion_is_reported() {
        let instructions = vec![
            Instruction::new(0, "NOP").jump_target(),
            Instruction::new(2, "NOP").jump_target(),
        ];
        let palette = JumpPalette::from_colors([ratatui::style::Color::Red]);

        let result = build_listing(
            &instructions,
            None,
            &LayoutOptions::default(),
            &palette,
            &mut StdRng::seed_from_u64(0),
        );

        assert_eq!(
            result.unwrap_err(),
            LayoutError::PaletteExhausted {
                targets: 2,
                palette: 1
            }
        );
    }
}
