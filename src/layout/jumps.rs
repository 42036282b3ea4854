//! Jump target color correlation
//!
//! Every offset that some instruction jumps to gets its own color, drawn
//! without replacement from a [`JumpPalette`]. The same color is then used on
//! the target's offset cell and on the operand cells of every instruction that
//! branches there, so a jump can be traced by eye without drawing arrows.

use super::errors::LayoutError;
use super::instruction::Instruction;
use rand::seq::SliceRandom;
use rand::Rng;
use ratatui::style::Color;
use rustc_hash::FxHashMap;

/// Jump-target offset to its color
pub type JumpColorMap = FxHashMap<usize, Color>;

/// Named ANSI colors that stay readable on both dark and light themes
const NAMED_COLORS: [Color; 12] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::LightRed,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightBlue,
    Color::LightMagenta,
    Color::LightCyan,
];

/// A set of distinct colors to draw jump colors from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpPalette {
    colors: Vec<Color>,
}

impl JumpPalette {
    /// Build a palette from arbitrary colors; duplicates are dropped
    pub fn from_colors(colors: impl IntoIterator<Item = Color>) -> Self {
        let mut distinct: Vec<Color> = Vec::new();
        for color in colors {
            if !distinct.contains(&color) {
                distinct.push(color);
            }
        }
        JumpPalette { colors: distinct }
    }

    /// The default palette: the named ANSI colors plus the xterm 6x6x6 color
    /// cube, with black, white and every gray shade left out.
    pub fn terminal_safe() -> Self {
        let cube = (16u8..=231).filter(|&idx| {
            let n = idx - 16;
            let (r, g, b) = (n / 36, (n / 6) % 6, n % 6);
            !(r == g && g == b)
        });
        JumpPalette::from_colors(
            NAMED_COLORS
                .iter()
                .copied()
                .chain(cube.map(Color::Indexed)),
        )
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// A single random color, used for the title rule
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Color> {
        self.colors.choose(rng).copied()
    }
}

impl Default for JumpPalette {
    fn default() -> Self {
        Self::terminal_safe()
    }
}

/// Jump-target offsets in first-seen order
pub fn jump_targets(instructions: &[Instruction]) -> Vec<usize> {
    let mut targets = Vec::new();
    for instr in instructions.iter().filter(|i| i.is_jump_target) {
        if !targets.contains(&instr.offset) {
            targets.push(instr.offset);
        }
    }
    targets
}

/// Assign a distinct palette color to every jump target
///
/// Fails with [`LayoutError::PaletteExhausted`] rather than reusing colors
/// when there are more targets than palette entries.
pub fn assign_jump_colors<R: Rng + ?Sized>(
    instructions: &[Instruction],
    palette: &JumpPalette,
    rng: &mut R,
) -> Result<JumpColorMap, LayoutError> {
    let targets = jump_targets(instructions);
    if targets.len() > palette.len() {
        return Err(LayoutError::PaletteExhausted {
            targets: targets.len(),
            palette: palette.len(),
        });
    }

    let picks = rand::seq::index::sample(rng, palette.len(), targets.len());
    Ok(targets
        .into_iter()
        .zip(picks.iter())
        .map(|(offset, idx)| (offset, palette.colors[idx]))
        .collect())
}
