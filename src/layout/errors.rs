//! Error types for the alignment and layout engine
//!
//! [`LayoutError`] covers the inputs the engine refuses to lay out. Missing
//! source text and empty instruction streams are not errors: the aligner
//! degrades to a sentinel row or to source-only rows instead.

use thiserror::Error;

/// Errors raised while building a listing for one function
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// More jump targets than distinct colors in the palette
    #[error("{targets} jump targets but the palette only has {palette} distinct colors")]
    PaletteExhausted { targets: usize, palette: usize },

    /// Instruction offsets are not strictly increasing
    #[error("instruction at offset {offset} follows offset {previous}; instructions must be sorted by offset")]
    UnsortedInstructions { offset: usize, previous: usize },

    /// An instruction points at a line the supplied source does not contain
    #[error("instruction at offset {offset} starts line {line}, outside the supplied source lines {first}..={last}")]
    LineOutOfRange {
        offset: usize,
        line: usize,
        first: usize,
        last: usize,
    },
}
