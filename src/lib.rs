//! # Introduction
//!
//! disview shows the source of a function next to its bytecode, one source
//! line per row with the instructions it compiled to beside it. Instruction
//! streams and source text come from a JSON disassembly dump; jump targets
//! are colored so a jump and its destination can be matched at a glance.
//!
//! ## Pipeline
//!
//! ```text
//! Dump → resolve → expand → build_listing → Display → print / pager
//! ```
//!
//! 1. [`target`]: loads the dump and turns dotted paths into the functions
//!    to show.
//! 2. [`layout`]: the alignment and layout engine. Pure, no I/O: aligns
//!    instructions with source lines, assigns jump colors, fits both panes
//!    to the terminal width.
//! 3. [`ui`]: highlights the source with syntect, renders the instruction
//!    grid and writes the result to stdout or a ratatui pager.
//! 4. [`cli`]: argument parsing and the per-target error handling.

pub mod cli;
pub mod layout;
pub mod target;
pub mod ui;
