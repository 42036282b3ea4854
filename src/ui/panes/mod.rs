//! Rendering of the individual panes
//!
//! - [`source`]: syntax-highlighted source rows
//! - [`bytecode`]: the instruction grid and its header
//! - [`status`]: the pager status bar
//!
//! Pane renderers only produce styled spans; [`crate::ui::display`] puts the
//! panes side by side.

pub mod bytecode;
pub mod source;
pub mod status;

pub use bytecode::{grid_header, grid_row};
pub use source::{Highlighter, DEFAULT_SYNTAX_THEME};
pub use status::render_status_bar;
