//! Terminal output built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`display`]**: lays out one function as title, header and aligned rows
//! - **[`panes`]**: span renderers for the source pane, the instruction grid and
//!   the status bar
//! - **[`tree`]**: module/class/function tree of a target
//! - **[`print`]**: writes styled lines straight to a terminal or pipe
//! - **[`app`]**: full-screen pager for output taller than the terminal
//! - **[`theme`]**: centralized color palette

pub mod app;
pub mod display;
pub mod errors;
pub mod panes;
pub mod print;
pub mod theme;
pub mod tree;

pub use app::{page, App};
pub use display::{Display, Title};
pub use errors::DisplayError;
pub use print::print_lines;
pub use tree::tree_lines;
