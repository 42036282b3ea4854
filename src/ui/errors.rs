//! Errors raised while rendering a target

use crate::layout::LayoutError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayError {
    #[error("unknown theme '{name}'; available themes: {}", .available.join(", "))]
    UnknownTheme {
        name: String,
        available: Vec<String>,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}
