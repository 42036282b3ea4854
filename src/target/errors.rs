//! Errors raised while loading a dump or resolving targets in it

use thiserror::Error;

/// Failures reading a disassembly dump
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("cannot read dump {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dump {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Top-level entries of a dump must be modules
    #[error("top-level entry '{name}' of dump {path} is a {kind}, not a module")]
    RootNotModule {
        path: String,
        name: String,
        kind: String,
    },
}

/// Failures turning a dotted path into something that can be disassembled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no module named '{name}'")]
    ModuleNotFound { name: String },

    #[error("no attribute named '{attribute}' found on {kind} {name}")]
    NoAttribute {
        attribute: String,
        kind: String,
        name: String,
    },

    #[error(
        "the target {path} is a {kind}, which cannot be disassembled; target a specific function{}",
        suggestion_suffix(.suggestion)
    )]
    NotDisassemblable {
        path: String,
        kind: String,
        suggestion: Option<String>,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(path) => format!(", like {}", path),
        None => String::new(),
    }
}
