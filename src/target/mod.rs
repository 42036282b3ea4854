//! Disassembly dumps and the targets inside them
//!
//! A dump is a JSON description of a tree of modules, classes and functions,
//! written by whatever disassembler produced the instruction streams. Each
//! function carries its instructions and, when available, its source lines.
//!
//! ```json
//! [{ "kind": "module", "name": "pkg.mod", "file": "pkg/mod.py", "children": [
//!     { "kind": "function", "name": "f", "qualname": "f", "module": "pkg.mod",
//!       "source": { "start_line": 1, "lines": ["def f():", "    pass"] },
//!       "instructions": [{ "offset": 0, "mnemonic": "RETURN_CONST",
//!                          "operand": 0, "operand_text": "None",
//!                          "source_line": 2 }] }
//! ]}]
//! ```
//!
//! [`resolve`] turns dotted paths into [`Target`]s and expands containers into
//! the functions they define.

pub mod errors;
pub mod resolve;

pub use errors::{DumpError, ResolveError};
pub use resolve::{child_targets, Target};

use crate::layout::{Instruction, SourceText};
use serde::Deserialize;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Variant kinds of dump nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    Class,
    Function,
    Value,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Module => "module",
            NodeKind::Class => "class",
            NodeKind::Function => "function",
            NodeKind::Value => "value",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleNode {
    pub name: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassNode {
    pub name: String,
    #[serde(default)]
    pub qualname: Option<String>,
    /// Name of the module the class was defined in
    pub module: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionNode {
    pub name: String,
    #[serde(default)]
    pub qualname: Option<String>,
    pub module: String,
    /// Syntax used to highlight the source
    #[serde(default = "default_language")]
    pub language: String,
    /// `None` when the source could not be retrieved
    #[serde(default)]
    pub source: Option<SourceText>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

fn default_language() -> String {
    "python".to_string()
}

/// Any other attribute: a constant, an instance, a builtin
#[derive(Debug, Clone, Deserialize)]
pub struct ValueNode {
    pub name: String,
    pub module: String,
    /// Runtime type name, shown in error messages
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
}

/// One entry of the dump tree
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Module(ModuleNode),
    Class(ClassNode),
    Function(FunctionNode),
    Value(ValueNode),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Module(_) => NodeKind::Module,
            Node::Class(_) => NodeKind::Class,
            Node::Function(_) => NodeKind::Function,
            Node::Value(_) => NodeKind::Value,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Module(m) => &m.name,
            Node::Class(c) => &c.name,
            Node::Function(f) => &f.name,
            Node::Value(v) => &v.name,
        }
    }

    /// Name of the module that owns this node; a module owns itself
    pub fn module_name(&self) -> &str {
        match self {
            Node::Module(m) => &m.name,
            Node::Class(c) => &c.module,
            Node::Function(f) => &f.module,
            Node::Value(v) => &v.module,
        }
    }

    /// Qualified name inside the owning module
    pub fn qualname(&self) -> &str {
        match self {
            Node::Class(ClassNode {
                qualname: Some(q), ..
            })
            | Node::Function(FunctionNode {
                qualname: Some(q), ..
            }) => q.as_str(),
            _ => self.name(),
        }
    }

    /// Word used when describing the node to a user
    pub fn type_name(&self) -> String {
        match self {
            Node::Value(ValueNode {
                type_name: Some(t), ..
            }) => t.clone(),
            other => other.kind().to_string(),
        }
    }

    /// Children of a container; functions and values have none
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Module(m) => &m.children,
            Node::Class(c) => &c.children,
            Node::Function(_) | Node::Value(_) => &[],
        }
    }

    /// Direct child by name
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children().iter().find(|c| c.name() == name)
    }

    pub fn as_function(&self) -> Option<&FunctionNode> {
        match self {
            Node::Function(f) => Some(f),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DumpRoot {
    Many(Vec<Node>),
    One(Box<Node>),
}

/// A loaded disassembly dump
#[derive(Debug, Clone, Default)]
pub struct Dump {
    roots: Vec<Node>,
}

impl Dump {
    /// Parse a dump; `origin` names the input in error messages
    pub fn from_reader<R: Read>(reader: R, origin: &str) -> Result<Self, DumpError> {
        let root: DumpRoot =
            serde_json::from_reader(reader).map_err(|source| DumpError::Parse {
                path: origin.to_string(),
                source,
            })?;
        let roots = match root {
            DumpRoot::Many(nodes) => nodes,
            DumpRoot::One(node) => vec![*node],
        };

        if let Some(bad) = roots.iter().find(|n| n.kind() != NodeKind::Module) {
            return Err(DumpError::RootNotModule {
                path: origin.to_string(),
                name: bad.name().to_string(),
                kind: bad.kind().to_string(),
            });
        }
        Ok(Dump { roots })
    }

    pub fn from_json(json: &str) -> Result<Self, DumpError> {
        Self::from_reader(json.as_bytes(), "<string>")
    }

    /// Load from a file, or from stdin when `path` is `-`
    pub fn load(path: &Path) -> Result<Self, DumpError> {
        let origin = path.display().to_string();
        if origin == "-" {
            return Self::from_reader(std::io::stdin().lock(), "<stdin>");
        }
        let file = std::fs::File::open(path).map_err(|source| DumpError::Io {
            path: origin.clone(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file), &origin)
    }

    pub fn modules(&self) -> &[Node] {
        &self.roots
    }

    /// Find a module by its full dotted name, at the top level or nested
    /// inside another module
    pub fn find_module(&self, name: &str) -> Option<&Node> {
        fn search<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Node> {
            for node in nodes.iter().filter(|n| n.kind() == NodeKind::Module) {
                if node.name() == name {
                    return Some(node);
                }
                if let Some(found) = search(node.children(), name) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.roots, name)
    }

    /// File the named module was loaded from
    pub fn module_file(&self, name: &str) -> Option<&str> {
        match self.find_module(name) {
            Some(Node::Module(m)) => m.file.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"
    {
        "kind": "module", "name": "shapes", "file": "shapes.py",
        "children": [
            { "kind": "class", "name": "Square", "module": "shapes", "children": [
                { "kind": "function", "name": "area", "qualname": "Square.area",
                  "module": "shapes", "source": null, "instructions": [] }
            ]},
            { "kind": "value", "name": "SIDES", "module": "shapes", "type": "int" },
            { "kind": "module", "name": "shapes.util", "children": [] }
        ]
    }"#;

    #[test]
    fn test_single_module_root() {
        let dump = Dump::from_json(DUMP).unwrap();
        assert_eq!(dump.modules().len(), 1);
        assert_eq!(dump.module_file("shapes"), Some("shapes.py"));
        assert!(dump.find_module("shapes.util").is_some());
        assert!(dump.find_module("shapes.Square").is_none());
    }

    #[test]
    fn test_node_accessors() {
        let dump = Dump::from_json(DUMP).unwrap();
        let shapes = dump.find_module("shapes").unwrap();

        let square = shapes.child("Square").unwrap();
        assert_eq!(square.kind(), NodeKind::Class);
        assert_eq!(square.qualname(), "Square");

        let area = square.child("area").unwrap();
        assert_eq!(area.qualname(), "Square.area");
        let function = area.as_function().unwrap();
        assert_eq!(function.language, "python");
        assert!(function.source.is_none());

        assert_eq!(shapes.child("SIDES").unwrap().type_name(), "int");
    }

    #[test]
    fn test_root_must_be_module() {
        let json = r#"[{ "kind": "value", "name": "x", "module": "m" }]"#;
        assert!(matches!(
            Dump::from_json(json),
            Err(DumpError::RootNotModule { .. })
        ));
    }

    #[test]
    fn test_malformed_dump() {
        let err = Dump::from_json("{ not json").unwrap_err();
        assert!(matches!(err, DumpError::Parse { .. }));
        assert!(err.to_string().starts_with("malformed dump <string>"));
    }
}
