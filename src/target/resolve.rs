//! Target resolution
//!
//! A target path such as `shapes.Square.area` is resolved by finding the
//! longest dotted prefix that names a module in the dump, then walking the
//! remaining segments through the children of that module.
//!
//! Modules and classes expand to every function they define. Expansion never
//! leaves the module the target was resolved through: names a module merely
//! imports are skipped.

use super::errors::ResolveError;
use super::{Dump, FunctionNode, Node, NodeKind};
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

/// A resolved node together with the path that named it
#[derive(Debug, Clone)]
pub struct Target<'a> {
    pub node: &'a Node,
    pub path: String,
    /// Module the path was resolved through
    pub imported_from: Option<&'a str>,
}

impl<'a> Target<'a> {
    pub fn new(node: &'a Node, path: impl Into<String>) -> Self {
        Target {
            node,
            path: path.into(),
            imported_from: None,
        }
    }

    /// Module that bounds child discovery for this target
    pub fn module_name(&self) -> &'a str {
        self.imported_from
            .unwrap_or_else(|| self.node.module_name())
    }

    pub fn function(&self) -> Option<&'a FunctionNode> {
        self.node.as_function()
    }

    /// `module.qualname`, as shown in titles
    pub fn full_name(&self) -> String {
        match self.node.kind() {
            NodeKind::Module => self.node.name().to_string(),
            _ => format!("{}.{}", self.node.module_name(), self.node.qualname()),
        }
    }
}

/// Every function defined under `target`, recursing into classes
pub fn child_targets<'a>(target: &Target<'a>) -> Vec<Target<'a>> {
    let mut found = Vec::new();
    collect_children(target.node, &target.path, target.module_name(), &mut found);
    found
}

fn collect_children<'a>(node: &'a Node, path: &str, scope: &str, found: &mut Vec<Target<'a>>) {
    for child in node.children() {
        if child.module_name() != scope {
            continue;
        }
        let child_path = format!("{}.{}", path, child.name());
        match child {
            Node::Class(_) => collect_children(child, &child_path, scope, found),
            Node::Function(_) => found.push(Target::new(child, child_path)),
            Node::Module(_) | Node::Value(_) => {}
        }
    }
}

impl Dump {
    /// Resolve a dotted path to a node of the dump
    pub fn resolve(&self, path: &str) -> Result<Target<'_>, ResolveError> {
        let parts: Vec<&str> = path.split('.').collect();

        for split in (1..=parts.len()).rev() {
            let module_path = parts[..split].join(".");
            let Some(module) = self.find_module(&module_path) else {
                continue;
            };

            let mut node = module;
            for attribute in &parts[split..] {
                node = node
                    .child(attribute)
                    .ok_or_else(|| ResolveError::NoAttribute {
                        attribute: attribute.to_string(),
                        kind: node.type_name(),
                        name: node.name().to_string(),
                    })?;
            }

            debug!("resolved {} through module {}", path, module.name());
            return Ok(Target {
                node,
                path: path.to_string(),
                imported_from: Some(module.name()),
            });
        }

        Err(ResolveError::ModuleNotFound {
            name: parts[0].to_string(),
        })
    }

    /// Turn a target into the functions to display
    ///
    /// Functions stand for themselves and containers expand to their child
    /// functions. Anything else, including a container without functions,
    /// fails with a suggested function to target instead, drawn at random
    /// from the target's children or siblings.
    pub fn expand<'a, R: Rng + ?Sized>(
        &'a self,
        target: Target<'a>,
        rng: &mut R,
    ) -> Result<Vec<Target<'a>>, ResolveError> {
        match target.node.kind() {
            NodeKind::Function => Ok(vec![target]),
            NodeKind::Module | NodeKind::Class => {
                let children = child_targets(&target);
                if children.is_empty() {
                    warn!("{} {} defines no functions", target.node.kind(), target.path);
                    return Err(self.cannot_be_disassembled(&target, rng));
                }
                Ok(children)
            }
            NodeKind::Value => Err(self.cannot_be_disassembled(&target, rng)),
        }
    }

    fn cannot_be_disassembled<R: Rng + ?Sized>(
        &self,
        target: &Target<'_>,
        rng: &mut R,
    ) -> ResolveError {
        let mut candidates = child_targets(target);
        if candidates.is_empty() {
            // paths start at the module, not at the target
            let scope = target.module_name();
            if let Some(module) = self.find_module(scope) {
                candidates = child_targets(&Target::new(module, scope));
            }
        }

        ResolveError::NotDisassemblable {
            path: target.path.clone(),
            kind: target.node.type_name(),
            suggestion: candidates.choose(rng).map(|t| t.path.clone()),
        }
    }
}
