//! Tree view of a target's modules, classes and functions
//!
//! ```text
//! import geo.shapes
//! ├── class Square
//! │   ├── class Meta
//! │   │   └── def describe
//! │   └── def area
//! └── def unit
//! ```
//!
//! Submodules come first, then classes, then functions, each group in dump
//! order. Values are left out, and so is anything a module only imports.

use crate::target::{Node, NodeKind, Target};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Lines of the tree rooted at `target`
pub fn tree_lines(target: &Target<'_>) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(label(target.node))];
    walk(target.node, target.module_name(), "", &mut lines);
    lines
}

fn rank(kind: NodeKind) -> u8 {
    match kind {
        NodeKind::Module => 0,
        NodeKind::Class => 1,
        NodeKind::Function => 2,
        NodeKind::Value => 3,
    }
}

fn label(node: &Node) -> Vec<Span<'static>> {
    let keyword = Style::default().fg(DEFAULT_THEME.keyword);
    let (word, color) = match node.kind() {
        NodeKind::Module => ("import", DEFAULT_THEME.primary),
        NodeKind::Class => ("class", DEFAULT_THEME.type_name),
        NodeKind::Function => ("def", DEFAULT_THEME.function),
        NodeKind::Value => ("", DEFAULT_THEME.comment),
    };

    let name = Span::styled(
        node.name().to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    );
    if word.is_empty() {
        vec![name]
    } else {
        vec![Span::styled(format!("{} ", word), keyword), name]
    }
}

fn walk(node: &Node, scope: &str, prefix: &str, lines: &mut Vec<Line<'static>>) {
    let mut children: Vec<&Node> = node
        .children()
        .iter()
        .filter(|child| match child.kind() {
            NodeKind::Module => true,
            NodeKind::Value => false,
            NodeKind::Class | NodeKind::Function => child.module_name() == scope,
        })
        .collect();
    children.sort_by_key(|child| rank(child.kind()));

    let guide = Style::default().fg(DEFAULT_THEME.comment);
    let count = children.len();
    for (idx, child) in children.into_iter().enumerate() {
        let (branch, extension) = if idx + 1 == count {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };

        let mut spans = vec![Span::styled(format!("{}{}", prefix, branch), guide)];
        spans.extend(label(child));
        lines.push(Line::from(spans));

        // a submodule bounds its own subtree
        let child_scope = match child.kind() {
            NodeKind::Module => child.name(),
            _ => scope,
        };
        walk(child, child_scope, &format!("{}{}", prefix, extension), lines);
    }
}
