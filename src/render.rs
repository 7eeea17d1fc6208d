//! Tree rendering: a deterministic, cycle-safe text view of the concept graph.
//!
//! The graph is drawn as a tree from the root in depth-first pre-order:
//!
//! ```text
//! └── Creativity
//!     ├── Improvisation
//!     │   ├── Jazz
//!     │   └── Theatre Sports
//!     └── Play
//! ```
//!
//! A concept reachable from two parents appears under both. Each branch
//! carries the chain of concepts above it; meeting one of those again emits
//! a single `(...)` line instead of descending, so cycles terminate.

use std::collections::HashSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, ExplorerResult};
use crate::graph::ConceptGraph;
use crate::types::NodeClass;

const BRANCH: &str = "├── ";
const LAST: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";
/// Suffix on a row whose concept already appears above on its branch
pub const REVISIT_MARK: &str = " (...)";

/// Connector drawn in front of a concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connector {
    /// More siblings follow
    Branch,
    /// Last sibling
    Last,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::Branch => BRANCH,
            Connector::Last => LAST,
        }
    }

    /// Prefix segment handed down to this node's children
    fn continuation(&self) -> &'static str {
        match self {
            Connector::Branch => PIPE,
            Connector::Last => SPACE,
        }
    }
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeLine {
    /// Indentation drawn from the ancestors' sibling positions
    pub prefix: String,
    pub connector: Connector,
    pub concept: String,
    /// Distance from the root along this branch
    pub depth: usize,
    pub class: NodeClass,
    /// Concept already appears above on this branch; not descended into
    pub revisit: bool,
}

impl TreeLine {
    /// Undecorated text for this row
    pub fn plain(&self) -> String {
        let mark = if self.revisit { REVISIT_MARK } else { "" };
        format!(
            "{}{}{}{}",
            self.prefix,
            self.connector.as_str(),
            self.concept,
            mark
        )
    }
}

/// Concepts above the current node on its branch. Shared between siblings
/// and never mutated, so one sibling's descent cannot leak into another's.
struct Branch<'a> {
    concept: &'a str,
    parent: Option<Rc<Branch<'a>>>,
}

fn on_branch(branch: &Option<Rc<Branch<'_>>>, concept: &str) -> bool {
    let mut cursor = branch.as_deref();
    while let Some(b) = cursor {
        if b.concept == concept {
            return true;
        }
        cursor = b.parent.as_deref();
    }
    false
}

struct Frame<'a> {
    concept: &'a str,
    prefix: String,
    connector: Connector,
    depth: usize,
    branch: Option<Rc<Branch<'a>>>,
}

/// Render `graph` from `root`, highlighting `focus` and drawing the path to it first.
///
/// A `focus` that is not in the graph is ignored. An absent root renders
/// as no lines.
pub fn render(graph: &ConceptGraph, root: &str, focus: Option<&str>) -> Vec<TreeLine> {
    let mut lines = Vec::new();
    if !graph.contains(root) {
        return lines;
    }

    let focus = focus.filter(|f| graph.contains(f));
    let focus_path: HashSet<String> = match focus {
        Some(f) => {
            let mut path: HashSet<String> = graph.ancestors_of(f).into_iter().collect();
            path.insert(f.to_string());
            path
        }
        None => HashSet::new(),
    };

    let mut stack = vec![Frame {
        concept: root,
        prefix: String::new(),
        connector: Connector::Last,
        depth: 0,
        branch: None,
    }];

    while let Some(frame) = stack.pop() {
        let revisit = on_branch(&frame.branch, frame.concept);
        let class = graph
            .classify(frame.concept, focus)
            .unwrap_or(NodeClass::Leaf);
        lines.push(TreeLine {
            prefix: frame.prefix.clone(),
            connector: frame.connector,
            concept: frame.concept.to_string(),
            depth: frame.depth,
            class,
            revisit,
        });
        if revisit {
            continue;
        }

        let mut children: Vec<&str> = graph
            .successors(frame.concept)
            .iter()
            .map(String::as_str)
            .collect();
        if !focus_path.is_empty() {
            // Stable: path children first, each group in graph order
            children.sort_by_key(|c| !focus_path.contains(*c));
        }

        let branch = Some(Rc::new(Branch {
            concept: frame.concept,
            parent: frame.branch.clone(),
        }));
        let child_prefix = format!("{}{}", frame.prefix, frame.connector.continuation());
        let count = children.len();

        // Pushed in reverse so the first child is rendered first
        for (i, child) in children.into_iter().enumerate().rev() {
            stack.push(Frame {
                concept: child,
                prefix: child_prefix.clone(),
                connector: if i + 1 == count {
                    Connector::Last
                } else {
                    Connector::Branch
                },
                depth: frame.depth + 1,
                branch: branch.clone(),
            });
        }
    }

    lines
}

/// Plain-text dump, one row per line with a trailing newline
pub fn to_plain_text(lines: &[TreeLine]) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(&line.plain());
        text.push('\n');
    }
    text
}

/// Parent/child structure recovered from a plain-text dump
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTree {
    pub root: Option<String>,
    /// `(parent, child)` pairs in document order
    pub edges: Vec<(String, String)>,
}

/// Rebuild the adjacency drawn by [`to_plain_text`].
pub fn parse_plain_tree(text: &str) -> ExplorerResult<ParsedTree> {
    let mut parsed = ParsedTree::default();
    let mut ancestors: Vec<String> = Vec::new();

    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut rest = line;
        let mut depth = 0;
        while let Some(r) = rest.strip_prefix(PIPE).or_else(|| rest.strip_prefix(SPACE)) {
            rest = r;
            depth += 1;
        }
        let name = rest
            .strip_prefix(BRANCH)
            .or_else(|| rest.strip_prefix(LAST))
            .ok_or_else(|| malformed(number, "missing connector"))?;
        let name = name.strip_suffix(REVISIT_MARK).unwrap_or(name);

        // Only one row may sit at indentation zero
        if depth > ancestors.len() || (depth == 0 && parsed.root.is_some()) {
            return Err(malformed(number, "unexpected indentation"));
        }
        ancestors.truncate(depth);

        match ancestors.last() {
            Some(parent) => parsed.edges.push((parent.clone(), name.to_string())),
            None => parsed.root = Some(name.to_string()),
        }
        ancestors.push(name.to_string());
    }

    Ok(parsed)
}

fn malformed(number: usize, reason: &str) -> ExplorerError {
    ExplorerError::Other(anyhow::anyhow!(
        "malformed tree line {}: {reason}",
        number + 1
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explored() -> ConceptGraph {
        let mut graph = ConceptGraph::new("Creativity");
        for (from, to) in [
            ("Creativity", "Improvisation"),
            ("Creativity", "Constraint"),
            ("Creativity", "Play"),
            ("Improvisation", "Jazz"),
            ("Improvisation", "Theatre Sports"),
            ("Play", "Game Theory"),
        ] {
            graph.add_edge(from, to).unwrap();
        }
        graph
    }

    fn plain(lines: &[TreeLine]) -> Vec<String> {
        lines.iter().map(TreeLine::plain).collect()
    }

    #[test]
    fn renders_preorder_with_connectors() {
        let graph = explored();
        let lines = render(&graph, "Creativity", None);
        assert_eq!(
            plain(&lines),
            [
                "└── Creativity",
                "    ├── Improvisation",
                "    │   ├── Jazz",
                "    │   └── Theatre Sports",
                "    ├── Constraint",
                "    └── Play",
                "        └── Game Theory",
            ]
        );
        assert_eq!(lines[2].depth, 2);
    }

    #[test]
    fn classifies_rows() {
        let graph = explored();
        let lines = render(&graph, "Creativity", None);
        assert_eq!(lines[0].class, NodeClass::Root);
        assert_eq!(lines[1].class, NodeClass::Interior);
        assert_eq!(lines[2].class, NodeClass::Leaf);
        assert!(lines.iter().all(|l| l.class != NodeClass::Focus));
    }

    #[test]
    fn focus_path_drawn_first() {
        let graph = explored();
        let lines = render(&graph, "Creativity", Some("Game Theory"));
        let names: Vec<&str> = lines.iter().map(|l| l.concept.as_str()).collect();
        assert_eq!(
            names,
            [
                "Creativity",
                "Play",
                "Game Theory",
                "Improvisation",
                "Jazz",
                "Theatre Sports",
                "Constraint",
            ]
        );
        let focus = lines.iter().find(|l| l.concept == "Game Theory").unwrap();
        assert_eq!(focus.class, NodeClass::Focus);
    }

    #[test]
    fn unknown_focus_is_ignored() {
        let graph = explored();
        assert_eq!(
            render(&graph, "Creativity", Some("Pruned Away")),
            render(&graph, "Creativity", None)
        );
    }

    #[test]
    fn focused_and_plain_share_structure() {
        let graph = explored();
        let edges = |lines: &[TreeLine]| -> HashSet<(String, String)> {
            parse_plain_tree(&to_plain_text(lines))
                .unwrap()
                .edges
                .into_iter()
                .collect()
        };
        let focused = render(&graph, "Creativity", Some("Jazz"));
        let unfocused = render(&graph, "Creativity", None);
        assert_eq!(focused.len(), unfocused.len());
        assert_eq!(edges(&focused), edges(&unfocused));
    }

    #[test]
    fn shared_child_appears_under_each_parent() {
        let mut graph = explored();
        graph.add_edge("Constraint", "Jazz").unwrap();
        let lines = render(&graph, "Creativity", None);
        let jazz_rows = lines.iter().filter(|l| l.concept == "Jazz").count();
        assert_eq!(jazz_rows, 2);
        assert!(lines.iter().all(|l| !l.revisit));
    }

    #[test]
    fn cycle_terminates_with_revisit_marker() {
        let mut graph = ConceptGraph::new("R");
        graph.add_edge("R", "A").unwrap();
        graph.add_edge("A", "B").unwrap();
        graph.add_edge("B", "A").unwrap();

        let lines = render(&graph, "R", None);
        assert_eq!(
            plain(&lines),
            ["└── R", "    └── A", "        └── B", "            └── A (...)"]
        );
        assert!(lines[3].revisit);
    }

    #[test]
    fn absent_root_renders_nothing() {
        let mut graph = explored();
        graph.remove_subtree("Creativity").unwrap();
        assert!(render(&graph, "Creativity", None).is_empty());
    }

    #[test]
    fn plain_text_round_trip() {
        let graph = explored();
        let text = to_plain_text(&render(&graph, "Creativity", None));
        let parsed = parse_plain_tree(&text).unwrap();

        assert_eq!(parsed.root.as_deref(), Some("Creativity"));
        let expected: Vec<(String, String)> = graph
            .edges()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        let got: HashSet<_> = parsed.edges.into_iter().collect();
        assert_eq!(got, expected.into_iter().collect::<HashSet<_>>());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_plain_tree("just some words").is_err());
        assert!(parse_plain_tree("└── A\n        └── B").is_err());
        assert!(parse_plain_tree("└── A\n└── B").is_err());
    }
}
