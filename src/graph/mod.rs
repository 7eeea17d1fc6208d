//! Concept graph: the directed graph of concepts discovered during a session.
//!
//! A concept's display string is its identity. Every concept other than the
//! root arrives through an edge from a concept already present, so the graph
//! stays connected from the root by construction. Multiple parents are
//! allowed, which makes it a DAG in general rather than a strict tree.

mod registry;

pub use registry::SeenRegistry;

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::error::{ExplorerError, ExplorerResult};
use crate::types::NodeClass;

/// The concept graph with an explicitly tracked root
#[derive(Debug, Clone)]
pub struct ConceptGraph {
    root: String,
    /// Live nodes in insertion order
    order: Vec<String>,
    /// Index: node → children, in edge insertion order
    outgoing: HashMap<String, Vec<String>>,
    /// Index: node → parents, in edge insertion order
    incoming: HashMap<String, Vec<String>>,
    edge_count: usize,
}

impl ConceptGraph {
    /// Create a graph holding only `root`
    pub fn new(root: impl Into<String>) -> Self {
        let mut graph = Self {
            root: root.into(),
            order: Vec::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            edge_count: 0,
        };
        let root = graph.root.clone();
        graph.add_node(&root);
        graph
    }

    /// The designated root, whether or not it is still present
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Add a node. Returns `false` if it was already present.
    pub fn add_node(&mut self, name: &str) -> bool {
        if self.outgoing.contains_key(name) {
            return false;
        }
        self.order.push(name.to_string());
        self.outgoing.insert(name.to_string(), Vec::new());
        self.incoming.insert(name.to_string(), Vec::new());
        debug!(concept = name, "node added");
        true
    }

    /// Add a directed edge `from → to`, creating `to` if absent.
    ///
    /// Returns `false` when the edge already existed. The root can never be
    /// a target, so its in-degree stays zero.
    pub fn add_edge(&mut self, from: &str, to: &str) -> ExplorerResult<bool> {
        if !self.contains(from) {
            return Err(ExplorerError::NotFound(from.to_string()));
        }
        if to == self.root {
            return Err(ExplorerError::RootTarget(to.to_string()));
        }
        if from == to {
            return Err(ExplorerError::SelfLoop(to.to_string()));
        }
        if self.successors(from).iter().any(|c| c == to) {
            return Ok(false);
        }

        self.add_node(to);
        self.outgoing
            .entry(from.to_string())
            .or_default()
            .push(to.to_string());
        self.incoming
            .entry(to.to_string())
            .or_default()
            .push(from.to_string());
        self.edge_count += 1;
        debug!(from, to, "edge added");
        Ok(true)
    }

    /// Remove `node` and everything reachable from it in one step.
    ///
    /// Returns the removed concepts in insertion order.
    pub fn remove_subtree(&mut self, node: &str) -> ExplorerResult<Vec<String>> {
        if !self.contains(node) {
            return Err(ExplorerError::NotFound(node.to_string()));
        }

        let mut doomed: HashSet<String> = self.descendants_of(node).into_iter().collect();
        doomed.insert(node.to_string());

        let removed: Vec<String> = self
            .order
            .iter()
            .filter(|n| doomed.contains(n.as_str()))
            .cloned()
            .collect();

        self.order.retain(|n| !doomed.contains(n.as_str()));
        for name in &removed {
            self.outgoing.remove(name);
            self.incoming.remove(name);
        }
        for children in self.outgoing.values_mut() {
            children.retain(|c| !doomed.contains(c.as_str()));
        }
        for parents in self.incoming.values_mut() {
            parents.retain(|p| !doomed.contains(p.as_str()));
        }
        self.edge_count = self.outgoing.values().map(Vec::len).sum();

        debug!(concept = node, removed = removed.len(), "subtree removed");
        Ok(removed)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.outgoing.contains_key(name)
    }

    /// Live nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Every edge, grouped by source in node order, then by edge insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order.iter().flat_map(move |from| {
            self.successors(from)
                .iter()
                .map(move |to| (from.as_str(), to.as_str()))
        })
    }

    /// Children of `name` (empty if absent)
    pub fn successors(&self, name: &str) -> &[String] {
        self.outgoing.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parents of `name` (empty if absent)
    pub fn predecessors(&self, name: &str) -> &[String] {
        self.incoming.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn in_degree(&self, name: &str) -> usize {
        self.predecessors(name).len()
    }

    pub fn out_degree(&self, name: &str) -> usize {
        self.successors(name).len()
    }

    /// Every node reachable from `name` along outgoing edges, excluding
    /// `name` itself, in breadth-first order
    pub fn descendants_of(&self, name: &str) -> Vec<String> {
        self.reach(name, |n| self.successors(n))
    }

    /// Every node that can reach `name`, excluding `name` itself
    pub fn ancestors_of(&self, name: &str) -> Vec<String> {
        self.reach(name, |n| self.predecessors(n))
    }

    fn reach<'a, F>(&'a self, start: &str, next: F) -> Vec<String>
    where
        F: Fn(&str) -> &'a [String],
    {
        if !self.contains(start) {
            return Vec::new();
        }
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for neighbor in next(current) {
                if visited.insert(neighbor.as_str()) {
                    result.push(neighbor.clone());
                    queue.push_back(neighbor.as_str());
                }
            }
        }
        result
    }

    /// Hop distance from `source` to every node reachable from it
    pub fn distances_from(&self, source: &str) -> HashMap<String, usize> {
        let mut distances = HashMap::new();
        if !self.contains(source) {
            return distances;
        }
        let mut queue = VecDeque::new();
        distances.insert(source.to_string(), 0);
        queue.push_back(source);

        while let Some(current) = queue.pop_front() {
            let d = distances[current];
            for child in self.successors(current) {
                if !distances.contains_key(child) {
                    distances.insert(child.clone(), d + 1);
                    queue.push_back(child.as_str());
                }
            }
        }
        distances
    }

    /// Shortest path `from → … → to`, both ends included
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        let mut parent: HashMap<&str, &str> = HashMap::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![to.to_string()];
                let mut cursor = to;
                while let Some(&prev) = parent.get(cursor) {
                    path.push(prev.to_string());
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }
            for child in self.successors(current) {
                if visited.insert(child.as_str()) {
                    parent.insert(child.as_str(), current);
                    queue.push_back(child.as_str());
                }
            }
        }
        None
    }

    /// Display class of `name`; `None` if absent
    pub fn classify(&self, name: &str, focus: Option<&str>) -> Option<NodeClass> {
        if !self.contains(name) {
            return None;
        }
        let class = if focus == Some(name) {
            NodeClass::Focus
        } else if name == self.root {
            NodeClass::Root
        } else if self.out_degree(name) == 0 {
            NodeClass::Leaf
        } else {
            NodeClass::Interior
        };
        Some(class)
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConceptGraph {
        // Creativity → {Improvisation, Constraint}, Improvisation → {Jazz, Theatre}
        let mut graph = ConceptGraph::new("Creativity");
        graph.add_edge("Creativity", "Improvisation").unwrap();
        graph.add_edge("Creativity", "Constraint").unwrap();
        graph.add_edge("Improvisation", "Jazz").unwrap();
        graph.add_edge("Improvisation", "Theatre").unwrap();
        graph
    }

    #[test]
    fn new_graph_holds_root() {
        let graph = ConceptGraph::new("Creativity");
        assert_eq!(graph.root(), "Creativity");
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.contains("Creativity"));
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut graph = ConceptGraph::new("Root");
        assert!(graph.add_node("A"));
        assert!(!graph.add_node("A"));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn add_edge_creates_target_and_collapses_duplicates() {
        let mut graph = ConceptGraph::new("Root");
        assert!(graph.add_edge("Root", "A").unwrap());
        assert!(!graph.add_edge("Root", "A").unwrap());
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.successors("Root"), ["A".to_string()]);
        assert_eq!(graph.predecessors("A"), ["Root".to_string()]);
    }

    #[test]
    fn add_edge_requires_source() {
        let mut graph = ConceptGraph::new("Root");
        let err = graph.add_edge("Missing", "A").unwrap_err();
        assert!(err.is_not_found());
        assert!(!graph.contains("A"));
    }

    #[test]
    fn root_never_becomes_a_target() {
        let mut graph = sample();
        let err = graph.add_edge("Jazz", "Creativity").unwrap_err();
        assert!(matches!(err, ExplorerError::RootTarget(_)));
        assert_eq!(graph.in_degree("Creativity"), 0);
    }

    #[test]
    fn self_loop_rejected() {
        let mut graph = sample();
        assert!(matches!(
            graph.add_edge("Jazz", "Jazz"),
            Err(ExplorerError::SelfLoop(_))
        ));
    }

    #[test]
    fn exact_string_identity() {
        let mut graph = ConceptGraph::new("Root");
        graph.add_edge("Root", "Play").unwrap();
        graph.add_edge("Root", "play").unwrap();
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn nodes_in_insertion_order() {
        let graph = sample();
        let nodes: Vec<&str> = graph.nodes().collect();
        assert_eq!(
            nodes,
            ["Creativity", "Improvisation", "Constraint", "Jazz", "Theatre"]
        );
    }

    #[test]
    fn edges_listed() {
        let graph = sample();
        let edges: Vec<(&str, &str)> = graph.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[0], ("Creativity", "Improvisation"));
        assert!(edges.contains(&("Improvisation", "Theatre")));
    }

    #[test]
    fn degrees() {
        let graph = sample();
        assert_eq!(graph.in_degree("Creativity"), 0);
        assert_eq!(graph.out_degree("Creativity"), 2);
        assert_eq!(graph.in_degree("Jazz"), 1);
        assert_eq!(graph.out_degree("Jazz"), 0);
        assert_eq!(graph.out_degree("Missing"), 0);
    }

    #[test]
    fn descendants_and_ancestors() {
        let graph = sample();
        let desc = graph.descendants_of("Improvisation");
        assert_eq!(desc, ["Jazz", "Theatre"]);
        assert_eq!(graph.descendants_of("Creativity").len(), 4);

        let anc = graph.ancestors_of("Theatre");
        assert_eq!(anc, ["Improvisation", "Creativity"]);
        assert!(graph.ancestors_of("Creativity").is_empty());
        assert!(graph.ancestors_of("Missing").is_empty());
    }

    #[test]
    fn shortest_path_from_root() {
        let graph = sample();
        assert_eq!(
            graph.shortest_path("Creativity", "Jazz").unwrap(),
            ["Creativity", "Improvisation", "Jazz"]
        );
        assert_eq!(
            graph.shortest_path("Creativity", "Creativity").unwrap(),
            ["Creativity"]
        );
        assert!(graph.shortest_path("Jazz", "Creativity").is_none());
    }

    #[test]
    fn shortest_path_prefers_fewer_hops() {
        let mut graph = sample();
        graph.add_edge("Jazz", "Swing").unwrap();
        graph.add_edge("Constraint", "Swing").unwrap();
        assert_eq!(
            graph.shortest_path("Creativity", "Swing").unwrap(),
            ["Creativity", "Constraint", "Swing"]
        );
    }

    #[test]
    fn distances() {
        let graph = sample();
        let d = graph.distances_from("Creativity");
        assert_eq!(d["Creativity"], 0);
        assert_eq!(d["Constraint"], 1);
        assert_eq!(d["Theatre"], 2);
    }

    #[test]
    fn remove_subtree_removes_closure() {
        let mut graph = sample();
        let removed = graph.remove_subtree("Improvisation").unwrap();
        assert_eq!(removed, ["Improvisation", "Jazz", "Theatre"]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.successors("Creativity"), ["Constraint".to_string()]);
        assert!(!graph.contains("Jazz"));
    }

    #[test]
    fn remove_subtree_handles_shared_child() {
        let mut graph = sample();
        graph.add_edge("Constraint", "Jazz").unwrap();
        graph.remove_subtree("Improvisation").unwrap();
        // Jazz was reachable from Improvisation, so it goes even though Constraint pointed at it
        assert!(!graph.contains("Jazz"));
        assert_eq!(graph.out_degree("Constraint"), 0);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn remove_subtree_missing_is_not_found() {
        let mut graph = sample();
        assert!(graph.remove_subtree("Nope").unwrap_err().is_not_found());
        assert_eq!(graph.node_count(), 5);
    }

    #[test]
    fn classify_nodes() {
        let graph = sample();
        assert_eq!(graph.classify("Creativity", None), Some(NodeClass::Root));
        assert_eq!(graph.classify("Improvisation", None), Some(NodeClass::Interior));
        assert_eq!(graph.classify("Jazz", None), Some(NodeClass::Leaf));
        assert_eq!(graph.classify("Jazz", Some("Jazz")), Some(NodeClass::Focus));
        assert_eq!(graph.classify("Missing", None), None);
    }
}
