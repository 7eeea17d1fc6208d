//! Frontier selection: which concepts may still be expanded.

use crate::graph::ConceptGraph;

/// Leaves whose distance from `root` is strictly below `max_depth`, in graph
/// insertion order.
///
/// The order is stable between mutations; the numbered menu shown to the
/// user is built from it. An empty frontier means exploration is complete.
pub fn frontier(graph: &ConceptGraph, root: &str, max_depth: usize) -> Vec<String> {
    let distances = graph.distances_from(root);
    graph
        .nodes()
        .filter(|node| graph.out_degree(node) == 0)
        .filter(|node| distances.get(*node).is_some_and(|&d| d < max_depth))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_alone_is_the_frontier() {
        let graph = ConceptGraph::new("Creativity");
        assert_eq!(frontier(&graph, "Creativity", 3), ["Creativity"]);
    }

    #[test]
    fn zero_depth_is_always_complete() {
        let graph = ConceptGraph::new("Creativity");
        assert!(frontier(&graph, "Creativity", 0).is_empty());
    }

    #[test]
    fn depth_bound_is_exclusive() {
        let mut graph = ConceptGraph::new("R");
        graph.add_edge("R", "A").unwrap();
        graph.add_edge("A", "B").unwrap();
        graph.add_edge("R", "C").unwrap();

        assert_eq!(frontier(&graph, "R", 3), ["B", "C"]);
        assert_eq!(frontier(&graph, "R", 2), ["C"]);
        assert!(frontier(&graph, "R", 1).is_empty());
    }

    #[test]
    fn order_is_stable_without_mutation() {
        let mut graph = ConceptGraph::new("R");
        for child in ["Z", "M", "A"] {
            graph.add_edge("R", child).unwrap();
        }
        let first = frontier(&graph, "R", 5);
        let second = frontier(&graph, "R", 5);
        assert_eq!(first, ["Z", "M", "A"]);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_root_yields_empty_frontier() {
        let mut graph = ConceptGraph::new("R");
        graph.add_edge("R", "A").unwrap();
        assert!(frontier(&graph, "Elsewhere", 5).is_empty());
    }
}
