//! Pruning: remove a concept and everything reachable from it, keeping the
//! seen registry in step with the graph.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ExplorerResult;
use crate::graph::{ConceptGraph, SeenRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneReport {
    pub concept: String,
    /// `{concept} ∪ descendants`, in graph insertion order
    pub removed: Vec<String>,
}

/// Remove `concept` and its descendants from `graph` and forget them in `seen`.
///
/// Returns `NotFound` without touching either structure when `concept` is absent.
pub fn prune(
    graph: &mut ConceptGraph,
    seen: &mut SeenRegistry,
    concept: &str,
) -> ExplorerResult<PruneReport> {
    let removed = graph.remove_subtree(concept)?;
    seen.unmark(&removed);
    info!(concept, removed = removed.len(), "branch pruned");
    Ok(PruneReport {
        concept: concept.to_string(),
        removed,
    })
}
