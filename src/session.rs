//! Exploration session: one root, one graph, one seen registry, one focus.
//!
//! The interactive loop drives a session one operation at a time: show
//! [`choices`](ExplorationSession::choices) and [`render`](ExplorationSession::render),
//! then either expand a choice, prune a branch, or save. Operations take
//! `&mut self`, so nothing else can touch the graph while an oracle call
//! is in flight.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::error::{ExplorerError, ExplorerResult};
use crate::expansion::{ExpansionReport, Expander};
use crate::export::{ExportPaths, Exporter};
use crate::frontier::frontier;
use crate::graph::{ConceptGraph, SeenRegistry};
use crate::oracle::Oracle;
use crate::prune::{prune, PruneReport};
use crate::render::{render, TreeLine};
use crate::types::{ExplorerEvent, OracleKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub concepts: usize,
    pub connections: usize,
}

pub struct ExplorationSession {
    id: String,
    graph: ConceptGraph,
    seen: SeenRegistry,
    max_depth: usize,
    focus: String,
    expander: Expander,
}

impl ExplorationSession {
    /// Start a session seeded with `root`
    pub fn new(root: impl Into<String>, max_depth: usize, oracle: Arc<dyn Oracle>) -> Self {
        let root = root.into();
        let graph = ConceptGraph::new(root.clone());
        let mut seen = SeenRegistry::new();
        seen.mark_seen(&root);

        let id = Uuid::new_v4().to_string();
        info!(session = %id, root = %root, max_depth, oracle = %oracle.kind(), "session started");

        Self {
            id,
            graph,
            seen,
            max_depth,
            focus: root,
            expander: Expander::new(oracle),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> &str {
        self.graph.root()
    }

    pub fn graph(&self) -> &ConceptGraph {
        &self.graph
    }

    pub fn seen(&self) -> &SeenRegistry {
        &self.seen
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Backend answering this session's expansions
    pub fn oracle_kind(&self) -> OracleKind {
        self.expander.oracle().kind()
    }

    /// Concept currently highlighted in the tree view
    pub fn focus(&self) -> &str {
        &self.focus
    }

    /// The frontier, in the order it is numbered for the user
    pub fn choices(&self) -> Vec<String> {
        frontier(&self.graph, self.graph.root(), self.max_depth)
    }

    /// No concept left to expand
    pub fn is_complete(&self) -> bool {
        self.choices().is_empty()
    }

    /// Tree view with the focus highlighted and its path drawn first
    pub fn render(&self) -> Vec<TreeLine> {
        render(&self.graph, self.graph.root(), Some(&self.focus))
    }

    /// Tree view without focus, as exported
    pub fn render_plain(&self) -> Vec<TreeLine> {
        render(&self.graph, self.graph.root(), None)
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            concepts: self.graph.node_count(),
            connections: self.graph.edge_count(),
        }
    }

    /// Expand the frontier entry at zero-based `index`
    pub async fn expand_choice(
        &mut self,
        index: usize,
        events: &mpsc::UnboundedSender<ExplorerEvent>,
    ) -> ExplorerResult<ExpansionReport> {
        let choices = self.choices();
        let concept = choices
            .get(index)
            .cloned()
            .ok_or(ExplorerError::InvalidChoice {
                choice: index + 1,
                available: choices.len(),
            })?;
        self.expand(&concept, events).await
    }

    /// Expand a frontier concept by name
    pub async fn expand(
        &mut self,
        concept: &str,
        events: &mpsc::UnboundedSender<ExplorerEvent>,
    ) -> ExplorerResult<ExpansionReport> {
        if !self.graph.contains(concept) {
            return Err(ExplorerError::NotFound(concept.to_string()));
        }
        if !self.choices().iter().any(|c| c == concept) {
            return Err(ExplorerError::NotExpandable(concept.to_string()));
        }
        let path = self
            .graph
            .shortest_path(self.graph.root(), concept)
            .ok_or_else(|| ExplorerError::NotExpandable(concept.to_string()))?;

        self.focus = concept.to_string();
        self.expander
            .expand(&mut self.graph, &mut self.seen, concept, &path, events)
            .await
    }

    /// Prune `name` and its descendants. Focus returns to the root either way.
    pub fn prune(&mut self, name: &str) -> ExplorerResult<PruneReport> {
        self.focus = self.graph.root().to_string();
        if name == self.graph.root() {
            return Err(ExplorerError::RootProtected(name.to_string()));
        }
        prune(&mut self.graph, &mut self.seen, name)
    }

    /// Write the exports; `None` when there was nothing to save
    pub async fn save(&self, exporter: &Exporter) -> ExplorerResult<Option<ExportPaths>> {
        exporter.save(&self.graph, &self.id, self.max_depth).await
    }
}
