//! Exporters: write the explored graph to disk when the user saves or exits.
//!
//! Three files share a stem derived from the root concept:
//!
//! | File | Contents |
//! |------|----------|
//! | `<stem>_tree.txt` | Plain-text tree from the renderer |
//! | `<stem>_graph.graphml` | Directed GraphML (Gephi, Cytoscape) |
//! | `<stem>_graph.json` | JSON snapshot of nodes and edges |

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::ExplorerResult;
use crate::graph::ConceptGraph;
use crate::render;

/// File stem for a session rooted at `root`: lowercased, spaces replaced
pub fn file_stem(root: &str) -> String {
    root.to_lowercase().replace(' ', "_")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub source: String,
    pub target: String,
}

/// Machine-readable copy of the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub session_id: String,
    pub exported_at: DateTime<Utc>,
    pub root: String,
    pub max_depth: usize,
    pub nodes: Vec<String>,
    pub edges: Vec<SnapshotEdge>,
}

impl GraphSnapshot {
    pub fn capture(graph: &ConceptGraph, session_id: impl Into<String>, max_depth: usize) -> Self {
        Self {
            session_id: session_id.into(),
            exported_at: Utc::now(),
            root: graph.root().to_string(),
            max_depth,
            nodes: graph.nodes().map(str::to_string).collect(),
            edges: graph
                .edges()
                .map(|(source, target)| SnapshotEdge {
                    source: source.to_string(),
                    target: target.to_string(),
                })
                .collect(),
        }
    }
}

/// Serialize `graph` as directed GraphML
pub fn to_graphml(graph: &ConceptGraph) -> String {
    use html_escape::encode_double_quoted_attribute as attr;

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(
        "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xsi:schemaLocation=\"http://graphml.graphdrawing.org/xmlns \
         http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd\">\n",
    );
    out.push_str("  <graph edgedefault=\"directed\">\n");
    for node in graph.nodes() {
        out.push_str(&format!("    <node id=\"{}\"/>\n", attr(node)));
    }
    for (source, target) in graph.edges() {
        out.push_str(&format!(
            "    <edge source=\"{}\" target=\"{}\"/>\n",
            attr(source),
            attr(target)
        ));
    }
    out.push_str("  </graph>\n");
    out.push_str("</graphml>\n");
    out
}

/// Paths written by one save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub tree: PathBuf,
    pub graphml: PathBuf,
    pub snapshot: PathBuf,
}

/// Writes exports into one directory
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, root: &str, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{suffix}", file_stem(root)))
    }

    async fn write(path: &Path, contents: &str) -> ExplorerResult<()> {
        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(contents.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Write all three exports. An empty graph writes nothing and returns `None`.
    pub async fn save(
        &self,
        graph: &ConceptGraph,
        session_id: &str,
        max_depth: usize,
    ) -> ExplorerResult<Option<ExportPaths>> {
        if graph.is_empty() {
            info!("graph is empty, nothing to save");
            return Ok(None);
        }
        tokio::fs::create_dir_all(&self.dir).await?;

        let root = graph.root();
        let paths = ExportPaths {
            tree: self.path_for(root, "_tree.txt"),
            graphml: self.path_for(root, "_graph.graphml"),
            snapshot: self.path_for(root, "_graph.json"),
        };

        let tree = render::to_plain_text(&render::render(graph, root, None));
        Self::write(&paths.tree, &tree).await?;
        Self::write(&paths.graphml, &to_graphml(graph)).await?;

        let snapshot = GraphSnapshot::capture(graph, session_id, max_depth);
        let mut json = serde_json::to_string_pretty(&snapshot)?;
        json.push('\n');
        Self::write(&paths.snapshot, &json).await?;

        info!(
            tree = %paths.tree.display(),
            graphml = %paths.graphml.display(),
            snapshot = %paths.snapshot.display(),
            "graph exported"
        );
        Ok(Some(paths))
    }
}
