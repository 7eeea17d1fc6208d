//! Expansion protocol: ask the oracle about one frontier concept and graft
//! the new, unseen concepts beneath it.
//!
//! ```text
//! concept + path ──► prompt ──► Oracle::generate ──► parse_reply
//!                                                        │
//!                       graph + registry ◄── filter_new ◄┘
//! ```
//!
//! Oracle trouble never escapes as an error: transport failures and
//! malformed replies fold into [`OracleReply`] and expand to nothing.

pub mod prompt;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::{ExplorerError, ExplorerResult};
use crate::graph::{ConceptGraph, SeenRegistry};
use crate::oracle::Oracle;
use crate::render::REVISIT_MARK;
use crate::types::{ExplorerEvent, OracleReply};

/// Result of expanding one concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionReport {
    pub concept: String,
    /// Concepts added beneath `concept`, in reply order
    pub accepted: Vec<String>,
    /// Reply entries dropped as blank or already seen
    pub filtered: usize,
    pub reply: OracleReply,
}

impl ExpansionReport {
    /// Notice for the user when the reply could not be used
    pub fn failure_reason(&self) -> Option<&str> {
        self.reply.failure_reason()
    }
}

/// Parse a raw reply into the tagged shape.
///
/// A missing `concepts` key is an empty list; a non-list `concepts` or a
/// non-object document is a parse failure. Non-string entries are skipped.
pub fn parse_reply(text: &str) -> OracleReply {
    let body = strip_code_fence(text);
    let data: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            return OracleReply::ParseFailure {
                reason: format!("invalid JSON: {e}"),
            }
        }
    };

    let Some(object) = data.as_object() else {
        return OracleReply::ParseFailure {
            reason: "reply is not a JSON object".into(),
        };
    };

    match object.get("concepts") {
        None => OracleReply::Concepts {
            concepts: Vec::new(),
        },
        Some(serde_json::Value::Array(items)) => OracleReply::Concepts {
            concepts: items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
        },
        Some(other) => OracleReply::ParseFailure {
            reason: format!("`concepts` is not a list: {other}"),
        },
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening fence line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().trim_end_matches("```").trim()
}

/// Collapse whitespace and control characters to single spaces.
///
/// `None` for blank names and for names ending in the revisit mark, which
/// a plain-text tree could not tell apart from a revisited row.
pub fn normalize_concept(raw: &str) -> Option<String> {
    let spaced: String = raw
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let name = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() || name.ends_with(REVISIT_MARK) {
        return None;
    }
    Some(name)
}

/// Keep the normalized concepts not yet in `seen`.
///
/// Duplicates within one reply collapse to the first occurrence.
pub fn filter_new(concepts: &[String], seen: &SeenRegistry) -> Vec<String> {
    let mut batch: HashSet<String> = HashSet::new();
    concepts
        .iter()
        .filter_map(|c| normalize_concept(c))
        .filter(|c| !seen.is_seen(c))
        .filter(|c| batch.insert(c.to_lowercase()))
        .collect()
}

/// Drives expansions against one oracle
pub struct Expander {
    oracle: Arc<dyn Oracle>,
}

impl Expander {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &Arc<dyn Oracle> {
        &self.oracle
    }

    /// One oracle round trip, folded into an [`OracleReply`]
    pub async fn request(&self, concept: &str, path: &[String]) -> OracleReply {
        let request = prompt::build_prompt(concept, path);
        match self.oracle.generate(&request).await {
            Ok(text) => parse_reply(&text),
            Err(e) => OracleReply::TransportFailure {
                reason: e.to_string(),
            },
        }
    }

    /// Expand `concept`, whose root-to-concept path is `path`.
    ///
    /// Fails only with `NotFound` when `concept` is not in the graph; in that
    /// case nothing is mutated and the oracle is not called.
    pub async fn expand(
        &self,
        graph: &mut ConceptGraph,
        seen: &mut SeenRegistry,
        concept: &str,
        path: &[String],
        events: &mpsc::UnboundedSender<ExplorerEvent>,
    ) -> ExplorerResult<ExpansionReport> {
        if !graph.contains(concept) {
            return Err(ExplorerError::NotFound(concept.to_string()));
        }
        seen.mark_seen(concept);

        let _ = events.send(ExplorerEvent::OraclePending {
            concept: concept.to_string(),
        });
        let reply = self.request(concept, path).await;
        let _ = events.send(ExplorerEvent::OracleFinished {
            concept: concept.to_string(),
        });

        if let Some(reason) = reply.failure_reason() {
            warn!(concept, reason, "oracle reply unusable, expanding to nothing");
            let _ = events.send(ExplorerEvent::ReplyRejected {
                concept: concept.to_string(),
                reason: reason.to_string(),
            });
        }

        let root = graph.root().to_string();
        let accepted: Vec<String> = filter_new(reply.concepts(), seen)
            .into_iter()
            .filter(|c| *c != root && c != concept)
            .collect();

        // Validated above: the source exists and no target is the root or the source
        for child in &accepted {
            graph.add_edge(concept, child)?;
            seen.mark_seen(child);
        }

        let filtered = reply.concepts().len() - accepted.len();
        info!(concept, accepted = accepted.len(), filtered, "concept expanded");
        let _ = events.send(ExplorerEvent::ConceptsAccepted {
            concept: concept.to_string(),
            accepted: accepted.clone(),
        });

        Ok(ExpansionReport {
            concept: concept.to_string(),
            accepted,
            filtered,
            reply,
        })
    }
}
