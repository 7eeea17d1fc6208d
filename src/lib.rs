//! # concept-explorer
//!
//! Grow a graph of ideas one concept at a time. Pick a leaf, ask an LLM
//! oracle what it connects to in the context of the path that led there,
//! and graft the answers that are genuinely new beneath it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use concept_explorer::oracle::GeminiOracle;
//! use concept_explorer::session::ExplorationSession;
//!
//! # async fn example() -> concept_explorer::error::ExplorerResult<()> {
//! let oracle = Arc::new(GeminiOracle::new("api-key"));
//! let mut session = ExplorationSession::new("Creativity", 10, oracle);
//! let (events, _rx) = tokio::sync::mpsc::unbounded_channel();
//!
//! // Expand the first frontier entry (the root, to begin with)
//! let report = session.expand_choice(0, &events).await?;
//! println!("found {} new concepts", report.accepted.len());
//!
//! for line in session.render() {
//!     println!("{}", line.plain());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`graph`] | Concept graph with explicit root, plus the case-insensitive seen registry |
//! | [`frontier`] | Leaves within the depth bound, in stable menu order |
//! | [`expansion`] | Prompt, tagged reply parsing, dedup filtering, atomic grafting |
//! | [`oracle`] | Oracle trait with Gemini and OpenAI-compatible transports |
//! | [`prune`] | Remove a concept and everything reachable from it |
//! | [`render`] | Cycle-safe tree view with focus-path ordering; plain-text round trip |
//! | [`export`] | Plain tree, GraphML and JSON snapshot files |
//! | [`session`] | One exploration: graph, registry, focus, and the operations on them |
//! | [`command`] | Parsing of the interactive prompt |
//! | [`config`] | Defaults, `.env` credentials, validation |
//! | [`error`] | Error types with thiserror |

pub mod command;
pub mod config;
pub mod error;
pub mod expansion;
pub mod export;
pub mod frontier;
pub mod graph;
pub mod oracle;
pub mod prune;
pub mod render;
pub mod session;
pub mod types;

pub use error::ExplorerError;
pub use types::*;
