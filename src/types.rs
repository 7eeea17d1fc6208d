use serde::{Deserialize, Serialize};

// ─── Node Classification ─────────────────────────────────────────────────────

/// Display classification of a concept, derived from degree and root membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    /// The designated session root
    Root,
    /// Has at least one child
    Interior,
    /// Out-degree zero
    Leaf,
    /// The node currently being viewed
    Focus,
}

impl std::fmt::Display for NodeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeClass::Root => write!(f, "root"),
            NodeClass::Interior => write!(f, "interior"),
            NodeClass::Leaf => write!(f, "leaf"),
            NodeClass::Focus => write!(f, "focus"),
        }
    }
}

// ─── Oracle ──────────────────────────────────────────────────────────────────

/// Which generative backend answers expansion requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleKind {
    Gemini,
    OpenAI,
    Custom(String),
}

impl std::fmt::Display for OracleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleKind::Gemini => write!(f, "gemini"),
            OracleKind::OpenAI => write!(f, "openai"),
            OracleKind::Custom(s) => write!(f, "{s}"),
        }
    }
}

impl std::str::FromStr for OracleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(OracleKind::Gemini),
            "openai" => Ok(OracleKind::OpenAI),
            "" => Err("oracle kind must not be empty".into()),
            other => Err(format!("unknown oracle kind: {other}")),
        }
    }
}

/// Outcome of one oracle round trip, before dedup filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OracleReply {
    /// Reply parsed; raw concept strings in reply order
    Concepts { concepts: Vec<String> },
    /// Reply arrived but was not the expected `{"concepts": [...]}` shape
    ParseFailure { reason: String },
    /// Oracle could not be reached or answered with an error
    TransportFailure { reason: String },
}

impl OracleReply {
    pub fn concepts(&self) -> &[String] {
        match self {
            OracleReply::Concepts { concepts } => concepts,
            _ => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, OracleReply::Concepts { .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            OracleReply::ParseFailure { reason } | OracleReply::TransportFailure { reason } => {
                Some(reason)
            }
            OracleReply::Concepts { .. } => None,
        }
    }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// Progress events emitted while an expansion is in flight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExplorerEvent {
    OraclePending {
        concept: String,
    },
    OracleFinished {
        concept: String,
    },
    ConceptsAccepted {
        concept: String,
        accepted: Vec<String>,
    },
    ReplyRejected {
        concept: String,
        reason: String,
    },
}
