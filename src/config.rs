use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, ExplorerResult};
use crate::oracle::{GeminiOracle, OpenAIOracle};
use crate::types::OracleKind;

pub const DEFAULT_ROOT_CONCEPT: &str = "Creativity";
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Overrides the oracle endpoint (proxies, local servers)
pub const BASE_URL_VAR: &str = "CONCEPT_EXPLORER_BASE_URL";

/// Session and oracle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub root_concept: String,
    pub max_depth: usize,
    pub provider: OracleKind,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub base_url: Option<String>,
    pub output_dir: PathBuf,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            root_concept: DEFAULT_ROOT_CONCEPT.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            provider: OracleKind::Gemini,
            model: GeminiOracle::DEFAULT_MODEL.into(),
            api_key: String::new(),
            base_url: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExplorerConfig {
    /// Environment variable holding the credential for `kind`
    pub fn api_key_var(kind: &OracleKind) -> Option<&'static str> {
        match kind {
            OracleKind::Gemini => Some("GOOGLE_API_KEY"),
            OracleKind::OpenAI => Some("OPENAI_API_KEY"),
            OracleKind::Custom(_) => None,
        }
    }

    pub fn default_model(kind: &OracleKind) -> &'static str {
        match kind {
            OracleKind::OpenAI => OpenAIOracle::DEFAULT_MODEL,
            _ => GeminiOracle::DEFAULT_MODEL,
        }
    }

    /// Load `.env`, then read credentials from the process environment
    pub fn from_env(provider: OracleKind) -> ExplorerResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(provider, |name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(provider: OracleKind, lookup: F) -> ExplorerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = Self::api_key_var(&provider).ok_or_else(|| {
            ExplorerError::Config(format!("no credential variable known for oracle '{provider}'"))
        })?;
        let api_key = lookup(var)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ExplorerError::Config(format!(
                    "{var} not found in environment or .env file"
                ))
            })?;

        Ok(Self {
            model: Self::default_model(&provider).into(),
            provider,
            api_key,
            base_url: lookup(BASE_URL_VAR).filter(|u| !u.trim().is_empty()),
            ..Self::default()
        })
    }

    pub fn validate(&self) -> ExplorerResult<()> {
        if self.root_concept.trim().is_empty() {
            return Err(ExplorerError::Config("root concept must not be empty".into()));
        }
        if self.max_depth == 0 {
            return Err(ExplorerError::Config("max depth must be at least 1".into()));
        }
        if self.model.trim().is_empty() {
            return Err(ExplorerError::Config("model must not be empty".into()));
        }
        Ok(())
    }
}
