use std::sync::Arc;

use crate::error::{ExplorerError, ExplorerResult};
use crate::types::OracleKind;

use super::{GeminiOracle, OpenAIOracle};

/// Core oracle trait. Abstracts the generative service that proposes concepts
#[async_trait::async_trait]
pub trait Oracle: Send + Sync {
    /// Get oracle kind
    fn kind(&self) -> OracleKind;

    /// Send a free-text prompt and return the raw reply text.
    ///
    /// The reply is expected to be a JSON document, but callers must not
    /// rely on it; shape checking happens in the expansion protocol.
    async fn generate(&self, prompt: &str) -> ExplorerResult<String>;
}

/// Build the transport for `kind` with the given credentials.
pub fn build_oracle(
    kind: &OracleKind,
    api_key: impl Into<String>,
    model: impl Into<String>,
    base_url: Option<&str>,
) -> ExplorerResult<Arc<dyn Oracle>> {
    let oracle: Arc<dyn Oracle> = match kind {
        OracleKind::Gemini => {
            let mut oracle = GeminiOracle::new(api_key).with_model(model);
            if let Some(url) = base_url {
                oracle = oracle.with_base_url(url);
            }
            Arc::new(oracle)
        }
        OracleKind::OpenAI => {
            let mut oracle = OpenAIOracle::new(api_key).with_model(model);
            if let Some(url) = base_url {
                oracle = oracle.with_base_url(url);
            }
            Arc::new(oracle)
        }
        OracleKind::Custom(name) => {
            return Err(ExplorerError::Config(format!(
                "no built-in transport for oracle '{name}'"
            )))
        }
    };
    Ok(oracle)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety check
    #[test]
    fn oracle_is_object_safe() {
        fn _assert_object_safe(_: &dyn Oracle) {}
    }

    #[test]
    fn builds_known_transports() {
        let gemini = build_oracle(&OracleKind::Gemini, "key", "gemini-2.5-flash", None).unwrap();
        assert_eq!(gemini.kind(), OracleKind::Gemini);

        let openai =
            build_oracle(&OracleKind::OpenAI, "key", "gpt-4o-mini", Some("http://localhost:8081"))
                .unwrap();
        assert_eq!(openai.kind(), OracleKind::OpenAI);
    }

    #[test]
    fn custom_kind_needs_caller_transport() {
        let err = build_oracle(&OracleKind::Custom("mock".into()), "k", "m", None)
            .err()
            .unwrap();
        assert!(matches!(err, ExplorerError::Config(_)));
    }
}
