use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Oracle error: {0}")]
    Oracle(String),

    #[error("Oracle rate limited: {provider}, retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: u64,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Concept '{0}' not found")]
    NotFound(String),

    #[error("Concept '{0}' is the root and cannot be an edge target")]
    RootTarget(String),

    #[error("Concept '{0}' cannot be its own child")]
    SelfLoop(String),

    #[error("Concept '{0}' is not on the frontier")]
    NotExpandable(String),

    #[error("Concept '{0}' is the session root and cannot be pruned")]
    RootProtected(String),

    #[error("Invalid choice {choice}: expected 1..={available}")]
    InvalidChoice { choice: usize, available: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ExplorerError {
    /// Reference errors leave the graph untouched and are reported as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExplorerError::NotFound(_))
    }
}

pub type ExplorerResult<T> = Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        let err = ExplorerError::Oracle("connection refused".into());
        assert_eq!(err.to_string(), "Oracle error: connection refused");

        let err = ExplorerError::RateLimited {
            provider: "gemini".into(),
            retry_after_ms: 5000,
        };
        assert!(err.to_string().contains("5000ms"));

        let err = ExplorerError::NotFound("Play".into());
        assert_eq!(err.to_string(), "Concept 'Play' not found");

        let err = ExplorerError::InvalidChoice {
            choice: 7,
            available: 3,
        };
        assert!(err.to_string().contains("1..=3"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExplorerError>();
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ExplorerError = io_err.into();
        assert!(matches!(err, ExplorerError::Io(_)));
    }

    #[test]
    fn json_error_converts() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: ExplorerError = json_err.into();
        assert!(matches!(err, ExplorerError::Serialization(_)));
    }

    #[test]
    fn not_found_classification() {
        assert!(ExplorerError::NotFound("x".into()).is_not_found());
        assert!(!ExplorerError::RootProtected("x".into()).is_not_found());
    }
}
