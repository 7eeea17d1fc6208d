use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::{ExplorerError, ExplorerResult};
use crate::types::OracleKind;

use super::traits::Oracle;

/// Oracle backed by any OpenAI-compatible chat completions endpoint
pub struct OpenAIOracle {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAIOracle {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: Self::DEFAULT_BASE_URL.into(),
            model: Self::DEFAULT_MODEL.into(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": {"type": "json_object"},
        })
    }

    fn extract_text(data: &serde_json::Value) -> ExplorerResult<String> {
        data.get("choices")
            .and_then(|v| v.as_array())
            .and_then(|c| c.first())
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| ExplorerError::Oracle("OpenAI reply had no message content".into()))
    }
}

#[async_trait]
impl Oracle for OpenAIOracle {
    fn kind(&self) -> OracleKind {
        OracleKind::OpenAI
    }

    async fn generate(&self, prompt: &str) -> ExplorerResult<String> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&self.build_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ExplorerError::RateLimited {
                    provider: "openai".into(),
                    retry_after_ms: 5000,
                });
            }
            return Err(ExplorerError::Oracle(format!(
                "OpenAI API error {status}: {body}"
            )));
        }

        let data: serde_json::Value = response.json().await?;
        Self::extract_text(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_kind_is_openai() {
        let oracle = OpenAIOracle::new("key");
        assert_eq!(oracle.kind(), OracleKind::OpenAI);
    }

    #[test]
    fn custom_base_url() {
        let oracle = OpenAIOracle::new("key").with_base_url("http://localhost:8081");
        assert_eq!(oracle.base_url, "http://localhost:8081");
    }

    #[test]
    fn builds_json_object_body() {
        let oracle = OpenAIOracle::new("key").with_model("gpt-4o");
        let body = oracle.build_body("hi");
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hi");
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn extracts_message_content() {
        let data = json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"concepts\": []}"}}]
        });
        assert_eq!(
            OpenAIOracle::extract_text(&data).unwrap(),
            r#"{"concepts": []}"#
        );
        assert!(OpenAIOracle::extract_text(&json!({"choices": []})).is_err());
    }
}
