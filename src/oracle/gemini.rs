use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::{ExplorerError, ExplorerResult};
use crate::types::OracleKind;

use super::traits::Oracle;

pub struct GeminiOracle {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiOracle {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";

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

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn build_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
            },
        })
    }

    /// Concatenate the text parts of the first candidate
    fn extract_text(data: &serde_json::Value) -> ExplorerResult<String> {
        let parts = data
            .get("candidates")
            .and_then(|v| v.as_array())
            .and_then(|c| c.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| ExplorerError::Oracle("Gemini reply had no candidates".into()))?;

        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect();
        Ok(text)
    }
}

#[async_trait]
impl Oracle for GeminiOracle {
    fn kind(&self) -> OracleKind {
        OracleKind::Gemini
    }

    async fn generate(&self, prompt: &str) -> ExplorerResult<String> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&self.build_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ExplorerError::RateLimited {
                    provider: "gemini".into(),
                    retry_after_ms: 5000,
                });
            }
            return Err(ExplorerError::Oracle(format!(
                "Gemini API error {status}: {body}"
            )));
        }

        let data: serde_json::Value = response.json().await?;
        Self::extract_text(&data)
    }
}
