use async_trait::async_trait;
use reqwest::Client;

#[cfg(test)]
use mockall::automock;

use crate::config::GeminiConfig;
use crate::error::{Result, WellnessError};
use crate::models::{GenerateContentRequest, GenerateContentResponse};

/// One call is one attempt. Retrying is the caller's business.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate(&self, req: &GenerateContentRequest) -> Result<GenerateContentResponse>;
}

pub struct GeminiTransport {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiTransport {
    pub fn new(cfg: &GeminiConfig) -> Result<Self> {
        if cfg.api_key.is_empty() {
            return Err(WellnessError::Config(
                "GEMINI_API_KEY must be set".to_string(),
            ));
        }
        Ok(Self {
            client: Client::new(),
            endpoint: cfg.endpoint(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn generate(&self, req: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(req)
            .send()
            .await
            .map_err(|e| WellnessError::Transport(format!("Failed to send request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(
                "Gemini API returned {}: {}",
                status,
                response.text().await.unwrap_or_default()
            );
            return Err(WellnessError::Transport(format!(
                "API request failed: {}",
                status.as_u16()
            )));
        }

        response.json().await.map_err(|e| {
            WellnessError::Transport(format!("Failed to parse Gemini API response: {e}"))
        })
    }
}
