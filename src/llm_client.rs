use crate::config::Config;
use crate::errors::AppError;
use async_trait::async_trait;
use serde_json::json;

/// Capability for submitting a prompt to a language model.
///
/// The pipeline only needs "send a system instruction plus a user prompt,
/// get text back"; keeping it behind a trait lets tests substitute a fake
/// without any network access.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AppError>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Creates a new `OpenAiClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the API (overridable for tests).
    /// * `api_key` - Bearer credential.
    /// * `model` - Model identifier, e.g. `gpt-4o`.
    ///
    /// No request timeout is configured; a hanging completion call keeps
    /// the owning analysis task alive until the connection drops.
    pub fn new(base_url: String, api_key: String, model: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            AppError::ExternalApiError(format!("Failed to create OpenAI client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }

    /// Builds the client from configuration, if a credential is present.
    pub fn from_config(config: &Config) -> Option<Result<Self, AppError>> {
        config.openai_api_key.as_ref().map(|key| {
            Self::new(
                config.openai_base_url.clone(),
                key.clone(),
                config.openai_model.clone(),
            )
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    /// Sends a chat-completion request and returns the assistant text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AppError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        tracing::info!("Requesting completion from model {}", self.model);

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt }
            ]
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "OpenAI returned {}: {}",
                status, error_text
            )));
        }

        let data: serde_json::Value = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse OpenAI response: {}", e))
        })?;

        let content = data
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                tracing::warn!("Unexpected OpenAI response format: {:?}", data);
                AppError::ExternalApiError(
                    "Completion response missing message content".to_string(),
                )
            })?;

        tracing::debug!("Received completion ({} chars)", content.len());
        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OpenAiClient::new(
            "https://api.openai.com".to_string(),
            "sk-test".to_string(),
            "gpt-4o".to_string(),
        );
        assert!(client.is_ok());
    }
}
