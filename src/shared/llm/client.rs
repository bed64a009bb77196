use async_trait::async_trait;
use balungpisah_tensorzero::{InferenceRequestBuilder, InputMessage, TensorZeroClient};
use thiserror::Error;

use crate::core::config::LlmConfig;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Failed to build inference request: {0}")]
    Request(String),

    #[error("Model inference failed: {0}")]
    Inference(String),
}

/// A hosted text-generation model.
///
/// One call per invocation; implementations do not retry or cache.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for a system prompt plus one user message
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;
}

/// `LanguageModel` backed by a TensorZero gateway
pub struct TensorZeroModel {
    client: TensorZeroClient,
    api_key: String,
    model_name: String,
}

impl TensorZeroModel {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = TensorZeroClient::new(&config.tensorzero_url).map_err(|e| {
            tracing::error!("Failed to create TensorZero client: {:?}", e);
            LlmError::Request(format!("Failed to create TensorZero client: {}", e))
        })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model_name: config.model_name.clone(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[async_trait]
impl LanguageModel for TensorZeroModel {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        // Schema travels in the system prompt rather than as output_schema
        let request = InferenceRequestBuilder::new()
            .model(self.model_name.clone())
            .system(system_prompt.to_string())
            .message(InputMessage::user(user_prompt.to_string()))
            .credentials(serde_json::json!({
                "system_api_key": self.api_key
            }))
            .build()
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let response = self.client.inference(request).await.map_err(|e| {
            tracing::error!("TensorZero inference failed: {:?}", e);
            LlmError::Inference(e.to_string())
        })?;

        let text = response.text();
        tracing::debug!(
            "Raw model response (first 500 chars): {}",
            text.chars().take(500).collect::<String>()
        );

        Ok(text)
    }
}
