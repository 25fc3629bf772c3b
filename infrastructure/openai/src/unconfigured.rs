use std::sync::Arc;

use async_trait::async_trait;

use business::domain::agent::errors::AgentError;
use business::domain::agent::model::{ChatMessage, ModelReply};
use business::domain::agent::services::ChatModel;
use business::domain::mcp::model::Tool;

use crate::chat_model::AzureChatModel;
use crate::client::AzureOpenAIClient;
use crate::config::{AzureOpenAIConfig, ConfigError};

/// Stands in for the Azure model while its configuration is incomplete.
/// Every completion fails with the configuration error.
pub struct UnconfiguredChatModel {
    reason: String,
}

impl UnconfiguredChatModel {
    pub fn new(err: &ConfigError) -> Self {
        Self {
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for UnconfiguredChatModel {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _tools: &[Tool],
    ) -> Result<ModelReply, AgentError> {
        Err(AgentError::ModelFailed(self.reason.clone()))
    }
}

/// Azure chat model for a complete configuration, otherwise a model that
/// reports what is missing.
pub fn chat_model_from(config: Result<AzureOpenAIConfig, ConfigError>) -> Arc<dyn ChatModel> {
    match config {
        Ok(config) => Arc::new(AzureChatModel::new(
            AzureOpenAIClient::new(&config),
            config.temperature,
        )),
        Err(err) => {
            tracing::warn!("Chat model unavailable until configured: {}", err);
            Arc::new(UnconfiguredChatModel::new(&err))
        }
    }
}
