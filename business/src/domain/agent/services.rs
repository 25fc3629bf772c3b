use async_trait::async_trait;

use crate::domain::mcp::model::Tool;

use super::errors::AgentError;
use super::model::{ChatMessage, ModelReply};

/// Service port for a chat model able to request tool calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[Tool],
    ) -> Result<ModelReply, AgentError>;
}
