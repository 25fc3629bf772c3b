use async_trait::async_trait;

use crate::domain::chat::errors::ChatError;
use crate::domain::chat::model::ChatTurn;

pub struct SendMessageParams {
    pub message: String,
    pub max_steps: Option<usize>,
}

#[async_trait]
pub trait SendMessageUseCase: Send + Sync {
    /// Answers the message and returns the whole conversation.
    async fn execute(&self, params: SendMessageParams) -> Result<Vec<ChatTurn>, ChatError>;
}
