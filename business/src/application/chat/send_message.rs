use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::agent::errors::AgentError;
use crate::domain::agent::use_cases::run::{RunAgentParams, RunAgentUseCase};
use crate::domain::chat::errors::ChatError;
use crate::domain::chat::model::{ChatTurn, NOT_CONNECTED_REPLY, create_turn};
use crate::domain::chat::repository::ChatHistoryRepository;
use crate::domain::chat::use_cases::send_message::{SendMessageParams, SendMessageUseCase};
use crate::domain::logger::Logger;

pub struct SendMessageUseCaseImpl {
    pub agent: Arc<dyn RunAgentUseCase>,
    pub repository: Arc<dyn ChatHistoryRepository>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl SendMessageUseCase for SendMessageUseCaseImpl {
    async fn execute(&self, params: SendMessageParams) -> Result<Vec<ChatTurn>, ChatError> {
        let message = params.message.trim().to_string();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        // Agent failures become the reply; the conversation goes on.
        let reply = match self
            .agent
            .execute(RunAgentParams {
                query: message.clone(),
                max_steps: params.max_steps,
            })
            .await
        {
            Ok(answer) => answer.output,
            Err(AgentError::NotConnected) => NOT_CONNECTED_REPLY.to_string(),
            Err(err) => {
                self.logger.failure("Agent run", &err);
                format!("Error: {}", err)
            }
        };

        self.repository
            .append(&create_turn(message, reply))
            .await
            .map_err(|_| ChatError::HistoryUnavailable)?;

        self.repository
            .get_all()
            .await
            .map_err(|_| ChatError::HistoryUnavailable)
    }
}
