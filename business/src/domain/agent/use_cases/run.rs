use async_trait::async_trait;

use crate::domain::agent::errors::AgentError;
use crate::domain::agent::model::AgentAnswer;

pub struct RunAgentParams {
    pub query: String,
    /// Overrides the configured step limit for this run.
    pub max_steps: Option<usize>,
}

#[async_trait]
pub trait RunAgentUseCase: Send + Sync {
    async fn execute(&self, params: RunAgentParams) -> Result<AgentAnswer, AgentError>;
}
