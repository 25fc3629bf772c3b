use chrono::{DateTime, Utc};
use poem_openapi::Object;

use business::domain::chat::model::ChatTurn;

#[derive(Debug, Clone, Object)]
pub struct SendMessageRequest {
    /// Your question (e.g., "List my resource groups")
    pub message: String,
    /// Overrides the agent step limit for this question (1-100)
    #[oai(skip_serializing_if_is_none)]
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, Object)]
pub struct ChatTurnResponse {
    /// Question asked
    pub message: String,
    /// Assistant reply
    pub reply: String,
    /// When the question was answered
    pub created_at: DateTime<Utc>,
}

impl From<ChatTurn> for ChatTurnResponse {
    fn from(turn: ChatTurn) -> Self {
        Self {
            message: turn.message,
            reply: turn.reply,
            created_at: turn.created_at,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ClearChatResponse {
    /// Number of turns removed
    pub count: u64,
}
