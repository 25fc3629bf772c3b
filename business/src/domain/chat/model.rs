use chrono::{DateTime, Utc};

/// Reply recorded when a message arrives before any server is connected.
pub const NOT_CONNECTED_REPLY: &str = "Please connect to an MCP server first.";

/// Prompts offered to new users.
pub const EXAMPLE_PROMPTS: [&str; 3] = [
    "List my Azure subscriptions",
    "Show my virtual machines",
    "Tell me about my resource groups",
];

/// One question and the assistant's reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub message: String,
    pub reply: String,
    pub created_at: DateTime<Utc>,
}

pub fn create_turn(message: impl Into<String>, reply: impl Into<String>) -> ChatTurn {
    ChatTurn {
        message: message.into(),
        reply: reply.into(),
        created_at: Utc::now(),
    }
}
