use serde_json::Value;

/// Default number of model round-trips before the agent gives up.
pub const DEFAULT_MAX_STEPS: usize = 30;

pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful assistant for Microsoft Azure.
You can inspect the user's Azure environment through the tools provided by an MCP server.

Guidelines:
- Use the tools to look up real data instead of guessing
- Call one tool at a time when a later call depends on an earlier result
- If a tool fails, explain what went wrong and try another approach when possible
- Answer concisely and format lists so they are easy to read"#;

/// Tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// Message exchanged with the chat model during one agent run.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessage {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: Option<String>,
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage::User {
            content: content.into(),
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        ChatMessage::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }
}

/// Reply of the chat model for one step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl ModelReply {
    /// A reply without tool calls ends the run.
    pub fn is_final(&self) -> bool {
        self.tool_calls.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub max_steps: usize,
    pub system_prompt: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Final answer of an agent run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentAnswer {
    pub output: String,
    pub steps: usize,
    /// Names of the tools called, in call order.
    pub tool_invocations: Vec<String>,
}
