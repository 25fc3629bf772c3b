use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Value, json};

use business::domain::agent::errors::AgentError;
use business::domain::agent::model::{ChatMessage, ModelReply, ToolCall};
use business::domain::agent::services::ChatModel;
use business::domain::mcp::model::Tool;

use crate::client::AzureOpenAIClient;

const MAX_FUNCTION_NAME_LEN: usize = 64;

/// Function names must match `^[a-zA-Z0-9_-]{1,64}$`.
fn sanitize_tool_name(name: &str) -> String {
    let cleaned = regex::Regex::new(r"[^a-zA-Z0-9_-]")
        .map(|re| re.replace_all(name, "_").to_string())
        .unwrap_or_else(|_| name.to_string());
    let truncated: String = cleaned.chars().take(MAX_FUNCTION_NAME_LEN).collect();
    if truncated.is_empty() {
        "tool".to_string()
    } else {
        truncated
    }
}

/// Two-way mapping between MCP tool names and the function names sent to the model.
#[derive(Debug, Default)]
struct ToolAliases {
    to_alias: HashMap<String, String>,
    to_original: HashMap<String, String>,
}

impl ToolAliases {
    fn new(tools: &[Tool]) -> Self {
        let mut aliases = Self::default();
        for tool in tools {
            let base = sanitize_tool_name(&tool.name);
            let mut alias = base.clone();
            let mut suffix = 2;
            while aliases.to_original.contains_key(&alias) {
                let tail = format!("_{}", suffix);
                let keep = MAX_FUNCTION_NAME_LEN.saturating_sub(tail.len());
                alias = format!("{}{}", base.chars().take(keep).collect::<String>(), tail);
                suffix += 1;
            }
            aliases.to_alias.insert(tool.name.clone(), alias.clone());
            aliases.to_original.insert(alias, tool.name.clone());
        }
        aliases
    }

    fn alias(&self, original: &str) -> String {
        self.to_alias
            .get(original)
            .cloned()
            .unwrap_or_else(|| sanitize_tool_name(original))
    }

    fn original(&self, alias: &str) -> String {
        self.to_original
            .get(alias)
            .cloned()
            .unwrap_or_else(|| alias.to_string())
    }
}

/// Chat model backed by an Azure OpenAI deployment with function calling.
pub struct AzureChatModel {
    client: AzureOpenAIClient,
    temperature: f32,
}

impl AzureChatModel {
    pub fn new(client: AzureOpenAIClient, temperature: f32) -> Self {
        Self {
            client,
            temperature,
        }
    }

    fn message_to_json(message: &ChatMessage, aliases: &ToolAliases) -> Value {
        match message {
            ChatMessage::System { content } => json!({"role": "system", "content": content}),
            ChatMessage::User { content } => json!({"role": "user", "content": content}),
            ChatMessage::Assistant {
                content,
                tool_calls,
            } => {
                let mut value = json!({"role": "assistant", "content": content});
                if !tool_calls.is_empty() {
                    value["tool_calls"] = tool_calls
                        .iter()
                        .map(|call| {
                            json!({
                                "id": call.id,
                                "type": "function",
                                "function": {
                                    "name": aliases.alias(&call.name),
                                    "arguments": call.arguments.to_string(),
                                }
                            })
                        })
                        .collect();
                }
                value
            }
            ChatMessage::Tool {
                tool_call_id,
                content,
            } => json!({"role": "tool", "tool_call_id": tool_call_id, "content": content}),
        }
    }

    fn build_body(
        messages: &[ChatMessage],
        tools: &[Tool],
        aliases: &ToolAliases,
        temperature: f32,
    ) -> Value {
        let mut body = json!({
            "messages": messages
                .iter()
                .map(|m| Self::message_to_json(m, aliases))
                .collect::<Vec<_>>(),
            "temperature": temperature,
        });

        // An empty tools array is rejected by the API.
        if !tools.is_empty() {
            body["tools"] = tools
                .iter()
                .map(|tool| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": aliases.alias(&tool.name),
                            "description": tool.description.clone().unwrap_or_default(),
                            "parameters": tool.input_schema,
                        }
                    })
                })
                .collect();
        }

        body
    }

    fn parse_reply(data: &Value, aliases: &ToolAliases) -> Result<ModelReply, AgentError> {
        let message = data["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .map(|choice| &choice["message"])
            .ok_or_else(|| AgentError::ModelFailed("response contained no choices".to_string()))?;

        let content = message["content"]
            .as_str()
            .filter(|text| !text.is_empty())
            .map(|text| text.to_string());

        let tool_calls = message["tool_calls"]
            .as_array()
            .map(|calls| {
                calls
                    .iter()
                    .filter_map(|call| {
                        let id = call.get("id")?.as_str()?.to_string();
                        let function = call.get("function")?;
                        let name = aliases.original(function.get("name")?.as_str()?);
                        let arguments = function
                            .get("arguments")
                            .and_then(|a| a.as_str())
                            .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
                            .filter(|value| value.is_object())
                            .unwrap_or_else(|| json!({}));

                        Some(ToolCall {
                            id,
                            name,
                            arguments,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(ModelReply {
            content,
            tool_calls,
        })
    }
}

#[async_trait]
impl ChatModel for AzureChatModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[Tool],
    ) -> Result<ModelReply, AgentError> {
        let aliases = ToolAliases::new(tools);
        let body = Self::build_body(messages, tools, &aliases, self.temperature);

        let response = self
            .client
            .client
            .post(self.client.chat_completions_url())
            .header("Content-Type", "application/json")
            .header("api-key", &self.client.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| AgentError::ModelFailed(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!("Azure OpenAI returned {}: {}", status, detail);
            return Err(AgentError::ModelFailed(format!("{} {}", status, detail)));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|err| AgentError::ModelFailed(err.to_string()))?;

        Self::parse_reply(&data, &aliases)
    }
}
