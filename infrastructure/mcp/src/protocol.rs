//! MCP payloads exchanged over JSON-RPC.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use business::domain::mcp::model::{ServerInfo, Tool, ToolCallResult, ToolContent};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    pub capabilities: Value,
    pub client_info: Implementation,
}

impl InitializeParams {
    pub fn new(client_info: Implementation) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: json!({}),
            client_info,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    #[serde(default)]
    pub server_info: Implementation,
}

impl From<InitializeResult> for ServerInfo {
    fn from(result: InitializeResult) -> Self {
        Self {
            name: result.server_info.name,
            version: result.server_info.version,
            protocol_version: result.protocol_version,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "empty_object_schema")]
    pub input_schema: Value,
}

fn empty_object_schema() -> Value {
    json!({"type": "object", "properties": {}})
}

impl From<ToolDescriptor> for Tool {
    fn from(descriptor: ToolDescriptor) -> Self {
        Self {
            name: descriptor.name,
            description: descriptor.description,
            input_schema: descriptor.input_schema,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListToolsResult {
    pub tools: Vec<ToolDescriptor>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    #[serde(default)]
    pub content: Vec<Value>,
    #[serde(default)]
    pub is_error: bool,
}

impl From<CallToolResult> for ToolCallResult {
    fn from(result: CallToolResult) -> Self {
        Self {
            content: result.content.into_iter().map(parse_content).collect(),
            is_error: result.is_error,
        }
    }
}

fn parse_content(block: Value) -> ToolContent {
    let text_field =
        |value: &Value, key: &str| value.get(key).and_then(|v| v.as_str()).map(String::from);
    let kind = text_field(&block, "type");

    match kind.as_deref() {
        Some("text") => match text_field(&block, "text") {
            Some(text) => ToolContent::Text(text),
            None => ToolContent::Other(block),
        },
        Some("image") => ToolContent::Image {
            mime_type: text_field(&block, "mimeType").unwrap_or_default(),
        },
        Some("resource") => match block.get("resource") {
            Some(resource) => ToolContent::Resource {
                uri: text_field(resource, "uri").unwrap_or_default(),
                text: text_field(resource, "text"),
            },
            None => ToolContent::Other(block),
        },
        _ => ToolContent::Other(block),
    }
}
