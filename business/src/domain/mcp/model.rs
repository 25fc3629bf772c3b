use serde_json::Value;

/// Tool advertised by an MCP server.
#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    pub name: String,
    pub description: Option<String>,
    /// JSON schema describing the tool arguments.
    pub input_schema: Value,
}

/// One content block of a tool result.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolContent {
    Text(String),
    Image { mime_type: String },
    Resource { uri: String, text: Option<String> },
    Other(Value),
}

/// Result of a `tools/call` request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
}

impl ToolCallResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text(text.into())],
            is_error: false,
        }
    }

    /// Flattens the content blocks into the text handed back to the model.
    pub fn as_text(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ToolContent::Text(text) => text.clone(),
                ToolContent::Image { mime_type } => format!("[image: {}]", mime_type),
                ToolContent::Resource { uri, text } => match text {
                    Some(text) => text.clone(),
                    None => format!("[resource: {}]", uri),
                },
                ToolContent::Other(value) => value.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Identity reported by the server during initialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub protocol_version: String,
}
