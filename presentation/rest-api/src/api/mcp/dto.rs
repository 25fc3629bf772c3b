use poem_openapi::Object;

use business::domain::mcp::model::Tool;
use business::domain::mcp::use_cases::connect::ConnectionStatus;

#[derive(Debug, Clone, Object)]
pub struct ConnectRequest {
    /// Server-Sent Events (SSE) URL of the MCP server.
    /// Defaults to the configured server (http://localhost:5008/sse).
    #[oai(skip_serializing_if_is_none)]
    pub server_url: Option<String>,
}

#[derive(Debug, Clone, Object)]
pub struct ConnectResponse {
    /// Human readable connection status
    pub status: String,
    /// URL the assistant is connected to
    pub server_url: String,
    /// Name reported by the server
    pub server_name: String,
    /// Version reported by the server
    pub server_version: String,
    /// Names of the tools the assistant can use
    pub tools: Vec<String>,
}

impl From<ConnectionStatus> for ConnectResponse {
    fn from(status: ConnectionStatus) -> Self {
        Self {
            status: "Connected to MCP server. Available tools:".to_string(),
            server_url: status.server_url.to_string(),
            server_name: status.server_info.name,
            server_version: status.server_info.version,
            tools: status.tool_names,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ToolResponse {
    /// Tool name
    pub name: String,
    /// What the tool does
    #[oai(skip_serializing_if_is_none)]
    pub description: Option<String>,
}

impl From<Tool> for ToolResponse {
    fn from(tool: Tool) -> Self {
        Self {
            name: tool.name,
            description: tool.description,
        }
    }
}
