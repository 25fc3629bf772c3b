use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::errors::McpError;
use super::model::{ServerInfo, Tool, ToolCallResult};
use super::value_objects::ServerUrl;

/// Initialized session with an MCP server.
#[async_trait]
pub trait McpSession: Send + Sync {
    fn server_info(&self) -> ServerInfo;

    async fn list_tools(&self) -> Result<Vec<Tool>, McpError>;

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolCallResult, McpError>;
}

/// Service port for opening MCP sessions.
#[async_trait]
pub trait McpConnector: Send + Sync {
    async fn connect(&self, url: &ServerUrl) -> Result<Arc<dyn McpSession>, McpError>;
}
