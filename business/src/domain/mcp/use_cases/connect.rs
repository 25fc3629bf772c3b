use async_trait::async_trait;

use crate::domain::mcp::errors::McpError;
use crate::domain::mcp::model::ServerInfo;
use crate::domain::mcp::value_objects::ServerUrl;

pub struct ConnectServerParams {
    pub server_url: String,
}

/// Outcome of a successful connection.
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    pub server_url: ServerUrl,
    pub server_info: ServerInfo,
    pub tool_names: Vec<String>,
}

#[async_trait]
pub trait ConnectServerUseCase: Send + Sync {
    async fn execute(&self, params: ConnectServerParams) -> Result<ConnectionStatus, McpError>;
}
