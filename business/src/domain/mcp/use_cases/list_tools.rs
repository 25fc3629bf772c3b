use async_trait::async_trait;

use crate::domain::mcp::errors::McpError;
use crate::domain::mcp::model::Tool;

#[async_trait]
pub trait ListToolsUseCase: Send + Sync {
    async fn execute(&self) -> Result<Vec<Tool>, McpError>;
}
