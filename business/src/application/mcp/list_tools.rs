use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::logger::Logger;
use crate::domain::mcp::errors::McpError;
use crate::domain::mcp::model::Tool;
use crate::domain::mcp::session::ActiveSession;
use crate::domain::mcp::use_cases::list_tools::ListToolsUseCase;

pub struct ListToolsUseCaseImpl {
    pub session: Arc<ActiveSession>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl ListToolsUseCase for ListToolsUseCaseImpl {
    async fn execute(&self) -> Result<Vec<Tool>, McpError> {
        let server = self.session.current().await.ok_or(McpError::NotConnected)?;

        let tools = server.session.list_tools().await?;
        self.logger.debug(&format!(
            "Server {} exposes {} tools",
            server.url,
            tools.len()
        ));

        Ok(tools)
    }
}
