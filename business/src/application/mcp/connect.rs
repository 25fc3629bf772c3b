use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::logger::Logger;
use crate::domain::mcp::errors::McpError;
use crate::domain::mcp::services::McpConnector;
use crate::domain::mcp::session::{ActiveSession, ConnectedServer};
use crate::domain::mcp::use_cases::connect::{
    ConnectServerParams, ConnectServerUseCase, ConnectionStatus,
};
use crate::domain::mcp::value_objects::ServerUrl;

pub struct ConnectServerUseCaseImpl {
    pub connector: Arc<dyn McpConnector>,
    pub session: Arc<ActiveSession>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl ConnectServerUseCase for ConnectServerUseCaseImpl {
    async fn execute(&self, params: ConnectServerParams) -> Result<ConnectionStatus, McpError> {
        let server_url = ServerUrl::parse(&params.server_url)?;

        self.logger
            .info(&format!("Connecting to MCP server at {}...", server_url));

        let session = match self.connector.connect(&server_url).await {
            Ok(session) => session,
            Err(err) => {
                self.logger.failure("MCP session setup", &err);
                return Err(err);
            }
        };

        self.logger.debug("Listing tools...");
        let tools = session.list_tools().await?;
        let tool_names: Vec<String> = tools.into_iter().map(|tool| tool.name).collect();

        self.logger.info(&format!(
            "Connected to MCP server. Available tools: {:?}",
            tool_names
        ));

        let server_info = session.server_info();
        self.session
            .replace(ConnectedServer {
                url: server_url.clone(),
                session,
            })
            .await;

        Ok(ConnectionStatus {
            server_url,
            server_info,
            tool_names,
        })
    }
}
