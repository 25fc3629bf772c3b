use std::sync::Arc;

use async_trait::async_trait;

use business::domain::mcp::errors::McpError;
use business::domain::mcp::services::{McpConnector, McpSession};
use business::domain::mcp::value_objects::ServerUrl;

use crate::session::{SessionOptions, SseMcpSession};

/// Opens MCP sessions over the SSE transport.
pub struct SseMcpConnector {
    options: SessionOptions,
}

impl SseMcpConnector {
    pub fn new(options: SessionOptions) -> Self {
        Self { options }
    }
}

impl Default for SseMcpConnector {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

#[async_trait]
impl McpConnector for SseMcpConnector {
    async fn connect(&self, url: &ServerUrl) -> Result<Arc<dyn McpSession>, McpError> {
        let session = SseMcpSession::connect(url, self.options.clone()).await?;
        Ok(Arc::new(session))
    }
}
