use std::sync::Arc;

use tokio::sync::RwLock;

use super::services::McpSession;
use super::value_objects::ServerUrl;

/// Server the assistant is currently connected to.
#[derive(Clone)]
pub struct ConnectedServer {
    pub url: ServerUrl,
    pub session: Arc<dyn McpSession>,
}

/// Holds at most one connected MCP server, shared by every use case.
#[derive(Default)]
pub struct ActiveSession {
    inner: RwLock<Option<ConnectedServer>>,
}

impl ActiveSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `server` as the active one, dropping the previous session.
    pub async fn replace(&self, server: ConnectedServer) {
        *self.inner.write().await = Some(server);
    }

    pub async fn current(&self) -> Option<ConnectedServer> {
        self.inner.read().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.inner.read().await.is_some()
    }
}
