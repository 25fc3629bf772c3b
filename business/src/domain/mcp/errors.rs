/// Errors raised while talking to an MCP server.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum McpError {
    #[error("mcp.invalid_url")]
    InvalidUrl,
    #[error("mcp.not_connected")]
    NotConnected,
    #[error("mcp.connection_failed: {0}")]
    ConnectionFailed(String),
    #[error("mcp.protocol: {0}")]
    Protocol(String),
    #[error("mcp.timeout")]
    Timeout,
    #[error("mcp.rpc_error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("mcp.closed")]
    Closed,
}
