use super::errors::McpError;

/// Address the Azure MCP Server listens on when started with `--transport sse`.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5008/sse";

/// MCP server address as entered by the operator.
///
/// Accepts either the SSE endpoint itself (`http://host:5008/sse`) or the
/// server root (`http://host:5008`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerUrl(String);

impl ServerUrl {
    pub fn parse(raw: &str) -> Result<Self, McpError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(McpError::InvalidUrl);
        }

        let parsed = url::Url::parse(trimmed).map_err(|_| McpError::InvalidUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(McpError::InvalidUrl);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL of the event stream to subscribe to.
    pub fn sse_endpoint(&self) -> String {
        if self.0.contains("/sse") {
            self.0.clone()
        } else {
            format!("{}/sse", self.0.trim_end_matches('/'))
        }
    }
}

impl Default for ServerUrl {
    fn default() -> Self {
        Self(DEFAULT_SERVER_URL.to_string())
    }
}

impl std::fmt::Display for ServerUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ServerUrl {
    type Err = McpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
