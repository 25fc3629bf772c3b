use std::env;
use std::str::FromStr;
use std::time::Duration;

use business::domain::agent::model::DEFAULT_MAX_STEPS;
use business::domain::mcp::value_objects::DEFAULT_SERVER_URL;
use mcp::session::SessionOptions;

/// Agent and MCP client configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub default_server_url: String,
    pub max_steps: usize,
    pub session: SessionOptions,
}

impl AgentConfig {
    /// Load agent configuration from environment variables
    ///
    /// Environment variables:
    /// - MCP_SERVER_URL: Server suggested to clients (default: "http://localhost:5008/sse")
    /// - AGENT_MAX_STEPS: Model round-trips per question (default: 30)
    /// - MCP_CONNECT_TIMEOUT_SECS: Connection and handshake wait (default: 10)
    /// - MCP_REQUEST_TIMEOUT_SECS: Wait for each MCP response (default: 60)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = SessionOptions::default();

        Ok(Self {
            default_server_url: env::var("MCP_SERVER_URL")
                .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string()),
            max_steps: parse_var("AGENT_MAX_STEPS")?.unwrap_or(DEFAULT_MAX_STEPS),
            session: SessionOptions {
                connect_timeout: parse_var("MCP_CONNECT_TIMEOUT_SECS")?
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.connect_timeout),
                request_timeout: parse_var("MCP_REQUEST_TIMEOUT_SECS")?
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.request_timeout),
                ..defaults
            },
        })
    }
}

fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr + PartialEq + Default,
{
    env::var(key)
        .ok()
        .map(|raw| parse_positive(key, &raw))
        .transpose()
}

/// Unsigned values only: zero is rejected along with anything unparsable.
fn parse_positive<T>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr + PartialEq + Default,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Ok(value),
        _ => anyhow::bail!("{} must be a positive integer, got {:?}", key, raw),
    }
}
