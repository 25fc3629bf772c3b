#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("agent.not_connected")]
    NotConnected,
    #[error("agent.empty_query")]
    EmptyQuery,
    #[error("agent.max_steps_reached: {0}")]
    MaxStepsReached(usize),
    #[error("agent.model_failed: {0}")]
    ModelFailed(String),
    #[error("agent.tools_unavailable: {0}")]
    ToolsUnavailable(String),
}
