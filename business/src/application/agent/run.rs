use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::agent::errors::AgentError;
use crate::domain::agent::model::{AgentAnswer, AgentSettings, ChatMessage, ModelReply};
use crate::domain::agent::services::ChatModel;
use crate::domain::agent::use_cases::run::{RunAgentParams, RunAgentUseCase};
use crate::domain::logger::Logger;
use crate::domain::mcp::session::ActiveSession;

/// Tool-calling loop between the chat model and the connected MCP server.
pub struct RunAgentUseCaseImpl {
    pub session: Arc<ActiveSession>,
    pub model: Arc<dyn ChatModel>,
    pub settings: AgentSettings,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl RunAgentUseCase for RunAgentUseCaseImpl {
    async fn execute(&self, params: RunAgentParams) -> Result<AgentAnswer, AgentError> {
        let query = params.query.trim();
        if query.is_empty() {
            return Err(AgentError::EmptyQuery);
        }

        let server = self
            .session
            .current()
            .await
            .ok_or(AgentError::NotConnected)?;

        let max_steps = params.max_steps.unwrap_or(self.settings.max_steps).max(1);

        let tools = server
            .session
            .list_tools()
            .await
            .map_err(|err| AgentError::ToolsUnavailable(err.to_string()))?;

        self.logger.info(&format!(
            "Running query with {} tools available (max {} steps)",
            tools.len(),
            max_steps
        ));

        let mut messages = vec![
            ChatMessage::system(self.settings.system_prompt.clone()),
            ChatMessage::user(query),
        ];
        let mut tool_invocations = Vec::new();

        for step in 1..=max_steps {
            let reply = self.model.complete(&messages, &tools).await?;

            if reply.is_final() {
                self.logger
                    .info(&format!("Agent finished after {} steps", step));
                return Ok(AgentAnswer {
                    output: reply.content.unwrap_or_default(),
                    steps: step,
                    tool_invocations,
                });
            }

            let ModelReply {
                content,
                tool_calls,
            } = reply;

            messages.push(ChatMessage::Assistant {
                content,
                tool_calls: tool_calls.clone(),
            });

            for call in tool_calls {
                self.logger.debug(&format!(
                    "Step {}: calling tool {} with {}",
                    step, call.name, call.arguments
                ));

                // Tool failures go back to the model so it can recover.
                let output = match server.session.call_tool(&call.name, call.arguments).await {
                    Ok(result) if result.is_error => format!("Error: {}", result.as_text()),
                    Ok(result) => result.as_text(),
                    Err(err) => {
                        self.logger
                            .warn(&format!("Tool {} failed: {}", call.name, err));
                        format!("Error: {}", err)
                    }
                };

                tool_invocations.push(call.name);
                messages.push(ChatMessage::tool_result(call.id, output));
            }
        }

        self.logger.warn(&format!(
            "Agent stopped after reaching the maximum of {} steps",
            max_steps
        ));

        Err(AgentError::MaxStepsReached(max_steps))
    }
}
