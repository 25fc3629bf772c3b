use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser};

use business::application::agent::run::RunAgentUseCaseImpl;
use business::application::mcp::connect::ConnectServerUseCaseImpl;
use business::domain::agent::model::{AgentSettings, DEFAULT_MAX_STEPS};
use business::domain::agent::use_cases::run::{RunAgentParams, RunAgentUseCase};
use business::domain::mcp::session::ActiveSession;
use business::domain::mcp::use_cases::connect::{ConnectServerParams, ConnectServerUseCase};
use business::domain::mcp::value_objects::DEFAULT_SERVER_URL;
use logger::TracingLogger;
use mcp::connector::SseMcpConnector;
use mcp::session::SessionOptions;
use openai::chat_model::AzureChatModel;
use openai::client::AzureOpenAIClient;
use openai::config::AzureOpenAIConfig;

pub const DEFAULT_QUERY: &str = "List all Azure subscriptions";

#[derive(Debug, Parser)]
#[command(
    name = "ask",
    version,
    about = "Ask the Azure MCP assistant a single question"
)]
pub struct Cli {
    /// Question for the assistant (default: "List all Azure subscriptions")
    #[arg(num_args = 0..)]
    pub query: Vec<String>,
    /// Server-Sent Events (SSE) URL of the MCP server
    #[arg(long, env = "MCP_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,
    /// Maximum number of model round-trips
    #[arg(long, env = "AGENT_MAX_STEPS", default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: usize,
    /// Seconds to wait for each MCP response
    #[arg(long, env = "MCP_REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    pub request_timeout: u64,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn question(&self) -> String {
        let joined = self.query.join(" ");
        if joined.trim().is_empty() {
            DEFAULT_QUERY.to_string()
        } else {
            joined
        }
    }

    /// Filter used when RUST_LOG is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Connects, runs the question through the agent and returns its answer.
pub async fn run(cli: Cli) -> anyhow::Result<String> {
    let logger = Arc::new(TracingLogger::new("ask"));
    let session = Arc::new(ActiveSession::new());

    let openai_config =
        AzureOpenAIConfig::from_env().context("Azure OpenAI configuration is incomplete")?;

    let connect = ConnectServerUseCaseImpl {
        connector: Arc::new(SseMcpConnector::new(SessionOptions {
            request_timeout: Duration::from_secs(cli.request_timeout),
            ..SessionOptions::default()
        })),
        session: session.clone(),
        logger: logger.clone(),
    };

    connect
        .execute(ConnectServerParams {
            server_url: cli.server_url.clone(),
        })
        .await
        .with_context(|| format!("Error connecting to MCP server at {}", cli.server_url))?;

    let agent = RunAgentUseCaseImpl {
        session,
        model: Arc::new(AzureChatModel::new(
            AzureOpenAIClient::new(&openai_config),
            openai_config.temperature,
        )),
        settings: AgentSettings {
            max_steps: cli.max_steps,
            ..AgentSettings::default()
        },
        logger,
    };

    let answer = agent
        .execute(RunAgentParams {
            query: cli.question(),
            max_steps: None,
        })
        .await?;

    Ok(answer.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn should_have_valid_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn should_default_to_subscription_question() {
        let cli = Cli::try_parse_from(["ask"]).unwrap();

        assert_eq!(cli.question(), DEFAULT_QUERY);
        assert_eq!(cli.log_filter(), "info");
    }

    #[test]
    fn should_join_query_words() {
        let cli = Cli::try_parse_from(["ask", "Show", "my", "virtual", "machines", "-vv"]).unwrap();

        assert_eq!(cli.question(), "Show my virtual machines");
        assert_eq!(cli.log_filter(), "trace");
    }

    #[test]
    fn should_accept_explicit_server_and_step_limit() {
        let cli = Cli::try_parse_from([
            "ask",
            "--server-url",
            "http://10.0.0.4:5008/sse",
            "--max-steps",
            "5",
            "List my resource groups",
        ])
        .unwrap();

        assert_eq!(cli.server_url, "http://10.0.0.4:5008/sse");
        assert_eq!(cli.max_steps, 5);
        assert_eq!(cli.question(), "List my resource groups");
    }

    #[test]
    fn should_reject_non_numeric_step_limit() {
        assert!(Cli::try_parse_from(["ask", "--max-steps", "many"]).is_err());
    }
}
