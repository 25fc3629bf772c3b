use std::sync::Arc;

use logger::TracingLogger;
use mcp::connector::SseMcpConnector;
use openai::config::AzureOpenAIConfig;
use openai::unconfigured::chat_model_from;
use persistence::chat_history::repository::ChatHistoryRepositoryInMemory;

use business::application::agent::run::RunAgentUseCaseImpl;
use business::application::chat::clear_history::ClearHistoryUseCaseImpl;
use business::application::chat::get_history::GetHistoryUseCaseImpl;
use business::application::chat::send_message::SendMessageUseCaseImpl;
use business::application::mcp::connect::ConnectServerUseCaseImpl;
use business::application::mcp::list_tools::ListToolsUseCaseImpl;
use business::domain::agent::model::AgentSettings;
use business::domain::mcp::session::ActiveSession;

use crate::config::app_config::AppConfig;

pub struct DependencyContainer {
    pub health_api: crate::api::health::routes::Api,
    pub mcp_api: crate::api::mcp::routes::McpApi,
    pub chat_api: crate::api::chat::routes::ChatApi,
}

impl DependencyContainer {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let logger = Arc::new(TracingLogger::new("rest-api"));
        let health_api = crate::api::health::routes::Api::new();

        // Infrastructure adapters
        // Missing Azure settings only disable chat; the rest of the API stays up.
        let chat_model = chat_model_from(AzureOpenAIConfig::from_env());
        let connector = Arc::new(SseMcpConnector::new(config.agent.session.clone()));
        let history_repository = Arc::new(ChatHistoryRepositoryInMemory::new());
        let active_session = Arc::new(ActiveSession::new());

        // MCP use cases
        let connect_use_case = Arc::new(ConnectServerUseCaseImpl {
            connector,
            session: active_session.clone(),
            logger: logger.clone(),
        });
        let list_tools_use_case = Arc::new(ListToolsUseCaseImpl {
            session: active_session.clone(),
            logger: logger.clone(),
        });

        // Agent use case
        let run_agent_use_case = Arc::new(RunAgentUseCaseImpl {
            session: active_session,
            model: chat_model,
            settings: AgentSettings {
                max_steps: config.agent.max_steps,
                ..AgentSettings::default()
            },
            logger: logger.clone(),
        });

        // Chat use cases
        let send_message_use_case = Arc::new(SendMessageUseCaseImpl {
            agent: run_agent_use_case,
            repository: history_repository.clone(),
            logger: logger.clone(),
        });
        let get_history_use_case = Arc::new(GetHistoryUseCaseImpl {
            repository: history_repository.clone(),
            logger: logger.clone(),
        });
        let clear_history_use_case = Arc::new(ClearHistoryUseCaseImpl {
            repository: history_repository,
            logger,
        });

        let mcp_api = crate::api::mcp::routes::McpApi::new(
            connect_use_case,
            list_tools_use_case,
            config.agent.default_server_url.clone(),
        );

        let chat_api = crate::api::chat::routes::ChatApi::new(
            send_message_use_case,
            get_history_use_case,
            clear_history_use_case,
        );

        Ok(Self {
            health_api,
            mcp_api,
            chat_api,
        })
    }
}
