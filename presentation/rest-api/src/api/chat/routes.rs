use std::sync::Arc;

use poem_openapi::{OpenApi, payload::Json};

use business::domain::chat::model::EXAMPLE_PROMPTS;
use business::domain::chat::use_cases::clear_history::ClearHistoryUseCase;
use business::domain::chat::use_cases::get_history::GetHistoryUseCase;
use business::domain::chat::use_cases::send_message::{SendMessageParams, SendMessageUseCase};

use crate::api::chat::dto::{ChatTurnResponse, ClearChatResponse, SendMessageRequest};
use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::tags::ApiTags;

const MAX_STEPS_LIMIT: usize = 100;

pub struct ChatApi {
    send_message_use_case: Arc<dyn SendMessageUseCase>,
    get_history_use_case: Arc<dyn GetHistoryUseCase>,
    clear_history_use_case: Arc<dyn ClearHistoryUseCase>,
}

impl ChatApi {
    pub fn new(
        send_message_use_case: Arc<dyn SendMessageUseCase>,
        get_history_use_case: Arc<dyn GetHistoryUseCase>,
        clear_history_use_case: Arc<dyn ClearHistoryUseCase>,
    ) -> Self {
        Self {
            send_message_use_case,
            get_history_use_case,
            clear_history_use_case,
        }
    }
}

/// Chat API
///
/// Ask the assistant about your Azure resources.
#[OpenApi]
impl ChatApi {
    /// Ask a question
    ///
    /// Runs the agent against the connected MCP server and returns the whole
    /// conversation. Agent failures are returned as the reply text.
    #[oai(path = "/chat", method = "post", tag = "ApiTags::Chat")]
    async fn send_message(&self, body: Json<SendMessageRequest>) -> SendMessageResponse {
        let params = SendMessageParams {
            message: body.0.message,
            max_steps: body.0.max_steps.map(|n| n.clamp(1, MAX_STEPS_LIMIT)),
        };

        match self.send_message_use_case.execute(params).await {
            Ok(history) => {
                SendMessageResponse::Ok(Json(history.into_iter().map(|t| t.into()).collect()))
            }
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    400 => SendMessageResponse::BadRequest(json),
                    _ => SendMessageResponse::InternalError(json),
                }
            }
        }
    }

    /// Get the conversation
    #[oai(path = "/chat", method = "get", tag = "ApiTags::Chat")]
    async fn get_history(&self) -> GetHistoryResponse {
        match self.get_history_use_case.execute().await {
            Ok(history) => {
                GetHistoryResponse::Ok(Json(history.into_iter().map(|t| t.into()).collect()))
            }
            Err(err) => {
                let (_status, json) = err.into_error_response();
                GetHistoryResponse::InternalError(json)
            }
        }
    }

    /// Clear the conversation
    #[oai(path = "/chat", method = "delete", tag = "ApiTags::Chat")]
    async fn clear_history(&self) -> ClearHistoryResponse {
        match self.clear_history_use_case.execute().await {
            Ok(count) => ClearHistoryResponse::Ok(Json(ClearChatResponse { count })),
            Err(err) => {
                let (_status, json) = err.into_error_response();
                ClearHistoryResponse::InternalError(json)
            }
        }
    }

    /// Example prompts
    #[oai(path = "/chat/examples", method = "get", tag = "ApiTags::Chat")]
    async fn examples(&self) -> Json<Vec<String>> {
        Json(EXAMPLE_PROMPTS.iter().map(|p| p.to_string()).collect())
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum SendMessageResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<ChatTurnResponse>>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum GetHistoryResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<ChatTurnResponse>>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum ClearHistoryResponse {
    #[oai(status = 200)]
    Ok(Json<ClearChatResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}
