use std::sync::Arc;

use poem_openapi::{OpenApi, payload::Json};

use business::domain::mcp::use_cases::connect::{ConnectServerParams, ConnectServerUseCase};
use business::domain::mcp::use_cases::list_tools::ListToolsUseCase;

use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::mcp::dto::{ConnectRequest, ConnectResponse, ToolResponse};
use crate::api::tags::ApiTags;

pub struct McpApi {
    connect_use_case: Arc<dyn ConnectServerUseCase>,
    list_tools_use_case: Arc<dyn ListToolsUseCase>,
    default_server_url: String,
}

impl McpApi {
    pub fn new(
        connect_use_case: Arc<dyn ConnectServerUseCase>,
        list_tools_use_case: Arc<dyn ListToolsUseCase>,
        default_server_url: String,
    ) -> Self {
        Self {
            connect_use_case,
            list_tools_use_case,
            default_server_url,
        }
    }
}

/// MCP API
///
/// Connects the assistant to an Azure MCP Server started with
/// `npx -y @azure/mcp@latest server start --transport sse`.
#[OpenApi]
impl McpApi {
    /// Connect to an MCP server
    ///
    /// Opens an SSE session, initializes it and lists the available tools.
    /// Replaces any previous connection.
    #[oai(path = "/connect", method = "post", tag = "ApiTags::Mcp")]
    async fn connect(&self, body: Json<ConnectRequest>) -> ConnectServerResponse {
        let server_url = body
            .0
            .server_url
            .unwrap_or_else(|| self.default_server_url.clone());

        match self
            .connect_use_case
            .execute(ConnectServerParams { server_url })
            .await
        {
            Ok(status) => ConnectServerResponse::Ok(Json(status.into())),
            Err(err) => {
                let (status, mut json) = err.into_error_response();
                json.0.message = format!("Error connecting to MCP server: {}", json.0.message);
                match status.as_u16() {
                    400 => ConnectServerResponse::BadRequest(json),
                    504 => ConnectServerResponse::GatewayTimeout(json),
                    _ => ConnectServerResponse::BadGateway(json),
                }
            }
        }
    }

    /// List available tools
    ///
    /// Returns the tools exposed by the connected MCP server.
    #[oai(path = "/tools", method = "get", tag = "ApiTags::Mcp")]
    async fn list_tools(&self) -> ListToolsResponse {
        match self.list_tools_use_case.execute().await {
            Ok(tools) => {
                ListToolsResponse::Ok(Json(tools.into_iter().map(|t| t.into()).collect()))
            }
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    409 => ListToolsResponse::NotConnected(json),
                    504 => ListToolsResponse::GatewayTimeout(json),
                    _ => ListToolsResponse::BadGateway(json),
                }
            }
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum ConnectServerResponse {
    #[oai(status = 200)]
    Ok(Json<ConnectResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 502)]
    BadGateway(Json<ErrorResponse>),
    #[oai(status = 504)]
    GatewayTimeout(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum ListToolsResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<ToolResponse>>),
    #[oai(status = 409)]
    NotConnected(Json<ErrorResponse>),
    #[oai(status = 502)]
    BadGateway(Json<ErrorResponse>),
    #[oai(status = 504)]
    GatewayTimeout(Json<ErrorResponse>),
}
