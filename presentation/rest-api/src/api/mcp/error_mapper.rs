use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::mcp::errors::McpError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for McpError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, name) = match &self {
            McpError::InvalidUrl => (StatusCode::BAD_REQUEST, "ValidationError"),
            McpError::NotConnected => (StatusCode::CONFLICT, "ConnectionError"),
            McpError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "ConnectionError"),
            McpError::ConnectionFailed(_)
            | McpError::Protocol(_)
            | McpError::Rpc { .. }
            | McpError::Closed => (StatusCode::BAD_GATEWAY, "ConnectionError"),
        };

        ErrorResponse::with_status(status, name, self.to_string())
    }
}
