use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::chat::errors::ChatError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for ChatError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, name, message) = match &self {
            ChatError::EmptyMessage => (
                StatusCode::BAD_REQUEST,
                "ValidationError",
                "chat.empty_message",
            ),
            ChatError::HistoryUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "HistoryError",
                "chat.history_unavailable",
            ),
        };

        ErrorResponse::with_status(status, name, message)
    }
}
