use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::chat::errors::ChatError;
use crate::domain::chat::model::ChatTurn;
use crate::domain::chat::repository::ChatHistoryRepository;
use crate::domain::chat::use_cases::get_history::GetHistoryUseCase;
use crate::domain::logger::Logger;

pub struct GetHistoryUseCaseImpl {
    pub repository: Arc<dyn ChatHistoryRepository>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl GetHistoryUseCase for GetHistoryUseCaseImpl {
    async fn execute(&self) -> Result<Vec<ChatTurn>, ChatError> {
        self.repository.get_all().await.map_err(|err| {
            self.logger
                .error(&format!("Failed to read chat history: {}", err));
            ChatError::HistoryUnavailable
        })
    }
}
