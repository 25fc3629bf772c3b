use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::chat::errors::ChatError;
use crate::domain::chat::repository::ChatHistoryRepository;
use crate::domain::chat::use_cases::clear_history::ClearHistoryUseCase;
use crate::domain::logger::Logger;

pub struct ClearHistoryUseCaseImpl {
    pub repository: Arc<dyn ChatHistoryRepository>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl ClearHistoryUseCase for ClearHistoryUseCaseImpl {
    async fn execute(&self) -> Result<u64, ChatError> {
        let count = self
            .repository
            .clear()
            .await
            .map_err(|_| ChatError::HistoryUnavailable)?;

        self.logger
            .info(&format!("Cleared {} chat turns", count));

        Ok(count)
    }
}
