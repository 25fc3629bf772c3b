use async_trait::async_trait;

use crate::domain::chat::errors::ChatError;

#[async_trait]
pub trait ClearHistoryUseCase: Send + Sync {
    async fn execute(&self) -> Result<u64, ChatError>;
}
