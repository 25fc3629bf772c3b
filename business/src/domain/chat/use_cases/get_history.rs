use async_trait::async_trait;

use crate::domain::chat::errors::ChatError;
use crate::domain::chat::model::ChatTurn;

#[async_trait]
pub trait GetHistoryUseCase: Send + Sync {
    async fn execute(&self) -> Result<Vec<ChatTurn>, ChatError>;
}
