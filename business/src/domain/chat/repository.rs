use async_trait::async_trait;

use crate::domain::errors::RepositoryError;

use super::model::ChatTurn;

#[async_trait]
pub trait ChatHistoryRepository: Send + Sync {
    /// Turns in the order they were appended.
    async fn get_all(&self) -> Result<Vec<ChatTurn>, RepositoryError>;
    async fn append(&self, turn: &ChatTurn) -> Result<(), RepositoryError>;
    /// Removes every turn and returns how many were removed.
    async fn clear(&self) -> Result<u64, RepositoryError>;
}
