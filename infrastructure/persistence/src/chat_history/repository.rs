use async_trait::async_trait;
use tokio::sync::RwLock;

use business::domain::chat::model::ChatTurn;
use business::domain::chat::repository::ChatHistoryRepository;
use business::domain::errors::RepositoryError;

/// Process-local chat history. Lost on restart.
#[derive(Default)]
pub struct ChatHistoryRepositoryInMemory {
    turns: RwLock<Vec<ChatTurn>>,
}

impl ChatHistoryRepositoryInMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatHistoryRepository for ChatHistoryRepositoryInMemory {
    async fn get_all(&self) -> Result<Vec<ChatTurn>, RepositoryError> {
        Ok(self.turns.read().await.clone())
    }

    async fn append(&self, turn: &ChatTurn) -> Result<(), RepositoryError> {
        let mut turns = self.turns.write().await;
        turns.push(turn.clone());
        tracing::debug!("Chat history now holds {} turns", turns.len());
        Ok(())
    }

    async fn clear(&self) -> Result<u64, RepositoryError> {
        let mut turns = self.turns.write().await;
        let count = turns.len() as u64;
        turns.clear();
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use business::domain::chat::model::create_turn;

    #[tokio::test]
    async fn should_return_turns_in_append_order() {
        let repo = ChatHistoryRepositoryInMemory::new();
        repo.append(&create_turn("first", "one")).await.unwrap();
        repo.append(&create_turn("second", "two")).await.unwrap();

        let turns = repo.get_all().await.unwrap();

        let messages: Vec<_> = turns.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn should_clear_and_report_count() {
        let repo = ChatHistoryRepositoryInMemory::new();
        repo.append(&create_turn("first", "one")).await.unwrap();
        repo.append(&create_turn("second", "two")).await.unwrap();

        assert_eq!(repo.clear().await.unwrap(), 2);
        assert!(repo.get_all().await.unwrap().is_empty());
        assert_eq!(repo.clear().await.unwrap(), 0);
    }
}
