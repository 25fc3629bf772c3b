#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat.empty_message")]
    EmptyMessage,
    #[error("chat.history_unavailable")]
    HistoryUnavailable,
}
