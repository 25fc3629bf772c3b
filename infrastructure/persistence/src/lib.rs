pub mod chat_history {
    pub mod repository;
}
