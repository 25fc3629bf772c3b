pub mod chat_model;
pub mod client;
pub mod config;
pub mod unconfigured;
