//! Shared application state for the Axum server.

use std::sync::Arc;

use moc_dialogue::{BotConfig, ChatService};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(chat: ChatService) -> Self {
        Self {
            chat: Arc::new(chat),
        }
    }

    /// Production state: knowledge table and stats sink from `config`.
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(ChatService::from_config(config))
    }
}
