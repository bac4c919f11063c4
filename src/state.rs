// src/state.rs
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::WidgetConfig;
use crate::error::WidgetError;
use crate::services::chat_client::HttpChatClient;
use crate::widget::{ChatWidget, Conversation};

pub type SharedState = Arc<AppState>;

/// The single widget this host serves, plus its backend.
pub struct AppState {
    pub widget: Mutex<ChatWidget<Conversation>>,
    pub backend: HttpChatClient,
    pub title: String,
}

impl AppState {
    pub fn new(config: &WidgetConfig) -> Result<Self, WidgetError> {
        let widget = ChatWidget::new(Conversation::new(), config.avatar_src.clone())?;
        Ok(Self {
            widget: Mutex::new(widget),
            backend: HttpChatClient::new(&config.backend_url),
            title: config.title.clone(),
        })
    }
}
