// src/message.rs
use serde::{Deserialize, Serialize};

/// Body of the outbound `POST /chat` request.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    #[serde(rename = "sessionID")]
    pub session_id: &'a str,
    pub query: &'a str,
}

/// Form posted by the widget page when the user sends a message.
#[derive(Debug, Deserialize)]
pub struct SendForm {
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    User,
    Bot,
}

impl Origin {
    pub fn class(self) -> &'static str {
        match self {
            Origin::User => "user",
            Origin::Bot => "bot",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub origin: Origin,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), origin: Origin::User }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { text: text.into(), origin: Origin::Bot }
    }
}
