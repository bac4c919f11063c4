// src/services/chat_client.rs
use std::future::Future;

use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;

use crate::error::WidgetError;
use crate::message::ChatRequest;

/// Backend the widget sends user queries to.
pub trait ChatBackend {
    /// Send `query` for `session_id` and return the reply text.
    fn send(
        &self,
        session_id: &str,
        query: &str,
    ) -> impl Future<Output = Result<String, WidgetError>> + Send;
}

/// `POST <base>/chat` over HTTP. No timeout is applied to the call.
#[derive(Clone, Debug)]
pub struct HttpChatClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpChatClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        let endpoint = format!("{}/chat", base_url.trim_end_matches('/'));
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatBackend for HttpChatClient {
    async fn send(&self, session_id: &str, query: &str) -> Result<String, WidgetError> {
        debug!(endpoint = %self.endpoint, session_id, "sending chat request");

        let response = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(&ChatRequest { session_id, query })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::Transport { status: status.as_u16() });
        }

        let body: Value = response.json().await?;
        debug!(?body, "backend response");
        extract_answer(body)
    }
}

/// Pull the reply text out of a backend response.
///
/// Accepted shapes, first match wins: `{"response":{"answer":"..."}}`,
/// `{"response":"..."}`, `{"answer":"..."}`, or a bare JSON string. The keyed
/// shapes only match non-empty strings.
pub fn extract_answer(body: Value) -> Result<String, WidgetError> {
    let keyed = [
        body.get("response").and_then(|r| r.get("answer")),
        body.get("response"),
        body.get("answer"),
    ]
    .into_iter()
    .flatten()
    .filter_map(Value::as_str)
    .find(|text| !text.is_empty())
    .map(str::to_string);

    if let Some(text) = keyed {
        return Ok(text);
    }
    match body {
        Value::String(text) => Ok(text),
        other => Err(WidgetError::UnrecognizedFormat(other)),
    }
}
