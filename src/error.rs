// src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::render::ElementId;

/// Failure manipulating the conversation surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("element {0} is not attached to the conversation")]
    Detached(ElementId),
}

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("backend returned HTTP status {status}")]
    Transport { status: u16 },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unrecognized response format: {0}")]
    UnrecognizedFormat(serde_json::Value),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("failed to clear history: {0}")]
    ClearHistory(#[source] SurfaceError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Error returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let status = match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
