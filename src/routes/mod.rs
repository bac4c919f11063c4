// src/routes/mod.rs
pub mod chat;

use std::path::Path;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use chat::{clear_handler, index_handler, send_handler};

pub fn create_router(static_dir: &Path) -> Router<SharedState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/send", post(send_handler))
        .route("/clear", post(clear_handler))
        .route("/health", get(|| async { "OK" }))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}
