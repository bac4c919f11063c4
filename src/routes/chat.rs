// src/routes/chat.rs
use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use tracing::debug;

use crate::{
    error::AppError,
    message::SendForm,
    page::build_widget_html,
    services::chat_client::ChatBackend,
    state::SharedState,
};

pub async fn index_handler(State(state): State<SharedState>) -> Html<String> {
    let widget = state.widget.lock().await;
    Html(build_widget_html(&state.title, &widget))
}

pub async fn send_handler(
    State(state): State<SharedState>,
    Form(form): Form<SendForm>,
) -> Result<Redirect, AppError> {
    // The lock is released while the backend call is in flight; the disabled
    // input keeps other submissions out.
    let Some(pending) = state.widget.lock().await.begin_submit(&form.message) else {
        debug!("submission ignored");
        return Ok(Redirect::to("/"));
    };

    // Detached so the reply is applied and input re-enabled even if the
    // client goes away before the backend answers.
    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let result = task_state.backend.send(&pending.session_id, &pending.query).await;
        task_state.widget.lock().await.complete_submit(pending, result);
    });
    task.await
        .map_err(|err| AppError::Internal(format!("submission task failed: {err}")))?;

    Ok(Redirect::to("/"))
}

pub async fn clear_handler(State(state): State<SharedState>) -> Redirect {
    state.widget.lock().await.handle_clear();
    Redirect::to("/")
}
