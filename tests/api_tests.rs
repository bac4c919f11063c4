use chat_widget::config::WidgetConfig;
use chat_widget::routes::create_router;
use chat_widget::state::AppState;
use chat_widget::widget::{ERROR_MESSAGE, WELCOME_MESSAGE};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::{Json, Router, routing::post};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn state_for(backend_url: String) -> Arc<AppState> {
    let config = WidgetConfig { backend_url, ..WidgetConfig::default() };
    Arc::new(AppState::new(&config).unwrap())
}

fn send_request(message: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/send")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("message={message}")))
        .unwrap()
}

async fn texts(state: &AppState) -> Vec<String> {
    let widget = state.widget.lock().await;
    widget.surface().messages().map(|m| m.text()).collect()
}

#[tokio::test]
async fn index_renders_welcome() {
    let state = state_for("http://127.0.0.1:9".into());
    let app = create_router(Path::new("static")).with_state(state);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("virtual assistant"));
    assert!(html.contains(r#"action="/send""#));
    assert!(html.contains(r#"action="/clear""#));
}

#[tokio::test]
async fn send_renders_backend_reply() {
    let backend = Router::new().route(
        "/chat",
        post(|Json(body): Json<Value>| async move {
            assert!(body["sessionID"].as_str().is_some_and(|s| !s.is_empty()));
            Json(json!({ "response": { "answer": format!("You said: {}", body["query"].as_str().unwrap()) } }))
        }),
    );
    let state = state_for(spawn_backend(backend).await);
    let app = create_router(Path::new("static")).with_state(state.clone());

    let response = app.oneshot(send_request("hello+there")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    assert_eq!(
        texts(&state).await,
        vec![WELCOME_MESSAGE.to_string(), "hello there".into(), "You said: hello there".into()]
    );
    assert!(state.widget.lock().await.input_enabled());
}

#[tokio::test]
async fn backend_error_shows_apology() {
    let backend = Router::new().route("/chat", post(|| async { StatusCode::BAD_GATEWAY }));
    let state = state_for(spawn_backend(backend).await);
    let app = create_router(Path::new("static")).with_state(state.clone());

    app.oneshot(send_request("hello")).await.unwrap();

    let all = texts(&state).await;
    assert_eq!(all, vec![WELCOME_MESSAGE.to_string(), "hello".into(), ERROR_MESSAGE.to_string()]);
    assert!(state.widget.lock().await.input_enabled());
}

#[tokio::test]
async fn blank_message_is_ignored() {
    let state = state_for("http://127.0.0.1:9".into());
    let app = create_router(Path::new("static")).with_state(state.clone());

    let response = app.oneshot(send_request("+++")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(texts(&state).await, vec![WELCOME_MESSAGE.to_string()]);
}

#[tokio::test]
async fn clear_resets_conversation() {
    let backend = Router::new().route("/chat", post(|| async { Json(json!({ "answer": "ok" })) }));
    let state = state_for(spawn_backend(backend).await);
    let app = create_router(Path::new("static")).with_state(state.clone());

    app.clone().oneshot(send_request("hello")).await.unwrap();
    let before = state.widget.lock().await.session_id().to_string();

    let response = app
        .oneshot(Request::builder().method("POST").uri("/clear").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert_eq!(texts(&state).await, vec![WELCOME_MESSAGE.to_string()]);
    assert_ne!(state.widget.lock().await.session_id(), before);
}

#[tokio::test]
async fn health_and_avatar() {
    let state = state_for("http://127.0.0.1:9".into());
    let app = create_router(Path::new(env!("CARGO_MANIFEST_DIR")).join("static").as_path()).with_state(state);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/static/images/avatar.svg").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn dropped_send_request_still_completes() {
    let backend = Router::new().route(
        "/chat",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(json!({ "answer": "slow reply" }))
        }),
    );
    let state = state_for(spawn_backend(backend).await);
    let app = create_router(Path::new("static")).with_state(state.clone());

    // Client gives up before the backend answers.
    let abandoned = tokio::time::timeout(
        Duration::from_millis(100),
        app.clone().oneshot(send_request("hello")),
    )
    .await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_millis(1500)).await;

    {
        let widget = state.widget.lock().await;
        assert!(widget.input_enabled());
        assert!(!widget.surface().has_typing_indicator());
    }
    assert_eq!(
        texts(&state).await,
        vec![WELCOME_MESSAGE.to_string(), "hello".into(), "slow reply".into()]
    );

    let response = app.oneshot(send_request("again")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(texts(&state).await.len(), 5);
}
