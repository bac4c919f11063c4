use std::sync::Arc;

use chat_widget::{config::WidgetConfig, routes, state::AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = WidgetConfig::from_env()?;
    let state = Arc::new(AppState::new(&config)?);

    let app = routes::create_router(&config.static_dir).with_state(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    info!(addr = %config.bind_addr, backend = %config.backend_url, "chat widget running");
    axum::serve(listener, app).await?;
    Ok(())
}
