use ai_summary::api::{AppState, router};
use ai_summary::core::config::{AppConfig, DEFAULT_THEME};
use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ai_summary::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        e
    })?;
    let bind_addr = config.bind_addr.clone();

    let state = Arc::new(AppState::from_config(config)?);

    // A missing default theme is a deployment error; refuse to start.
    state
        .themes
        .get_template(DEFAULT_THEME)
        .await
        .with_context(|| format!("themes directory {}", state.themes.dir().display()))?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!(addr = %bind_addr, "Summary proxy listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
