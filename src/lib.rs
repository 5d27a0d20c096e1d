/// AI summary card for blog pages.
///
/// This crate has two halves:
/// 1. A summary proxy (`api`) that serves HTML theme templates and forwards
///    article text to an OpenAI-compatible chat-completion endpoint
/// 2. A widget controller (`widget`) that drives the in-page card through
///    skeleton, loading, populated and failed states
///
/// # Architecture
///
/// The system uses:
/// - axum + tower-http for the HTTP surface
/// - reqwest for upstream LLM calls and the widget's HTTP transport
/// - File-backed theme templates validated for a `data-summary` placeholder
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use ai_summary::api::{AppState, router};
/// use ai_summary::core::config::AppConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     ai_summary::setup_logging();
///
///     let config = AppConfig {
///         api_key: "dummy_key".to_string(),
///         ..AppConfig::default()
///     };
///     let addr = config.bind_addr.clone();
///     let state = Arc::new(AppState::from_config(config)?);
///
///     let listener = tokio::net::TcpListener::bind(addr).await?;
///     axum::serve(listener, router(state)).await?;
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod prompt;
pub mod theme;
pub mod utils;
pub mod widget;

/// Configure structured logging with JSON format.
///
/// Honors `RUST_LOG`, defaulting to `info`. Calling it more than once is
/// harmless; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// ai_summary::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
