//! HTTP router for the summary proxy.
//!
//! This module handles:
//! - Shared application state (config, theme store, LLM backend)
//! - Public widget routes (delegated to `summary` module)
//! - Admin routes for themes and config (delegated to `admin` module)
//! - CORS and request tracing layers

use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::{Router, middleware};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::{admin, summary};
use crate::ai::{LlmClient, SummaryBackend};
use crate::core::config::AppConfig;
use crate::errors::SummaryError;
use crate::theme::ThemeStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: RwLock<AppConfig>,
    pub themes: ThemeStore,
    backend: RwLock<Arc<dyn SummaryBackend>>,
    /// Fixed at startup; changing these requires a restart.
    admin_token: Option<String>,
    cors: CorsLayer,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn SummaryBackend>) -> Self {
        Self {
            themes: ThemeStore::new(config.themes_dir.clone()),
            admin_token: config.admin_token.clone(),
            cors: cors_layer(&config),
            backend: RwLock::new(backend),
            config: RwLock::new(config),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the LLM HTTP client cannot be built.
    pub fn from_config(config: AppConfig) -> Result<Self, SummaryError> {
        let backend = Arc::new(LlmClient::from_config(&config)?);
        Ok(Self::new(config, backend))
    }

    pub async fn backend(&self) -> Arc<dyn SummaryBackend> {
        Arc::clone(&*self.backend.read().await)
    }

    pub async fn replace_backend(&self, backend: Arc<dyn SummaryBackend>) {
        *self.backend.write().await = backend;
    }

    #[must_use]
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref()
    }
}

/// Builds the full application router.
///
/// Admin routes are mounted only when an admin token is configured.
pub fn router(state: SharedState) -> Router {
    let mut app: Router<SharedState> = Router::new()
        .route("/health", get(summary::health))
        .route("/api/card-template", get(summary::card_template))
        .route("/api/summary", post(summary::summary));

    if state.admin_token.is_some() {
        let admin_routes = Router::new()
            .route("/admin/api/themes", get(admin::list_themes))
            .route(
                "/admin/api/themes/:name",
                get(admin::get_theme)
                    .post(admin::save_theme)
                    .delete(admin::delete_theme),
            )
            .route(
                "/admin/api/config",
                get(admin::get_config).post(admin::update_config),
            )
            .route_layer(middleware::from_fn_with_state(
                Arc::clone(&state),
                admin::require_admin,
            ));
        app = app.merge(admin_routes);
    } else {
        warn!("ADMIN_TOKEN not set; admin API disabled");
    }

    app.layer(state.cors.clone())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.allows_any_origin() {
        return base.allow_origin(Any);
    }

    let list: Vec<HeaderValue> = config
        .cors_origin
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(list))
}
