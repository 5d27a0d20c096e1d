//! Admin API: theme management and runtime configuration.
//!
//! Every route here sits behind [`require_admin`].

use axum::Json;
use axum::extract::{Path, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use super::handler::SharedState;
use super::helpers::{ApiError, ApiJson};
use crate::ai::LlmClient;
use crate::prompt::sanitize_system_content;
use crate::theme::validate_theme_name;

/// Rejects requests without `Authorization: Bearer <admin token>`.
///
/// # Errors
///
/// Returns 401 when the header is missing or the token does not match.
pub async fn require_admin(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let authorized = matches!(
        (state.admin_token(), presented),
        (Some(expected), Some(given)) if expected == given
    );

    if !authorized {
        warn!(path = %request.uri().path(), "Rejected admin request");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

// ============================================================================
// Themes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ThemeContent {
    pub content: String,
}

/// # Errors
///
/// Returns 500 if the themes directory cannot be read.
pub async fn list_themes(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let themes = state.themes.list().await?;
    let current = state.config.read().await.theme.clone();
    Ok(Json(json!({ "themes": themes, "current": current })))
}

/// # Errors
///
/// Returns 400 for an invalid name and 404 when the theme does not exist.
pub async fn get_theme(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let content = state.themes.load(&name).await?;
    Ok(Json(json!({ "name": name, "content": content })))
}

/// # Errors
///
/// Returns 422 when the template lacks the summary placeholder; nothing is
/// written in that case.
pub async fn save_theme(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    ApiJson(body): ApiJson<ThemeContent>,
) -> Result<Json<Value>, ApiError> {
    state.themes.save(&name, &body.content).await?;
    Ok(Json(json!({ "status": "success" })))
}

/// # Errors
///
/// Returns 404 for unknown themes and 409 for the default theme.
pub async fn delete_theme(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.themes.delete(&name).await?;
    Ok(Json(json!({ "status": "success" })))
}

// ============================================================================
// Config
// ============================================================================

/// Config as shown to operators; the API key is masked.
#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub system_content: String,
    pub theme: String,
    pub cors_origin: Vec<String>,
    pub upstream_timeout_secs: u64,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigUpdate {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub system_content: Option<String>,
    pub theme: Option<String>,
}

pub async fn get_config(State(state): State<SharedState>) -> Json<ConfigView> {
    let config = state.config.read().await;
    Json(ConfigView {
        api_key: config.masked_api_key(),
        base_url: config.base_url.clone(),
        model: config.model.clone(),
        system_content: config.system_content.clone(),
        theme: config.theme.clone(),
        cors_origin: config.cors_origin.clone(),
        upstream_timeout_secs: config.upstream_timeout_secs,
    })
}

/// Validates, persists and applies a config update. Later summary requests
/// use the new LLM settings.
///
/// # Errors
///
/// Returns 400 for invalid values and 500 if the config file cannot be written.
pub async fn update_config(
    State(state): State<SharedState>,
    ApiJson(update): ApiJson<ConfigUpdate>,
) -> Result<Json<Value>, ApiError> {
    let mut config = state.config.write().await;
    let mut next = config.clone();
    // Only fields named in the request are written back to the config file.
    let mut changes = Map::new();

    if let Some(api_key) = update.api_key.filter(|k| !k.trim().is_empty()) {
        next.api_key = api_key.trim().to_string();
        changes.insert("api_key".to_string(), json!(next.api_key));
    }
    if let Some(base_url) = update.base_url {
        Url::parse(&base_url).map_err(|e| ApiError::BadRequest(format!("Invalid base_url: {e}")))?;
        changes.insert("base_url".to_string(), json!(base_url));
        next.base_url = base_url;
    }
    if let Some(model) = update.model {
        if model.trim().is_empty() {
            return Err(ApiError::BadRequest("model must not be empty".to_string()));
        }
        next.model = model.trim().to_string();
        changes.insert("model".to_string(), json!(next.model));
    }
    if let Some(system_content) = update.system_content {
        next.system_content = sanitize_system_content(&system_content).map_err(ApiError::BadRequest)?;
        changes.insert("system_content".to_string(), json!(next.system_content));
    }
    if let Some(theme) = update.theme {
        validate_theme_name(&theme)?;
        changes.insert("theme".to_string(), json!(theme));
        next.theme = theme;
    }

    next.validate()?;
    let backend = LlmClient::from_config(&next).map_err(|e| {
        warn!(error = %e, "Failed to rebuild LLM client");
        ApiError::Internal
    })?;
    if !changes.is_empty() {
        next.persist(&changes).await?;
    }

    state.replace_backend(Arc::new(backend)).await;
    *config = next;
    info!(
        theme = %config.theme,
        model = %config.model,
        fields = ?changes.keys().collect::<Vec<_>>(),
        "Config updated"
    );

    Ok(Json(json!({ "status": "success" })))
}
