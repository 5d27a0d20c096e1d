//! Public routes consumed by the widget.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::{error, info};

use super::handler::SharedState;
use super::helpers::{ApiError, ApiJson, etag_for};
use crate::core::models::{CardTemplateResponse, SummaryRequest, SummaryResponse};
use crate::errors::SummaryError;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /api/card-template` — the active theme, or the default theme.
///
/// # Errors
///
/// Returns 500 with a generic body when the default theme is missing.
pub async fn card_template(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let theme = state.config.read().await.theme.clone();
    let card = state.themes.get_template(&theme).await?;
    let etag = etag_for(&card);

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == etag);
    if not_modified {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    Ok(([(header::ETAG, etag)], Json(CardTemplateResponse { card })).into_response())
}

/// `POST /api/summary` — forwards the article to the LLM backend.
///
/// # Errors
///
/// Returns 400 for an empty message and 502 with a generic body for any
/// upstream failure. Upstream detail is logged, never returned.
#[tracing::instrument(
    level = "info",
    skip(state, request),
    fields(request_id = %uuid::Uuid::new_v4())
)]
pub async fn summary(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<SummaryRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    info!(
        article_url = %request.article_url,
        last_updated = %request.last_updated,
        "Summary requested"
    );

    let backend = state.backend().await;
    match backend
        .generate_summary(&request.message, &request.last_updated, &request.article_url)
        .await
    {
        Ok(summary) => Ok(Json(SummaryResponse { summary })),
        Err(SummaryError::EmptyMessage) => {
            Err(ApiError::BadRequest("message must not be empty".to_string()))
        }
        Err(e) => {
            error!(error = %e, "Summary generation failed");
            Err(ApiError::SummaryFailed)
        }
    }
}
