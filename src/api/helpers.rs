//! Error mapping and response helpers shared by the handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::{Json, async_trait};
use serde::de::DeserializeOwned;
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::error;

use crate::core::models::ErrorBody;
use crate::errors::{ConfigError, ThemeError};

/// Client-facing message for every upstream LLM failure.
pub const SUMMARY_FAILED_MESSAGE: &str = "summary generation failed";

pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Errors as the HTTP client sees them. Messages are safe to return verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("summary generation failed")]
    SummaryFailed,

    #[error("internal server error")]
    Internal,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::SummaryFailed => StatusCode::BAD_GATEWAY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<ThemeError> for ApiError {
    fn from(error: ThemeError) -> Self {
        match error {
            ThemeError::InvalidName(_) => ApiError::BadRequest(error.to_string()),
            ThemeError::NotFound(_) => ApiError::NotFound(error.to_string()),
            ThemeError::Protected(_) => ApiError::Conflict(error.to_string()),
            ThemeError::MissingPlaceholder => ApiError::Unprocessable(error.to_string()),
            ThemeError::DefaultThemeMissing(_) | ThemeError::Io(_) => {
                error!(error = %error, "Theme storage failure");
                ApiError::Internal
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Missing(_) | ConfigError::Invalid(..) => {
                ApiError::BadRequest(error.to_string())
            }
            ConfigError::Io(_) | ConfigError::Parse(_) => {
                error!(error = %error, "Config persistence failure");
                ApiError::Internal
            }
        }
    }
}

/// `Json` extractor whose rejections use the crate's `{ "error": ... }` body
/// instead of axum's plain-text default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::from(rejection)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::Unprocessable(rejection.body_text()),
            _ => ApiError::BadRequest(rejection.body_text()),
        }
    }
}

/// Strong `ETag` for a card template: quoted SHA-256 hex of its bytes.
#[must_use]
pub fn etag_for(content: &str) -> String {
    format!("\"{}\"", hex::encode(Sha256::digest(content.as_bytes())))
}
