use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::core::models::{CardTemplateResponse, SummaryRequest};
use crate::errors::WidgetError;

/// The two network calls the widget makes.
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `WidgetError::TemplateFetchFailed` on any transport or decode failure.
    async fn fetch_template(&self) -> Result<String, WidgetError>;

    /// # Errors
    ///
    /// Returns `WidgetError::SummaryRequestFailed` on network errors, non-2xx
    /// statuses, or a body without a non-empty `summary` field.
    async fn request_summary(&self, request: &SummaryRequest) -> Result<String, WidgetError>;
}

/// [`SummaryApi`] over HTTP against the summary proxy. No client-side timeout
/// is applied.
#[derive(Debug, Clone)]
pub struct HttpSummaryApi {
    http: Client,
    template_url: String,
    summary_url: String,
}

impl HttpSummaryApi {
    /// `base_url` is the proxy origin, e.g. `https://summary.example`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            http: Client::new(),
            template_url: format!("{base}/api/card-template"),
            summary_url: format!("{base}/api/summary"),
        }
    }
}

#[async_trait]
impl SummaryApi for HttpSummaryApi {
    async fn fetch_template(&self) -> Result<String, WidgetError> {
        let response = self
            .http
            .get(&self.template_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| WidgetError::TemplateFetchFailed(e.to_string()))?;

        let body: CardTemplateResponse = response
            .json()
            .await
            .map_err(|e| WidgetError::TemplateFetchFailed(format!("invalid body: {e}")))?;

        Ok(body.card)
    }

    async fn request_summary(&self, request: &SummaryRequest) -> Result<String, WidgetError> {
        let response = self
            .http
            .post(&self.summary_url)
            .json(request)
            .send()
            .await
            .map_err(|e| WidgetError::SummaryRequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::SummaryRequestFailed(format!("status {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| WidgetError::SummaryRequestFailed(format!("invalid body: {e}")))?;

        body.get("summary")
            .and_then(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| WidgetError::SummaryRequestFailed("missing summary field".to_string()))
    }
}
