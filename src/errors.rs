use thiserror::Error;

/// Failures of the in-page summary card. None of these propagate into the
/// host page; the controller degrades to a visible but inert state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("Required host-page anchor is missing: {0}")]
    AnchorMissing(String),

    #[error("Failed to fetch card template: {0}")]
    TemplateFetchFailed(String),

    #[error(
        "Last-updated metadata element `{}` is missing",
        crate::widget::LAST_UPDATED_SELECTOR
    )]
    MetadataMissing,

    #[error("Summary request failed: {0}")]
    SummaryRequestFailed(String),
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Invalid theme name: {0}")]
    InvalidName(String),

    #[error("Theme not found: {0}")]
    NotFound(String),

    #[error("Template is missing the summary placeholder (an element with `data-summary`)")]
    MissingPlaceholder,

    #[error("Theme `{0}` is the default theme and cannot be deleted")]
    Protected(String),

    #[error("Default theme `{0}` is missing; deployment is misconfigured")]
    DefaultThemeMissing(String),

    #[error("Theme storage error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Article text is empty")]
    EmptyMessage,

    #[error("Upstream LLM failure: {0}")]
    Upstream(String),

    #[error("Failed to send HTTP request: {0}")]
    Http(String),
}

impl From<reqwest::Error> for SummaryError {
    fn from(error: reqwest::Error) -> Self {
        SummaryError::Http(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid setting {0}: {1}")]
    Invalid(&'static str, String),

    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
