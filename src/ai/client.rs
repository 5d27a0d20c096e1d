//! LLM chat-completion client
//!
//! Forwards article text to an OpenAI-compatible `/chat/completions`
//! endpoint and returns the first completion's text.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::core::config::AppConfig;
use crate::errors::SummaryError;
use crate::utils::links::extract_article_id;

/// Produces a summary for one article. The HTTP layer only sees this seam.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// `last_updated` and `article_url` are for auditing; they never reach the prompt.
    async fn generate_summary(
        &self,
        article_text: &str,
        last_updated: &str,
        article_url: &str,
    ) -> Result<String, SummaryError>;
}

/// LLM API client for generating summaries
pub struct LlmClient {
    http: Client,
    api_key: String,
    base_url: String,
    model_name: String,
    system_content: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SummaryError> {
        let http = Client::builder()
            .timeout(config.upstream_timeout())
            .build()
            .map_err(|e| SummaryError::Http(format!("Failed to build LLM HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_name: config.model.clone(),
            system_content: config.system_content.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Exactly two messages: the persona instruction, then the article verbatim.
    #[must_use]
    pub fn build_prompt(&self, article_text: &str) -> Vec<ChatCompletionMessage> {
        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(self.system_content.clone()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(article_text.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }

    async fn request_completion(&self, body: &Value) -> Result<String, SummaryError> {
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummaryError::Upstream("LLM request timed out".to_string())
                } else {
                    SummaryError::Upstream(format!("LLM request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(SummaryError::Upstream(format!(
                "LLM API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| SummaryError::Upstream(format!("Failed to parse LLM response: {e}")))?;

        extract_completion_text(&response_json)
            .ok_or_else(|| SummaryError::Upstream("No text in LLM response".to_string()))
    }
}

#[async_trait]
impl SummaryBackend for LlmClient {
    async fn generate_summary(
        &self,
        article_text: &str,
        last_updated: &str,
        article_url: &str,
    ) -> Result<String, SummaryError> {
        if article_text.trim().is_empty() {
            return Err(SummaryError::EmptyMessage);
        }

        let article_id = extract_article_id(article_url).unwrap_or_default();
        info!(
            article_id = %article_id,
            article_url = %article_url,
            last_updated = %last_updated,
            chars = article_text.chars().count(),
            "Generating summary"
        );

        let prompt = self.build_prompt(article_text);

        #[cfg(feature = "debug-logs")]
        info!("Using LLM prompt:\n{:?}", prompt);

        let body = build_chat_request_body(&self.model_name, &prompt);

        match self.request_completion(&body).await {
            Ok(summary) => {
                info!(article_id = %article_id, chars = summary.chars().count(), "Summary generated");
                Ok(summary)
            }
            Err(e) => {
                error!(article_id = %article_id, error = %e, "Summary generation failed");
                Err(e)
            }
        }
    }
}

/// Build a chat-completions payload from a chat-style prompt.
pub(crate) fn build_chat_request_body(model: &str, prompt: &[ChatCompletionMessage]) -> Value {
    let messages: Vec<Value> = prompt
        .iter()
        .filter_map(|m| {
            let role = match m.role {
                MessageRole::system => "system",
                MessageRole::user | MessageRole::function | MessageRole::tool => "user",
                MessageRole::assistant => "assistant",
            };
            match &m.content {
                Content::Text(t) => Some(json!({ "role": role, "content": t })),
                Content::ImageUrl(_) => None,
            }
        })
        .collect();

    json!({
        "model": model,
        "messages": messages
    })
}

/// `choices[0].message.content`, if present and non-blank.
pub(crate) fn extract_completion_text(response: &Value) -> Option<String> {
    response
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> LlmClient {
        let config = AppConfig {
            api_key: "test_key".to_string(),
            base_url: "https://llm.example/v1/".to_string(),
            system_content: "persona".to_string(),
            ..AppConfig::default()
        };
        LlmClient::from_config(&config).unwrap()
    }

    #[test]
    fn test_prompt_has_system_then_verbatim_user_message() {
        let text = "  第一段。\n\n  Second paragraph with <b>markup</b>  ";
        let prompt = client().build_prompt(text);

        assert_eq!(prompt.len(), 2);
        assert!(matches!(prompt[0].role, MessageRole::system));
        assert!(matches!(prompt[1].role, MessageRole::user));
        match &prompt[1].content {
            Content::Text(t) => assert_eq!(t, text),
            Content::ImageUrl(_) => panic!("expected text content"),
        }
    }

    #[test]
    fn test_request_body_carries_model_and_both_messages() {
        let c = client();
        let body = build_chat_request_body("qwen-plus", &c.build_prompt("hello"));

        assert_eq!(body["model"], "qwen-plus");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "persona");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "hello");
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        assert_eq!(client().endpoint(), "https://llm.example/v1/chat/completions");
    }

    #[test]
    fn test_extract_completion_text() {
        let ok = json!({ "choices": [{ "message": { "role": "assistant", "content": "摘要" } }] });
        assert_eq!(extract_completion_text(&ok).as_deref(), Some("摘要"));

        let empty = json!({ "choices": [{ "message": { "content": "   " } }] });
        assert_eq!(extract_completion_text(&empty), None);

        let no_choices = json!({ "choices": [] });
        assert_eq!(extract_completion_text(&no_choices), None);

        let malformed = json!({ "error": "nope" });
        assert_eq!(extract_completion_text(&malformed), None);
    }

    #[tokio::test]
    async fn test_empty_article_is_rejected_before_any_network_call() {
        let err = client().generate_summary("   ", "", "").await.unwrap_err();
        assert!(matches!(err, SummaryError::EmptyMessage));
    }
}
