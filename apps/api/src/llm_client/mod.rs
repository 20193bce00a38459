//! LLM Client — the single point of entry for all chat-completion calls.
//!
//! No other module may call the LLM HTTP API directly. Handlers and the
//! analyzer depend on the `CompletionClient` trait so tests can swap in doubles.
//!
//! Remote calls are made exactly once: a failed call surfaces as one `LlmError`
//! and the caller decides how to render it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// Prompts longer than this many characters are cut before sending.
pub const MAX_PROMPT_CHARS: usize = 4000;
pub const TRUNCATION_MARKER: &str = "\n\n[TRUNCATED]";
/// Length of the raw-body fallback when the response has no recognisable text.
const RAW_RESPONSE_CHARS: usize = 2000;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OPENROUTER_API_KEY not configured")]
    MissingCredentials,

    #[error("Network error contacting LLM service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM service returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed LLM response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that can turn a prompt into generated text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Client for an OpenAI-style `chat/completions` endpoint (OpenRouter by default).
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingCredentials);
        }
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_url,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let prompt = truncate_prompt(prompt);
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() != 200 {
            // Keep the JSON error body when there is one, otherwise the raw text.
            let message = serde_json::from_str::<Value>(&body)
                .map(|v| v.to_string())
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: Value = serde_json::from_str(&body)?;
        debug!(
            "LLM call succeeded: model={}, usage={}",
            self.model,
            data.get("usage").cloned().unwrap_or_default()
        );

        Ok(response_text(&data))
    }
}

/// Cuts prompts to `MAX_PROMPT_CHARS` characters and marks the cut.
pub fn truncate_prompt(prompt: &str) -> String {
    if prompt.chars().count() <= MAX_PROMPT_CHARS {
        return prompt.to_string();
    }
    let mut cut: String = prompt.chars().take(MAX_PROMPT_CHARS).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

/// Pulls generated text out of a chat-completions body.
///
/// Tries `choices[0].message.content`, then the legacy `choices[0].text`, and
/// otherwise returns the body itself cut to 2000 characters.
fn response_text(data: &Value) -> String {
    data.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .or_else(|| data.pointer("/choices/0/text").and_then(Value::as_str))
        .map(|text| text.trim().to_string())
        .unwrap_or_else(|| data.to_string().chars().take(RAW_RESPONSE_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::{
        http::{header, HeaderMap, StatusCode},
        response::IntoResponse,
        routing::post,
        Json, Router,
    };
    use serde_json::json;

    use crate::test_support;

    /// A request as seen by the stub endpoint: Authorization header and JSON body.
    type Captured = Arc<Mutex<Option<(String, Value)>>>;

    /// Chat endpoint stub answering every call with `status` and `body`.
    async fn llm_stub(status: StatusCode, body: &'static str, captured: Captured) -> LlmClient {
        let app = Router::new().route(
            "/chat/completions",
            post(move |headers: HeaderMap, Json(request): Json<Value>| {
                let captured = captured.clone();
                async move {
                    let auth = headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    *captured.lock().unwrap() = Some((auth, request));
                    (status, body).into_response()
                }
            }),
        );
        let base = test_support::serve(app).await;
        LlmClient::new(
            "sk-test".to_string(),
            format!("{base}/chat/completions"),
            "test-model".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_short_prompt_is_untouched() {
        assert_eq!(truncate_prompt("hello"), "hello");
    }

    #[test]
    fn test_long_prompt_is_truncated_with_marker() {
        let prompt = "x".repeat(MAX_PROMPT_CHARS + 10);
        let cut = truncate_prompt(&prompt);
        assert!(cut.ends_with("[TRUNCATED]"));
        assert_eq!(
            cut.chars().count(),
            MAX_PROMPT_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let prompt = "é".repeat(MAX_PROMPT_CHARS);
        assert_eq!(truncate_prompt(&prompt), prompt);
    }

    #[test]
    fn test_response_text_from_message_content() {
        let data = json!({"choices": [{"message": {"role": "assistant", "content": "  hi there \n"}}]});
        assert_eq!(response_text(&data), "hi there");
    }

    #[test]
    fn test_response_text_falls_back_to_text_field() {
        let data = json!({"choices": [{"message": {"content": null}, "text": " legacy "}]});
        assert_eq!(response_text(&data), "legacy");
    }

    #[test]
    fn test_response_text_falls_back_to_truncated_raw_body() {
        let data = json!({"unexpected": "x".repeat(5000)});
        let text = response_text(&data);
        assert_eq!(text.chars().count(), RAW_RESPONSE_CHARS);
        assert!(text.starts_with("{\"unexpected\""));
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = LlmClient::new(
            "  ".to_string(),
            "http://localhost".to_string(),
            "m".to_string(),
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(LlmError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_complete_sends_chat_request() {
        let captured: Captured = Arc::default();
        let client = llm_stub(
            StatusCode::OK,
            r#"{"choices": [{"message": {"content": " Senior engineer. "}}]}"#,
            captured.clone(),
        )
        .await;

        let long_prompt = "p".repeat(MAX_PROMPT_CHARS + 500);
        let text = client.complete(&long_prompt, 500).await.unwrap();
        assert_eq!(text, "Senior engineer.");

        let (auth, request) = captured.lock().unwrap().take().unwrap();
        assert_eq!(auth, "Bearer sk-test");
        assert_eq!(request["model"], "test-model");
        assert_eq!(request["max_tokens"], 500);
        assert!((request["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(request["messages"][0]["role"], "user");
        assert_eq!(
            request["messages"][0]["content"].as_str().unwrap(),
            truncate_prompt(&long_prompt)
        );
    }

    #[tokio::test]
    async fn test_complete_keeps_json_error_body() {
        let client = llm_stub(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "rate limited"}}"#,
            Arc::default(),
        )
        .await;

        match client.complete("hello", 10).await.unwrap_err() {
            LlmError::Api { status, message } => {
                assert_eq!(status, 429);
                let body: Value = serde_json::from_str(&message).unwrap();
                assert_eq!(body["error"]["message"], "rate limited");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_keeps_raw_error_text() {
        let client = llm_stub(StatusCode::BAD_GATEWAY, "upstream down", Arc::default()).await;

        match client.complete("hello", 10).await.unwrap_err() {
            LlmError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_rejects_non_json_success() {
        let client = llm_stub(StatusCode::OK, "<html>ok</html>", Arc::default()).await;

        let err = client.complete("hello", 10).await.unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }
}
