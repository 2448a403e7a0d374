//! Chat-completion seam.
//!
//! `OpenAiClient` talks to any OpenAI-compatible `/chat/completions` endpoint;
//! `ScriptedLlmClient` replays canned replies for tests and offline runs.

use crate::domain::errors::{LlmError, LlmResult};
use crate::domain::models::{ChatMessage, CompletionRequest, LlmConfig, ModelFamily};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Output cap applied to `gpt*` models
pub const GPT_MAX_TOKENS: u32 = 32_000;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model used when the caller does not pick one
    fn default_model(&self) -> &str;

    /// Returns the text of the first choice.
    async fn complete(&self, request: CompletionRequest) -> LlmResult<String>;
}

#[derive(Debug, Serialize, PartialEq)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionBody<'a> {
    /// Applies the per-family request shaping.
    fn shaped(request: &'a CompletionRequest) -> Self {
        let mut body = Self {
            model: &request.model,
            messages: &request.messages,
            response_format: None,
            reasoning_effort: None,
            max_tokens: None,
        };
        match ModelFamily::of(&request.model) {
            ModelFamily::Reasoning => {
                body.response_format = Some(ResponseFormat { kind: "text" });
                body.reasoning_effort = Some("high");
            }
            ModelFamily::Gpt => body.max_tokens = Some(GPT_MAX_TOKENS),
            ModelFamily::Other => {}
        }
        body
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn first_choice_text(response: ChatCompletionResponse) -> LlmResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)
}

/// HTTP client for OpenAI-compatible chat completions
pub struct OpenAiClient {
    config: LlmConfig,
    endpoint: Url,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        config.validate()?;
        let endpoint = config.completions_url()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            endpoint,
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: CompletionRequest) -> LlmResult<String> {
        let body = ChatCompletionBody::shaped(&request);
        tracing::debug!(model = %request.model, messages = request.messages.len(), "sending completion request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.config.timeout_secs)
                } else {
                    LlmError::Http(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        first_choice_text(parsed)
    }
}

/// Replays pre-defined replies in order.
///
/// The last reply keeps being returned once the others are used up. Every
/// request is recorded so callers can inspect the prompts that were sent.
pub struct ScriptedLlmClient {
    model: String,
    replies: Mutex<VecDeque<LlmResult<String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlmClient {
    pub fn new(replies: Vec<LlmResult<String>>) -> Self {
        Self {
            model: crate::domain::models::config::DEFAULT_MODEL.to_string(),
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    fn default_model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> LlmResult<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        let mut replies = self.replies.lock().unwrap_or_else(|e| e.into_inner());
        match replies.len() {
            0 => Err(LlmError::EmptyResponse),
            1 => replies[0].clone(),
            _ => replies.pop_front().unwrap_or(Err(LlmError::EmptyResponse)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body_json(model: &str) -> serde_json::Value {
        let request = CompletionRequest::from_prompt(model, "hello");
        serde_json::to_value(ChatCompletionBody::shaped(&request)).unwrap()
    }

    #[test]
    fn test_reasoning_models_get_effort_and_text_format() {
        let body = body_json("o3-mini");
        assert_eq!(body["model"], "o3-mini");
        assert_eq!(body["reasoning_effort"], "high");
        assert_eq!(body["response_format"], json!({"type": "text"}));
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["messages"], json!([{"role": "user", "content": "hello"}]));
    }

    #[test]
    fn test_gpt_models_get_output_cap() {
        let body = body_json("gpt-4o");
        assert_eq!(body["max_tokens"], 32000);
        assert!(body.get("reasoning_effort").is_none());
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_other_models_are_not_shaped() {
        let body = body_json("mistral-large");
        let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_first_choice_text() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "foo(a)."}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }))
        .unwrap();
        assert_eq!(first_choice_text(response).unwrap(), "foo(a).");
    }

    #[test]
    fn test_empty_or_missing_content_is_an_error() {
        let empty: ChatCompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert_eq!(first_choice_text(empty), Err(LlmError::EmptyResponse));

        let null: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert_eq!(first_choice_text(null), Err(LlmError::EmptyResponse));

        let blank: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": "  \n"}}]})).unwrap();
        assert_eq!(first_choice_text(blank), Err(LlmError::EmptyResponse));
    }

    #[test]
    fn test_client_requires_credential() {
        let result = OpenAiClient::new(LlmConfig::default());
        assert!(matches!(result, Err(LlmError::MissingCredential)));
    }

    #[test]
    fn test_client_endpoint() {
        let client = OpenAiClient::new(LlmConfig {
            api_key: "sk-test".to_string(),
            base_url: "http://localhost:9999/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:9999/v1/chat/completions");
        assert_eq!(client.default_model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_http_error() {
        let client = OpenAiClient::new(LlmConfig {
            api_key: "sk-test".to_string(),
            base_url: "http://127.0.0.1:9/v1".to_string(),
            model: "gpt-4o".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        let result = client.complete(CompletionRequest::from_prompt("gpt-4o", "hi")).await;
        assert!(matches!(result, Err(LlmError::Http(_)) | Err(LlmError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_scripted_client_replays_in_order_then_repeats_last() {
        let client = ScriptedLlmClient::new(vec![
            Ok("first".to_string()),
            Err(LlmError::Timeout(30)),
            Ok("last".to_string()),
        ]);

        let req = || CompletionRequest::from_prompt("o3-mini", "p");
        assert_eq!(client.complete(req()).await.unwrap(), "first");
        assert_eq!(client.complete(req()).await, Err(LlmError::Timeout(30)));
        assert_eq!(client.complete(req()).await.unwrap(), "last");
        assert_eq!(client.complete(req()).await.unwrap(), "last");
        assert_eq!(client.call_count(), 4);
    }

    #[tokio::test]
    async fn test_scripted_client_records_requests() {
        let client = ScriptedLlmClient::always_error(LlmError::EmptyResponse).with_model("gpt-4o");
        assert_eq!(client.default_model(), "gpt-4o");

        let _ = client
            .complete(CompletionRequest::from_prompt("gpt-4o", "what is it?"))
            .await;
        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt(), "what is it?");
    }
}
