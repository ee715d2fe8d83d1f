//! OpenAI-compatible `/chat/completions` backend.

use std::time::Duration;

use async_trait::async_trait;
use postbrief_shared::{LlmConfig, PostbriefError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::LanguageModel;
use crate::message::{ChatMessage, Completion, CompletionRequest, ToolCall, ToolDefinition, Usage};

/// User-Agent string for model requests.
const USER_AGENT: &str = concat!("postbrief/", env!("CARGO_PKG_VERSION"));

/// Longest error body excerpt kept in error messages.
const ERROR_BODY_EXCERPT: usize = 300;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a ToolDefinition,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Chat-completions client bound to a single model.
#[derive(Debug, Clone)]
pub struct OpenAiCompatModel {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatModel {
    /// Create a client for `model` at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PostbriefError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Create a client from the `[llm]` config section.
    pub fn from_config(config: &LlmConfig, api_key: &str, model: &str) -> Result<Self> {
        Self::new(&config.base_url, api_key, model, config.timeout_secs)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(model = %self.model, messages = request.messages.len()))]
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let body = WireRequest {
            model: &self.model,
            messages: &request.messages,
            tools: request
                .tools
                .iter()
                .map(|function| WireTool {
                    kind: "function",
                    function,
                })
                .collect(),
            response_format: request.json_output.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let url = self.endpoint();
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PostbriefError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PostbriefError::Network(format!("{url}: failed to read body: {e}")))?;

        if !status.is_success() {
            let excerpt: String = text.chars().take(ERROR_BODY_EXCERPT).collect();
            return Err(PostbriefError::Model(format!(
                "{} returned HTTP {status}: {excerpt}",
                self.model
            )));
        }

        let wire: WireResponse = serde_json::from_str(&text)
            .map_err(|e| PostbriefError::parse(format!("invalid completion response: {e}")))?;

        let choice = wire
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PostbriefError::Model(format!("{} returned no choices", self.model)))?;

        let usage = wire.usage.unwrap_or_default();
        debug!(
            tokens_in = usage.prompt_tokens,
            tokens_out = usage.completion_tokens,
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            "completion received"
        );

        Ok(Completion {
            text: choice.message.content,
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model_for(server: &MockServer) -> OpenAiCompatModel {
        OpenAiCompatModel::new(format!("{}/v1/", server.uri()), "test-key", "test-model", 5).unwrap()
    }

    #[tokio::test]
    async fn text_completion() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "messages": [{ "role": "user", "content": "hello" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "hi there" },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 12, "completion_tokens": 3 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = CompletionRequest {
            messages: vec![ChatMessage::user("hello")],
            ..Default::default()
        };
        let completion = model_for(&server).complete(&request).await.unwrap();

        assert_eq!(completion.text.as_deref(), Some("hi there"));
        assert!(completion.tool_calls.is_empty());
        assert_eq!(completion.usage.prompt_tokens, 12);
    }

    #[tokio::test]
    async fn tools_and_json_mode_are_sent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "tools": [{ "type": "function", "function": { "name": "lookup" } }],
                "response_format": { "type": "json_object" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_1",
                            "type": "function",
                            "function": { "name": "lookup", "arguments": "{\"q\":\"rust\"}" }
                        }]
                    },
                    "finish_reason": "tool_calls"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = CompletionRequest {
            messages: vec![ChatMessage::user("find rust")],
            tools: vec![ToolDefinition {
                name: "lookup".into(),
                description: "Look something up".into(),
                parameters: serde_json::json!({ "type": "object" }),
            }],
            json_output: true,
        };
        let completion = model_for(&server).complete(&request).await.unwrap();

        assert!(completion.text.is_none());
        assert_eq!(completion.tool_calls.len(), 1);
        assert_eq!(completion.tool_calls[0].function.arguments, r#"{"q":"rust"}"#);
        assert_eq!(completion.finish_reason.as_deref(), Some("tool_calls"));
    }

    #[tokio::test]
    async fn http_error_is_model_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let request = CompletionRequest {
            messages: vec![ChatMessage::user("hello")],
            ..Default::default()
        };
        let err = model_for(&server).complete(&request).await.unwrap_err();

        match err {
            PostbriefError::Model(msg) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("rate limited"));
            }
            other => panic!("expected Model error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_model_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let request = CompletionRequest::default();
        let err = model_for(&server).complete(&request).await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
