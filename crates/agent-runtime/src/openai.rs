//! OpenAI LLM Provider
//!
//! Implementation of `LlmProvider` for the OpenAI Chat Completions API and
//! compatible gateways.

use agent_core::{
    error::Result,
    message::Message,
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::http;

/// OpenAI chat completions endpoint
pub const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// OpenAI LLM provider
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiProvider {
    /// Create a provider targeting the OpenAI API
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http::client(http::DEFAULT_TIMEOUT_SECS)?,
            api_key: api_key.into(),
            endpoint: ENDPOINT.into(),
        })
    }

    /// Target a custom OpenAI-compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request<'a>(messages: &'a [Message], options: &'a GenerationOptions) -> ChatRequest<'a> {
        ChatRequest {
            model: &options.model,
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: match m.role {
                        agent_core::Role::System => "system",
                        agent_core::Role::User => "user",
                        agent_core::Role::Assistant => "assistant",
                    },
                    content: &m.content,
                })
                .collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            stop: (!options.stop_sequences.is_empty()).then_some(options.stop_sequences.as_slice()),
        }
    }

    fn convert_completion(response: ChatResponse, model: &str) -> Completion {
        let choice = response.choices.into_iter().next();
        let finish_reason = choice
            .as_ref()
            .and_then(|c| c.finish_reason.as_deref())
            .map(parse_finish_reason);

        Completion {
            content: choice.and_then(|c| c.message.content).unwrap_or_default(),
            model: response.model.unwrap_or_else(|| model.to_string()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason,
        }
    }
}

fn parse_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "tool_calls" | "function_call" => FinishReason::ToolUse,
        "content_filter" => FinishReason::ContentFilter,
        _ => FinishReason::Error,
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let body = Self::build_request(messages, options);
        tracing::debug!(model = %options.model, messages = messages.len(), "OpenAI chat completion");

        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);
        let response: ChatResponse = http::send_json("openai", request).await?;

        Ok(Self::convert_completion(response, &options.model))
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let messages = vec![Message::system("You are helpful."), Message::user("Hello")];
        let options = GenerationOptions {
            model: "gpt-4-turbo".into(),
            temperature: 0.5,
            max_tokens: 100,
            stop_sequences: vec!["\nObservation:".into()],
        };

        let body = serde_json::to_value(OpenAiProvider::build_request(&messages, &options)).unwrap();
        assert_eq!(body["model"], "gpt-4-turbo");
        assert_eq!(body["max_tokens"], 100);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Hello");
        assert_eq!(body["stop"][0], "\nObservation:");
    }

    #[test]
    fn test_request_omits_empty_stop() {
        let messages = vec![Message::user("Hi")];
        let options = GenerationOptions::default();
        let body = serde_json::to_value(OpenAiProvider::build_request(&messages, &options)).unwrap();
        assert!(body.get("stop").is_none());
    }

    #[test]
    fn test_response_conversion() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "model": "gpt-4-turbo-2024-04-09",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Final Answer: 4"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        }"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        let completion = OpenAiProvider::convert_completion(response, "gpt-4-turbo");

        assert_eq!(completion.content, "Final Answer: 4");
        assert_eq!(completion.model, "gpt-4-turbo-2024-04-09");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.unwrap().total_tokens, 13);
    }

    #[test]
    fn test_response_without_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let completion = OpenAiProvider::convert_completion(response, "gpt-4");
        assert!(completion.content.is_empty());
        assert_eq!(completion.model, "gpt-4");
        assert!(completion.finish_reason.is_none());
    }

    #[test]
    fn test_custom_endpoint() {
        let provider = OpenAiProvider::new("sk-test")
            .unwrap()
            .with_endpoint("http://localhost:8000/v1/chat/completions");
        assert_eq!(provider.endpoint(), "http://localhost:8000/v1/chat/completions");
        assert!(!format!("{provider:?}").contains("sk-test"));
    }
}
