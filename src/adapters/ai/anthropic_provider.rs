//! Anthropic Provider - Implementation of AIProvider for the Messages API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-3-5-haiku-latest")
//!     .with_base_url("https://api.anthropic.com");
//!
//! let provider = AnthropicProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::status::{error_for_status, send_error};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, TokenUsage,
};

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Used when a request does not set `max_tokens`, which the API requires.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API (default: https://api.anthropic.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-3-5-haiku-latest".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic API provider implementation.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider with the given configuration.
    pub fn new(config: AnthropicConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the messages endpoint URL.
    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    /// Converts our request to Anthropic's format.
    ///
    /// System messages are folded into the top-level `system` field since
    /// the Messages API only accepts user and assistant roles.
    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let mut system_parts: Vec<String> = request.system_prompt.iter().cloned().collect();
        let mut messages = Vec::with_capacity(request.messages.len());

        for msg in &request.messages {
            let role = match msg.role {
                MessageRole::System => {
                    system_parts.push(msg.content.clone());
                    continue;
                }
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            };
            messages.push(AnthropicMessage {
                role: role.to_string(),
                content: msg.content.clone(),
            });
        }

        AnthropicRequest {
            model: self.config.model.clone(),
            messages,
            system: if system_parts.is_empty() {
                None
            } else {
                Some(system_parts.join("\n\n"))
            },
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: request.temperature,
        }
    }
}

/// Converts a successful response body into a completion.
fn parse_completion(body: &str) -> Result<CompletionResponse, AIError> {
    let anthropic_response: AnthropicResponse = serde_json::from_str(body)
        .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

    let content = anthropic_response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("");

    let finish_reason = match anthropic_response.stop_reason.as_deref() {
        Some("max_tokens") => FinishReason::Length,
        _ => FinishReason::Stop,
    };

    Ok(CompletionResponse {
        content,
        usage: TokenUsage::new(
            anthropic_response.usage.input_tokens,
            anthropic_response.usage.output_tokens,
        ),
        model: anthropic_response.model,
        finish_reason,
    })
}

#[async_trait]
impl AIProvider for AnthropicProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let body = self.to_anthropic_request(&request);

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error(e, self.config.timeout.as_secs()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AIError::network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(error_for_status(status.as_u16(), &text, 60));
        }

        parse_completion(&text)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("anthropic", &self.config.model)
    }
}

// ----- Anthropic API Types -----

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::ports::{CompletionPurpose, RequestMetadata};

    fn metadata() -> RequestMetadata {
        RequestMetadata::new(
            SessionId::new("sess-1").unwrap(),
            CompletionPurpose::ExtractField,
            "trace-1",
        )
    }

    #[test]
    fn config_builder_works() {
        let config = AnthropicConfig::new("test-key")
            .with_model("claude-3-opus-20240229")
            .with_timeout(Duration::from_secs(15));

        assert_eq!(config.model, "claude-3-opus-20240229");
        assert_eq!(config.base_url, "https://api.anthropic.com");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn system_messages_move_to_system_field() {
        let provider = AnthropicProvider::new(AnthropicConfig::new("k")).unwrap();
        let request = CompletionRequest::new(metadata())
            .with_system_prompt("필드를 추출하세요")
            .with_message(MessageRole::System, "JSON으로만 답하세요")
            .with_message(MessageRole::User, "스튜디오 A");

        let body = serde_json::to_value(provider.to_anthropic_request(&request)).unwrap();

        assert_eq!(body["system"], "필드를 추출하세요\n\nJSON으로만 답하세요");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn parses_text_blocks() {
        let body = r#"{
            "model": "claude-3-5-haiku-latest",
            "content": [{"type": "text", "text": "{\"extractedValue\": "}, {"type": "text", "text": "\"스튜디오 A\", \"isValid\": true}"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 120, "output_tokens": 18}
        }"#;

        let completion = parse_completion(body).unwrap();
        assert_eq!(
            completion.content,
            "{\"extractedValue\": \"스튜디오 A\", \"isValid\": true}"
        );
        assert_eq!(completion.usage.total_tokens, 138);
    }

    #[test]
    fn max_tokens_stop_is_length() {
        let body = r#"{"model": "m", "content": [], "stop_reason": "max_tokens", "usage": {"input_tokens": 1, "output_tokens": 1}}"#;
        assert_eq!(parse_completion(body).unwrap().finish_reason, FinishReason::Length);
    }
}
