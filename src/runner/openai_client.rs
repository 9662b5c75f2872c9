//! @ai:module:intent OpenAI-compatible chat-completions client (OpenAI, Groq, Novita, Mistral)
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChatCompletionsClient
//! @ai:module:stateless false

use crate::error::ProviderError;
use crate::runner::client::{CompletionRequest, ModelClientTrait, ModelResponse};
use crate::runner::provider::Provider;
use crate::runner::rate_limiter::{RateLimiter, RateLimiterTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// @ai:intent Chat-completions client bound to one provider
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    provider: Provider,
    base_url: String,
    api_key: String,
    rate_limiter: Arc<RateLimiter>,
}

impl ChatCompletionsClient {
    /// @ai:intent Create a client for an OpenAI-compatible provider
    /// @ai:effects pure
    pub fn new(
        provider: Provider,
        api_key: String,
        timeout_secs: u64,
        rate_limiter: Arc<RateLimiter>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|source| ProviderError::Transport {
                provider: provider.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            provider,
            base_url: provider.base_url().to_string(),
            api_key,
            rate_limiter,
        })
    }

    /// @ai:intent Point the client at a different endpoint (proxies, local gateways)
    /// @ai:effects pure
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// OpenAI names the output cap `max_completion_tokens`; the compatible providers keep `max_tokens`.
    fn body<'a>(provider: Provider, request: &'a CompletionRequest) -> ApiRequest<'a> {
        let mut messages = Vec::with_capacity(2);

        if let Some(system) = request.system.as_deref() {
            messages.push(Message {
                role: "system",
                content: system,
            });
        }

        messages.push(Message {
            role: "user",
            content: &request.prompt,
        });

        let (max_tokens, max_completion_tokens) = match provider {
            Provider::OpenAi => (None, Some(request.max_tokens)),
            _ => (Some(request.max_tokens), None),
        };

        ApiRequest {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens,
            max_completion_tokens,
        }
    }
}

impl ModelClientTrait for ChatCompletionsClient {
    /// @ai:intent Send a chat completion and return the first choice's text
    /// @ai:effects network
    async fn complete(&self, request: &CompletionRequest) -> Result<ModelResponse, ProviderError> {
        self.rate_limiter.acquire().await;

        let provider = self.provider.to_string();
        let transport = |source| ProviderError::Transport {
            provider: provider.clone(),
            source,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&Self::body(self.provider, request))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::Auth {
                provider: provider.clone(),
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: provider.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let api_response: ApiResponse = response.json().await.map_err(transport)?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider: provider.clone(),
                message: "no message content in first choice".to_string(),
            })?;

        Ok(ModelResponse {
            content: content.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(model: &str) -> CompletionRequest {
        CompletionRequest {
            model: model.to_string(),
            system: Some("rubric".to_string()),
            prompt: "answer".to_string(),
            temperature: None,
            max_tokens: 64,
        }
    }

    #[test]
    fn test_body_includes_system_and_skips_missing_temperature() {
        let request = request("gpt-4.1");

        let json = serde_json::to_value(ChatCompletionsClient::body(Provider::OpenAi, &request)).unwrap();

        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "answer");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_body_carries_output_token_cap() {
        let request = request("llama-3.3-70b-versatile");

        let groq = serde_json::to_value(ChatCompletionsClient::body(Provider::Groq, &request)).unwrap();
        assert_eq!(groq["max_tokens"], 64);
        assert!(groq.get("max_completion_tokens").is_none());

        let openai = serde_json::to_value(ChatCompletionsClient::body(Provider::OpenAi, &request)).unwrap();
        assert_eq!(openai["max_completion_tokens"], 64);
        assert!(openai.get("max_tokens").is_none());
    }

    #[test]
    fn test_parses_choice_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": " hi "}}]}"#;
        let parsed: ApiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some(" hi "));
    }

    #[test]
    fn test_base_url_per_provider() {
        let limiter = Arc::new(RateLimiter::new(60));
        let client = ChatCompletionsClient::new(Provider::Groq, "k".to_string(), 5, limiter).unwrap();
        assert_eq!(client.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(client.with_base_url("http://localhost:8080").base_url, "http://localhost:8080");
    }
}
