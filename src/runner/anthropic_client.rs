//! @ai:module:intent Anthropic Messages API client
//! @ai:module:layer infrastructure
//! @ai:module:public_api AnthropicClient
//! @ai:module:stateless false

use crate::error::ProviderError;
use crate::runner::client::{CompletionRequest, ModelClientTrait, ModelResponse};
use crate::runner::provider::Provider;
use crate::runner::rate_limiter::{RateLimiter, RateLimiterTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const API_VERSION: &str = "2023-06-01";

/// @ai:intent Messages API request body
#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// @ai:intent Messages API response body
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// @ai:intent Anthropic client with rate limiting
pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    rate_limiter: Arc<RateLimiter>,
}

impl AnthropicClient {
    /// @ai:intent Create a new Anthropic client
    /// @ai:effects pure
    pub fn new(api_key: String, timeout_secs: u64, rate_limiter: Arc<RateLimiter>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|source| ProviderError::Transport {
                provider: Provider::Anthropic.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: Provider::Anthropic.base_url().to_string(),
            api_key,
            rate_limiter,
        })
    }
}

impl ModelClientTrait for AnthropicClient {
    /// @ai:intent Send a message and join the returned text blocks
    /// @ai:effects network
    async fn complete(&self, request: &CompletionRequest) -> Result<ModelResponse, ProviderError> {
        self.rate_limiter.acquire().await;

        let provider = Provider::Anthropic.to_string();

        let body = ApiRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system.as_deref(),
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: provider.clone(),
                source,
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::Auth {
                provider,
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider,
                status: status.as_u16(),
                body: error_text,
            });
        }

        let api_response: ApiResponse = response.json().await.map_err(|source| ProviderError::Transport {
            provider: provider.clone(),
            source,
        })?;

        let content = join_text(api_response);

        if content.is_empty() {
            return Err(ProviderError::InvalidResponse {
                provider,
                message: "response contained no text blocks".to_string(),
            });
        }

        Ok(ModelResponse { content })
    }
}

fn join_text(response: ApiResponse) -> String {
    response
        .content
        .into_iter()
        .filter_map(|c| c.text)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
