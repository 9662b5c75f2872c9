//! @ai:module:intent Model-calling capability interface and its implementations
//! @ai:module:layer infrastructure
//! @ai:module:public_api ModelClientTrait, CompletionRequest, ModelResponse, ProviderClient, MockModelClient
//! @ai:module:stateless false

use crate::config::ApiConfig;
use crate::error::ProviderError;
use crate::runner::anthropic_client::AnthropicClient;
use crate::runner::openai_client::ChatCompletionsClient;
use crate::runner::provider::{Provider, ProviderRoute};
use crate::runner::rate_limiter::RateLimiter;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// @ai:intent One prompt sent to a model
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: Option<String>,
    pub prompt: String,
    /// None leaves the provider default, some models reject explicit values
    pub temperature: Option<f32>,
    pub max_tokens: u32,
}

/// @ai:intent Text returned by a model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    pub content: String,
}

/// @ai:intent Maps (model id, prompt) to response text
#[allow(async_fn_in_trait)]
pub trait ModelClientTrait: Send + Sync {
    /// @ai:intent Send one request and return the trimmed reply text
    async fn complete(&self, request: &CompletionRequest) -> Result<ModelResponse, ProviderError>;
}

/// @ai:intent HTTP backend selected from the model id prefix
pub struct ProviderClient {
    route: ProviderRoute,
    backend: Backend,
}

enum Backend {
    Chat(ChatCompletionsClient),
    Anthropic(AnthropicClient),
}

impl ProviderClient {
    /// @ai:intent Build the backend for a model, with its own rate limiter
    /// @ai:pre the provider's API key variable is set
    /// @ai:effects env
    pub fn for_model(model: &str, config: &ApiConfig) -> Result<Self, ProviderError> {
        let route = ProviderRoute::resolve(model)?;
        let var = route.provider.api_key_var();
        let api_key = std::env::var(var)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::MissingApiKey { var })?;
        let limiter = Arc::new(RateLimiter::new(config.requests_per_minute));

        tracing::info!("Using {} for model {}", route.provider, model);

        let backend = match route.provider {
            Provider::Anthropic => Backend::Anthropic(AnthropicClient::new(api_key, config.timeout_secs, limiter)?),
            provider => Backend::Chat(ChatCompletionsClient::new(
                provider,
                api_key,
                config.timeout_secs,
                limiter,
            )?),
        };

        Ok(Self { route, backend })
    }
}

impl ModelClientTrait for ProviderClient {
    /// @ai:intent Rewrite the model id to the upstream name and dispatch
    /// @ai:pre the request's model routes to the provider this client was built for
    /// @ai:effects network
    async fn complete(&self, request: &CompletionRequest) -> Result<ModelResponse, ProviderError> {
        let route = ProviderRoute::resolve(&request.model)?;

        if route.provider != self.route.provider {
            return Err(ProviderError::WrongProvider {
                model: request.model.clone(),
                provider: self.route.provider.to_string(),
            });
        }

        let upstream = CompletionRequest {
            model: route.upstream_model,
            ..request.clone()
        };

        match &self.backend {
            Backend::Chat(client) => client.complete(&upstream).await,
            Backend::Anthropic(client) => client.complete(&upstream).await,
        }
    }
}

/// @ai:intent Scripted client for tests and dry runs
pub struct MockModelClient {
    default: String,
    script: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockModelClient {
    /// @ai:intent Mock that always answers with `response`
    /// @ai:effects pure
    pub fn new(response: impl Into<String>) -> Self {
        Self::scripted(response, Vec::new())
    }

    /// @ai:intent Mock that plays `script` in order (Err = failed call), then falls back to `response`
    /// @ai:effects pure
    pub fn scripted(response: impl Into<String>, script: Vec<Result<String, String>>) -> Self {
        Self {
            default: response.into(),
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Requests received so far
    /// @ai:effects pure
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ModelClientTrait for MockModelClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<ModelResponse, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| Ok(self.default.clone()));

        match next {
            Ok(content) => Ok(ModelResponse {
                content: content.trim().to_string(),
            }),
            Err(body) => Err(ProviderError::Status {
                provider: "mock".to_string(),
                status: 503,
                body,
            }),
        }
    }
}
