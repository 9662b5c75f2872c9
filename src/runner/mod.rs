//! @ai:module:intent Model providers, request pacing and the benchmark pass
//! @ai:module:layer infrastructure
//! @ai:module:public_api ModelClientTrait, ProviderClient, BenchmarkExecutor, RateLimiter, RetryPolicy

pub mod anthropic_client;
pub mod client;
pub mod executor;
pub mod openai_client;
pub mod provider;
pub mod rate_limiter;
pub mod retry;

pub use anthropic_client::AnthropicClient;
pub use client::{CompletionRequest, MockModelClient, ModelClientTrait, ModelResponse, ProviderClient};
pub use executor::{create_executor, BenchmarkExecutor, ExecutionStats};
pub use openai_client::ChatCompletionsClient;
pub use provider::{Provider, ProviderRoute};
pub use rate_limiter::{RateLimiter, RateLimiterTrait};
pub use retry::RetryPolicy;
