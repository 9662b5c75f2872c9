//! @ai:module:intent Route a model id to its provider backend
//! @ai:module:layer infrastructure
//! @ai:module:public_api Provider, ProviderRoute
//! @ai:module:stateless true

use crate::error::ProviderError;

/// @ai:intent Supported model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
    Groq,
    Novita,
    Mistral,
}

impl Provider {
    /// @ai:intent Human-readable provider name
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Groq => "groq",
            Provider::Novita => "novita",
            Provider::Mistral => "mistral",
        }
    }

    /// @ai:intent Environment variable holding this provider's API key
    /// @ai:effects pure
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
            Provider::Novita => "NOVITA_API_KEY",
            Provider::Mistral => "MISTRAL_API_KEY",
        }
    }

    /// @ai:intent API base URL
    /// @ai:effects pure
    pub fn base_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::Novita => "https://api.novita.ai/v1",
            Provider::Mistral => "https://api.mistral.ai/v1",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Provider plus the model name the provider expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRoute {
    pub provider: Provider,
    pub upstream_model: String,
}

impl ProviderRoute {
    /// @ai:intent Resolve a model id by prefix; routing prefixes are stripped
    /// @ai:effects pure
    pub fn resolve(model: &str) -> Result<Self, ProviderError> {
        let route = |provider, upstream: &str| Self {
            provider,
            upstream_model: upstream.to_string(),
        };

        if ["gpt-", "o", "ft:"].iter().any(|p| model.starts_with(p)) {
            Ok(route(Provider::OpenAi, model))
        } else if model.starts_with("claude") {
            Ok(route(Provider::Anthropic, model))
        } else if let Some(rest) = model.strip_prefix("groq/") {
            Ok(route(Provider::Groq, rest))
        } else if let Some(rest) = model.strip_prefix("novita/") {
            Ok(route(Provider::Novita, rest))
        } else if let Some(rest) = model.strip_prefix("mistral/") {
            Ok(route(Provider::Mistral, rest))
        } else {
            Err(ProviderError::UnknownProvider {
                model: model.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_of(model: &str) -> Provider {
        ProviderRoute::resolve(model).unwrap().provider
    }

    #[test]
    fn test_openai_prefixes() {
        assert_eq!(provider_of("gpt-4.1"), Provider::OpenAi);
        assert_eq!(provider_of("o3-mini"), Provider::OpenAi);
        assert_eq!(provider_of("ft:gpt-4o:org:custom"), Provider::OpenAi);
    }

    #[test]
    fn test_prefixed_providers_strip_route() {
        let route = ProviderRoute::resolve("groq/llama-3.1-70b").unwrap();
        assert_eq!(route.provider, Provider::Groq);
        assert_eq!(route.upstream_model, "llama-3.1-70b");

        let route = ProviderRoute::resolve("mistral/mistral-large").unwrap();
        assert_eq!(route.upstream_model, "mistral-large");
    }

    #[test]
    fn test_claude_keeps_full_name() {
        let route = ProviderRoute::resolve("claude-sonnet-4-20250514").unwrap();
        assert_eq!(route.provider, Provider::Anthropic);
        assert_eq!(route.upstream_model, "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_unknown_provider() {
        let err = ProviderRoute::resolve("llama-local").unwrap_err();
        assert_eq!(err.to_string(), "unknown provider for model: llama-local");
    }
}
