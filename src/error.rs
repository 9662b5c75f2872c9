//! @ai:module:intent Error taxonomy for validation, summarisation, grading and provider calls
//! @ai:module:layer domain
//! @ai:module:public_api ValidationError, SummaryError, ProviderError, GradingError
//! @ai:module:stateless true

use thiserror::Error;

/// @ai:intent Reason a graded record was rejected by the validator
///
/// The `Display` text is the rejection reason reported to callers and must stay
/// stable: identical malformed input always yields the identical string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing key: {field}")]
    MissingField { field: &'static str },

    #[error("{field} must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("{field} not numeric")]
    NotNumeric { field: &'static str },

    #[error("{field} out of range {min}..{max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} has invalid value '{value}'")]
    InvalidCategory { field: &'static str, value: String },

    #[error("unknown domain '{value}'")]
    UnknownDomain { value: String },
}

/// @ai:intent Fatal failure of a single run's summarisation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SummaryError {
    #[error("no valid graded records for run {run_id} ({rejected} rejected)")]
    EmptyInput { run_id: String, rejected: usize },
}

/// @ai:intent Failure of the model-calling capability
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("unknown provider for model: {model}")]
    UnknownProvider { model: String },

    #[error("{var} not set in environment")]
    MissingApiKey { var: &'static str },

    #[error("model {model} is not served by the {provider} client")]
    WrongProvider { model: String, provider: String },

    #[error("authentication rejected by {provider} ({status})")]
    Auth { provider: String, status: u16 },

    #[error("{provider} API error ({status}): {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },
}

/// @ai:intent Reasons a raw response could not be turned into a graded record
#[derive(Error, Debug)]
pub enum GradingError {
    #[error("No rubric entry for domain '{domain}'")]
    MissingRubric { domain: String },

    #[error("benchmark call failed, nothing to grade")]
    FailedResponse,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("no JSON object found in grader reply")]
    NoJson,

    #[error("invalid JSON from grader: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("grader reply is not a JSON object")]
    NotAnObject,

    #[error("grader output rejected: {0}")]
    Schema(#[from] ValidationError),
}
