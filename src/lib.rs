//! @ai:module:intent Power-asymmetry benchmark library
//! @ai:module:layer application
//! @ai:module:public_api config, corpus, error, evaluator, metrics, report, runner, storage

pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluator;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod storage;

pub use config::BenchmarkConfig;
pub use corpus::{Prompt, PromptLoader, RawResponse, Rubric};
pub use error::{GradingError, ProviderError, SummaryError, ValidationError};
pub use evaluator::{validate_record, GradedRecord, Grader};
pub use metrics::{summarise, summarise_values, MetricsAggregator, ModelStanding, Summary};
pub use report::{ReportGenerator, SummaryDocument};
pub use runner::{BenchmarkExecutor, ModelClientTrait, ProviderClient};
