//! @ai:module:intent LLM judge: turn raw responses into validated graded records
//! @ai:module:layer application
//! @ai:module:public_api Grader, GradingStats, extract_json, merge_grade, judge_temperature
//! @ai:module:stateless false

use crate::config::{BenchmarkConfig, RunConfig};
use crate::corpus::{RawResponse, Rubric};
use crate::error::GradingError;
use crate::evaluator::validator::validate_record;
use crate::runner::{CompletionRequest, ModelClientTrait, RetryPolicy};
use crate::storage::{already_processed_ids, ErrorLog, JsonlAppender, RunPaths};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::sync::Arc;

/// @ai:intent Counters for one grading pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradingStats {
    pub total: usize,
    pub skipped: usize,
    pub graded: usize,
    pub failed: usize,
}

/// @ai:intent Sampling temperature for the judge
/// @ai:post None for model families that reject an explicit temperature
/// @ai:effects pure
pub fn judge_temperature(model: &str) -> Option<f32> {
    if model.starts_with("o1") || model.starts_with("gpt-4o") {
        None
    } else {
        Some(0.0)
    }
}

/// @ai:intent Slice from the first `{` to the last `}` of a judge reply
/// @ai:effects pure
pub fn extract_json(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;

    if end <= start {
        return None;
    }

    Some(&reply[start..=end])
}

/// @ai:intent Lay the judge's fields over the raw record
/// @ai:post the raw record's id is kept even if the judge echoes a different one
/// @ai:effects pure
pub fn merge_grade(raw: &RawResponse, grade: Value) -> Result<Value, GradingError> {
    let Value::Object(grade) = grade else {
        return Err(GradingError::NotAnObject);
    };

    let mut merged = match serde_json::to_value(raw)? {
        Value::Object(map) => map,
        _ => return Err(GradingError::NotAnObject),
    };

    merged.extend(grade);
    merged.insert("id".to_string(), Value::String(raw.id.clone()));

    Ok(Value::Object(merged))
}

/// @ai:intent Grades raw responses with a judge model
pub struct Grader<C: ModelClientTrait> {
    client: Arc<C>,
    rubric: Rubric,
    retry: RetryPolicy,
    run_config: RunConfig,
    max_tokens: u32,
}

impl<C: ModelClientTrait> Grader<C> {
    /// @ai:intent Create a grader
    /// @ai:effects pure
    pub fn new(client: Arc<C>, rubric: Rubric, retry: RetryPolicy, run_config: RunConfig, max_tokens: u32) -> Self {
        Self {
            client,
            rubric,
            retry,
            run_config,
            max_tokens,
        }
    }

    /// @ai:intent Create a grader from config
    /// @ai:effects pure
    pub fn from_config(client: Arc<C>, rubric: Rubric, config: &BenchmarkConfig) -> Self {
        Self::new(
            client,
            rubric,
            RetryPolicy::new(config.api.max_retries),
            config.run.clone(),
            config.api.max_tokens,
        )
    }

    /// @ai:intent Judge one raw response and return the validated merged record
    /// @ai:effects network
    pub async fn grade_one(&self, model: &str, raw: &RawResponse) -> Result<Value, GradingError> {
        if raw.is_failure() {
            return Err(GradingError::FailedResponse);
        }

        let rubric = self
            .rubric
            .for_domain(&raw.domain)
            .ok_or_else(|| GradingError::MissingRubric {
                domain: raw.domain.clone(),
            })?;

        let request = CompletionRequest {
            model: model.to_string(),
            system: Some(rubric.to_string()),
            prompt: raw.response.clone(),
            temperature: judge_temperature(model),
            max_tokens: self.max_tokens,
        };

        let label = format!("grading {}", raw.id);
        let reply = self.retry.run(&label, || self.client.complete(&request)).await?;
        tracing::debug!("Judge reply for {}: {}", raw.id, reply.content);

        let json_str = extract_json(&reply.content).ok_or(GradingError::NoJson)?;
        let grade: Value = serde_json::from_str(json_str)?;
        let merged = merge_grade(raw, grade)?;

        validate_record(&merged)?;
        Ok(merged)
    }

    /// @ai:intent Grade every raw response not yet present in graded_responses.jsonl
    /// @ai:post only records that pass validation are written; failures go to grader_errors.log
    /// @ai:effects network, fs:write
    pub async fn grade_all(&self, responses: &[RawResponse], model: &str, paths: &RunPaths) -> Result<GradingStats> {
        let graded_path = paths.graded_responses();
        let done = already_processed_ids(&graded_path);
        let to_grade: Vec<&RawResponse> = responses.iter().filter(|r| !done.contains(&r.id)).collect();

        let mut stats = GradingStats {
            total: responses.len(),
            skipped: responses.len() - to_grade.len(),
            ..Default::default()
        };

        tracing::info!("Grader model={}", model);
        tracing::info!(
            "Total to grade={} Already graded={} Remaining={}",
            stats.total,
            stats.skipped,
            to_grade.len()
        );

        let mut out = JsonlAppender::open(&graded_path)?;
        let mut errors = ErrorLog::new(paths.grader_errors_log());

        for (i, raw) in to_grade.iter().enumerate() {
            tracing::info!("[{}/{}] Grading {} ({})", i + 1, to_grade.len(), raw.id, raw.domain);

            match self.grade_one(model, raw).await {
                Ok(record) => {
                    out.append(&record)?;
                    stats.graded += 1;
                }
                Err(e) => {
                    tracing::warn!("Grading {} failed: {}", raw.id, e);
                    errors.log(&raw.id, &e, json!({ "grader_model": model }))?;
                    stats.failed += 1;

                    if self.run_config.fail_fast {
                        return Err(e).with_context(|| format!("Stopping at response {} (fail-fast)", raw.id));
                    }
                }
            }
        }

        tracing::info!("Wrote graded results to {}", graded_path.display());
        if errors.entries() > 0 {
            tracing::warn!("{} errors were logged to {}", errors.entries(), errors.path().display());
        }

        Ok(stats)
    }
}
