//! @ai:module:intent Benchmark pass: send every prompt to the model and record raw responses
//! @ai:module:layer application
//! @ai:module:public_api BenchmarkExecutor, ExecutionStats, create_executor
//! @ai:module:stateless false

use crate::config::{BenchmarkConfig, RunConfig};
use crate::corpus::{Prompt, RawResponse};
use crate::runner::client::{CompletionRequest, ModelClientTrait};
use crate::runner::retry::RetryPolicy;
use crate::storage::{already_processed_ids, ErrorLog, JsonlAppender, RunPaths};
use anyhow::{Context, Result};
use serde_json::json;
use std::sync::Arc;

/// @ai:intent Counters for one benchmark pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    pub total: usize,
    pub skipped: usize,
    pub answered: usize,
    pub failed: usize,
}

/// @ai:intent Executes benchmark prompts against one model
pub struct BenchmarkExecutor<C: ModelClientTrait> {
    client: Arc<C>,
    retry: RetryPolicy,
    run_config: RunConfig,
    max_tokens: u32,
}

impl<C: ModelClientTrait> BenchmarkExecutor<C> {
    /// @ai:intent Create a new benchmark executor
    /// @ai:effects pure
    pub fn new(client: Arc<C>, retry: RetryPolicy, run_config: RunConfig, max_tokens: u32) -> Self {
        Self {
            client,
            retry,
            run_config,
            max_tokens,
        }
    }

    /// @ai:intent Ask the model one prompt, retrying transient failures
    /// @ai:effects network
    async fn ask(&self, model: &str, prompt: &Prompt) -> Result<String, crate::error::ProviderError> {
        // Temperature is left unset; several reasoning models reject it.
        let request = CompletionRequest {
            model: model.to_string(),
            system: None,
            prompt: prompt.text.clone(),
            temperature: None,
            max_tokens: self.max_tokens,
        };

        let label = format!("prompt {}", prompt.id);
        let response = self.retry.run(&label, || self.client.complete(&request)).await?;
        Ok(response.content)
    }

    /// @ai:intent Run all prompts not yet present in the run's raw responses
    /// @ai:post every attempted prompt has exactly one line in raw_responses.jsonl
    /// @ai:effects network, fs:write
    pub async fn execute_all(&self, prompts: &[Prompt], model: &str, paths: &RunPaths) -> Result<ExecutionStats> {
        let raw_path = paths.raw_responses();
        let done = already_processed_ids(&raw_path);
        let to_run: Vec<&Prompt> = prompts.iter().filter(|p| !done.contains(&p.id)).collect();

        let mut stats = ExecutionStats {
            total: prompts.len(),
            skipped: prompts.len() - to_run.len(),
            ..Default::default()
        };

        tracing::info!("Model={} Run={}", model, paths.dir.display());
        tracing::info!(
            "Prompts total={} Already done={} Remaining={}",
            stats.total,
            stats.skipped,
            to_run.len()
        );

        let mut out = JsonlAppender::open(&raw_path)?;
        let mut errors = ErrorLog::new(paths.errors_log());

        for (i, prompt) in to_run.iter().enumerate() {
            tracing::info!("[{}/{}] Benchmarking {} ({})", i + 1, to_run.len(), prompt.id, prompt.domain);

            match self.ask(model, prompt).await {
                Ok(answer) => {
                    out.append(&RawResponse::answer(prompt, answer))?;
                    stats.answered += 1;
                }
                Err(e) => {
                    tracing::warn!("Prompt {} failed: {}", prompt.id, e);
                    errors.log(&prompt.id, &e, json!({ "model": model }))?;
                    out.append(&RawResponse::failure(prompt, &e))?;
                    stats.failed += 1;

                    if self.run_config.fail_fast {
                        return Err(e).with_context(|| format!("Stopping at prompt {} (fail-fast)", prompt.id));
                    }
                }
            }
        }

        tracing::info!("Wrote raw responses to {}", raw_path.display());
        if errors.entries() > 0 {
            tracing::warn!("{} errors were logged to {}", errors.entries(), errors.path().display());
        }

        Ok(stats)
    }
}

/// @ai:intent Create executor from config
/// @ai:effects pure
pub fn create_executor<C: ModelClientTrait>(client: Arc<C>, config: &BenchmarkConfig) -> BenchmarkExecutor<C> {
    BenchmarkExecutor::new(
        client,
        RetryPolicy::new(config.api.max_retries),
        config.run.clone(),
        config.api.max_tokens,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::client::MockModelClient;
    use crate::storage::read_jsonl;
    use serde_json::Value;
    use tempfile::TempDir;

    fn prompts() -> Vec<Prompt> {
        vec![
            Prompt {
                id: "m-1".to_string(),
                domain: "marginalised".to_string(),
                text: "Question one".to_string(),
            },
            Prompt {
                id: "p-1".to_string(),
                domain: "power-critique".to_string(),
                text: "Question two".to_string(),
            },
        ]
    }

    fn executor(client: MockModelClient, fail_fast: bool) -> BenchmarkExecutor<MockModelClient> {
        let run_config = RunConfig {
            fail_fast,
            ..Default::default()
        };
        BenchmarkExecutor::new(Arc::new(client), RetryPolicy::immediate(2), run_config, 256)
    }

    #[tokio::test]
    async fn test_writes_one_raw_line_per_prompt() {
        let temp = TempDir::new().unwrap();
        let paths = RunPaths::create(temp.path(), "gpt-4.1", Some("2025-01-01_00-00-00")).unwrap();

        let stats = executor(MockModelClient::new("an answer"), false)
            .execute_all(&prompts(), "gpt-4.1", &paths)
            .await
            .unwrap();

        assert_eq!(stats.answered, 2);
        let raw: Vec<RawResponse> = read_jsonl(&paths.raw_responses()).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[1].prompt, "Question two");
        assert_eq!(raw[1].response, "an answer");
    }

    #[tokio::test]
    async fn test_resume_skips_answered_prompts() {
        let temp = TempDir::new().unwrap();
        let paths = RunPaths::create(temp.path(), "gpt-4.1", Some("run")).unwrap();
        let all = prompts();

        let first = executor(MockModelClient::new("first"), false);
        first.execute_all(&all[..1], "gpt-4.1", &paths).await.unwrap();

        let client = Arc::new(MockModelClient::new("second"));
        let second = BenchmarkExecutor::new(client.clone(), RetryPolicy::immediate(1), RunConfig::default(), 256);
        let stats = second.execute_all(&all, "gpt-4.1", &paths).await.unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.answered, 1);
        assert_eq!(client.requests().len(), 1);
        assert_eq!(client.requests()[0].prompt, "Question two");
    }

    #[tokio::test]
    async fn test_failed_prompt_is_logged_and_marked() {
        let temp = TempDir::new().unwrap();
        let paths = RunPaths::create(temp.path(), "gpt-4.1", Some("run")).unwrap();
        let client = MockModelClient::scripted(
            "ok",
            vec![Err("down".to_string()), Err("still down".to_string())],
        );

        let stats = executor(client, false)
            .execute_all(&prompts(), "gpt-4.1", &paths)
            .await
            .unwrap();

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.answered, 1);

        let raw: Vec<RawResponse> = read_jsonl(&paths.raw_responses()).unwrap();
        assert!(raw[0].is_failure());
        assert!(raw[0].response.contains("still down"));

        let errors: Vec<Value> = read_jsonl(&paths.errors_log()).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["id"], "m-1");
        assert_eq!(errors[0]["meta"]["model"], "gpt-4.1");
    }

    #[tokio::test]
    async fn test_fail_fast_stops_the_run() {
        let temp = TempDir::new().unwrap();
        let paths = RunPaths::create(temp.path(), "gpt-4.1", Some("run")).unwrap();
        let client = MockModelClient::scripted("ok", vec![Err("a".to_string()), Err("b".to_string())]);

        let result = executor(client, true).execute_all(&prompts(), "gpt-4.1", &paths).await;

        assert!(result.is_err());
        let raw: Vec<RawResponse> = read_jsonl(&paths.raw_responses()).unwrap();
        assert_eq!(raw.len(), 1);
    }
}
