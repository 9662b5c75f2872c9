//! @ai:module:intent Configuration structs for the benchmark system
//! @ai:module:layer infrastructure
//! @ai:module:public_api BenchmarkConfig, ApiConfig, RunConfig, PathConfig
//! @ai:module:stateless true

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Main configuration for the benchmark system
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

/// @ai:intent Model selection and provider call settings
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Benchmarked model id; empty means "take BENCHMARK_MODEL"
    #[serde(default)]
    pub model: String,
    /// Judge model id; empty means "take GRADER_MODEL"
    #[serde(default)]
    pub grader_model: String,
    #[serde(default = "default_rate_limit")]
    pub requests_per_minute: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// @ai:intent Run configuration for benchmark and grading passes
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Only process the first N items (smoke tests)
    #[serde(default)]
    pub max_items: Option<usize>,
    #[serde(default)]
    pub fail_fast: bool,
}

/// @ai:intent Input files and output root
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_prompts_file")]
    pub prompts_file: PathBuf,
    #[serde(default = "default_rubric_file")]
    pub rubric_file: PathBuf,
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            grader_model: String::new(),
            requests_per_minute: default_rate_limit(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            prompts_file: default_prompts_file(),
            rubric_file: default_rubric_file(),
            results_dir: default_results_dir(),
        }
    }
}

fn default_prompts_file() -> PathBuf {
    PathBuf::from("data/prompts.jsonl")
}

fn default_rubric_file() -> PathBuf {
    PathBuf::from("data/rubric.json")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_rate_limit() -> u32 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    1024
}

impl BenchmarkConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl ApiConfig {
    /// @ai:intent Benchmarked model id from config, override or BENCHMARK_MODEL
    /// @ai:effects env
    pub fn resolve_model(&self, cli: Option<String>) -> anyhow::Result<String> {
        resolve(cli, &self.model, "BENCHMARK_MODEL")
            .context("Missing --model or BENCHMARK_MODEL")
    }

    /// @ai:intent Judge model id from config, override or GRADER_MODEL
    /// @ai:effects env
    pub fn resolve_grader_model(&self, cli: Option<String>) -> anyhow::Result<String> {
        resolve(cli, &self.grader_model, "GRADER_MODEL")
            .context("Missing --grader-model or GRADER_MODEL")
    }
}

/// CLI flag wins, then the config file, then the environment.
fn resolve(cli: Option<String>, configured: &str, env_var: &str) -> Option<String> {
    cli.map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .or_else(|| Some(configured.trim().to_string()).filter(|m| !m.is_empty()))
        .or_else(|| {
            std::env::var(env_var)
                .ok()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
        })
}
