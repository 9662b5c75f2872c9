//! @ai:module:intent CLI for the power-asymmetry benchmark
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use asymmetry_bench::{
    config::BenchmarkConfig,
    corpus::{PromptLoader, PromptLoaderTrait, RawResponse},
    error::SummaryError,
    evaluator::{record_id, validate_record, Grader},
    metrics::{summarise_values, MetricsAggregator, MetricsAggregatorTrait, ModelStanding, Summary},
    report::{discover_summaries, ReportGenerator, SummaryDocument},
    runner::{create_executor, ProviderClient},
    storage::{latest_run_dir, read_jsonl, safe_dir, RunPaths},
};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "asymmetry-bench")]
#[command(about = "Measure whether language models treat power and marginalised groups asymmetrically")]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults to ./benchmark.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct PassArgs {
    /// Only process the first N items (smoke tests)
    #[arg(long)]
    max: Option<usize>,

    /// Stop on the first error instead of logging and continuing
    #[arg(long)]
    fail_fast: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send every prompt to a model and record raw responses
    Run {
        /// Model id (e.g. gpt-4.1, claude-sonnet-4-20250514, groq/llama-3.1-70b)
        #[arg(short, long)]
        model: Option<String>,

        /// Path to prompts.jsonl
        #[arg(long)]
        prompts: Option<PathBuf>,

        /// Run folder name; reuse an existing one to resume
        #[arg(long)]
        timestamp: Option<String>,

        #[command(flatten)]
        pass: PassArgs,
    },

    /// Grade raw responses with a judge model
    Grade {
        /// Run folder (e.g. results/gpt-4.1/2025-08-08_16-10-22)
        #[arg(long)]
        run_dir: Option<PathBuf>,

        /// Benchmarked model; grades its latest run when --run-dir is omitted
        #[arg(short, long)]
        model: Option<String>,

        /// Judge model id
        #[arg(short, long)]
        grader_model: Option<String>,

        /// Path to rubric.json
        #[arg(long)]
        rubric: Option<PathBuf>,

        #[command(flatten)]
        pass: PassArgs,
    },

    /// Summarise graded responses of one run
    Summarise {
        #[arg(long)]
        run_dir: Option<PathBuf>,

        /// Summarise this model's latest run when --run-dir is omitted
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Rank every summarised run under the results directory
    Compare {
        /// Results directory to scan (defaults to [paths].results_dir)
        #[arg(short, long)]
        results_dir: Option<PathBuf>,

        /// Where to write comparison reports (defaults to the results directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run, grade and summarise one model in a fresh run
    Pipeline {
        #[arg(short, long)]
        model: Option<String>,

        #[arg(short, long)]
        grader_model: Option<String>,

        #[command(flatten)]
        pass: PassArgs,
    },

    /// Report schema rejections in a graded file without summarising
    Validate {
        /// Path to graded_responses.jsonl
        file: PathBuf,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "benchmark.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("asymmetry_bench=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = load_or_default_config(cli.config)?;

    let result = match cli.command {
        Commands::Run {
            model,
            prompts,
            timestamp,
            pass,
        } => run_benchmark(&config, model, prompts, timestamp, pass).await.map(|_| ()),
        Commands::Grade {
            run_dir,
            model,
            grader_model,
            rubric,
            pass,
        } => {
            let paths = resolve_run_dir(&config, run_dir, model)?;
            grade_run(&config, &paths, grader_model, rubric, pass).await
        }
        Commands::Summarise { run_dir, model } => {
            let paths = resolve_run_dir(&config, run_dir, model)?;
            summarise_run(&paths).map(|_| ())
        }
        Commands::Compare { results_dir, output } => compare(&config, results_dir, output),
        Commands::Pipeline {
            model,
            grader_model,
            pass,
        } => pipeline(&config, model, grader_model, pass).await,
        Commands::Validate { file } => validate_file(&file),
        Commands::Init { output } => init_config(output),
    };

    if let Err(e) = &result {
        if let Some(SummaryError::EmptyInput { run_id, rejected }) = e.downcast_ref::<SummaryError>() {
            eprintln!("No valid graded records in {} ({} rejected).", run_id, rejected);
            eprintln!("Run `asymmetry-bench validate` on the graded file to see why.");
            std::process::exit(2);
        }
    }

    result
}

/// @ai:intent Apply per-invocation overrides to the run section
/// @ai:effects pure
fn with_pass_args(config: &BenchmarkConfig, pass: &PassArgs) -> BenchmarkConfig {
    let mut config = config.clone();
    if pass.max.is_some() {
        config.run.max_items = pass.max;
    }
    config.run.fail_fast |= pass.fail_fast;
    config
}

/// @ai:intent Benchmark pass for one model
/// @ai:effects network, fs:write
async fn run_benchmark(
    config: &BenchmarkConfig,
    model: Option<String>,
    prompts: Option<PathBuf>,
    timestamp: Option<String>,
    pass: PassArgs,
) -> Result<RunPaths> {
    let config = with_pass_args(config, &pass);
    let model = config.api.resolve_model(model)?;
    let prompts_path = prompts.unwrap_or_else(|| config.paths.prompts_file.clone());

    let prompts = PromptLoader::new().load_prompts(&prompts_path, config.run.max_items)?;
    let paths = RunPaths::create(&config.paths.results_dir, &model, timestamp.as_deref())?;

    let client = Arc::new(ProviderClient::for_model(&model, &config.api)?);
    let executor = create_executor(client, &config);
    let stats = executor.execute_all(&prompts, &model, &paths).await?;

    println!();
    println!("Benchmark finished: {}", paths.dir.display());
    println!(
        "  prompts={} skipped={} answered={} failed={}",
        stats.total, stats.skipped, stats.answered, stats.failed
    );

    Ok(paths)
}

/// @ai:intent Grading pass over one run directory
/// @ai:effects network, fs:write
async fn grade_run(
    config: &BenchmarkConfig,
    paths: &RunPaths,
    grader_model: Option<String>,
    rubric: Option<PathBuf>,
    pass: PassArgs,
) -> Result<()> {
    let config = with_pass_args(config, &pass);
    let grader_model = config.api.resolve_grader_model(grader_model)?;
    let rubric_path = rubric.unwrap_or_else(|| config.paths.rubric_file.clone());
    let rubric = PromptLoader::new().load_rubric(&rubric_path)?;

    let mut responses: Vec<RawResponse> = read_jsonl(&paths.raw_responses())
        .with_context(|| format!("No raw responses in {}", paths.dir.display()))?;
    if let Some(max) = config.run.max_items {
        responses.truncate(max);
    }

    let client = Arc::new(ProviderClient::for_model(&grader_model, &config.api)?);
    let grader = Grader::from_config(client, rubric, &config);
    let stats = grader.grade_all(&responses, &grader_model, paths).await?;

    println!();
    println!("Grading finished: {}", paths.graded_responses().display());
    println!(
        "  responses={} skipped={} graded={} failed={}",
        stats.total, stats.skipped, stats.graded, stats.failed
    );

    Ok(())
}

/// @ai:intent Summarise a run's graded records and write summary.json/summary.md
/// @ai:effects fs:read, fs:write
fn summarise_run(paths: &RunPaths) -> Result<Summary> {
    let values: Vec<Value> = read_jsonl(&paths.graded_responses())
        .with_context(|| format!("No graded responses in {}", paths.dir.display()))?;

    let outcome = summarise_values(&paths.run_id(), &values)?;
    let document = SummaryDocument::new(outcome);
    ReportGenerator::new().generate_run(&document, paths)?;

    print_summary(&document);
    Ok(document.summary)
}

/// @ai:intent Rank all summarised runs and write comparison reports
/// @ai:effects fs:read, fs:write
fn compare(config: &BenchmarkConfig, results_dir: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let results_dir = results_dir.unwrap_or_else(|| config.paths.results_dir.clone());
    let output = output.unwrap_or_else(|| results_dir.clone());

    let runs = discover_summaries(&results_dir);
    if runs.is_empty() {
        anyhow::bail!("No summary.json files found under {}", results_dir.display());
    }

    tracing::info!("Comparing {} runs", runs.len());

    let standings = MetricsAggregator::new().rank(&runs);
    let files = ReportGenerator::new().generate_comparison(&standings, &output)?;

    print_standings(&standings);
    for file in files {
        println!("Wrote {}", file.display());
    }

    Ok(())
}

/// @ai:intent Run, grade and summarise a single model end to end
/// @ai:effects network, fs:write
async fn pipeline(
    config: &BenchmarkConfig,
    model: Option<String>,
    grader_model: Option<String>,
    pass: PassArgs,
) -> Result<()> {
    // Resolve both models up front so a missing judge fails before any benchmark calls.
    let model = config.api.resolve_model(model)?;
    let grader_model = config.api.resolve_grader_model(grader_model)?;

    let paths = run_benchmark(config, Some(model), None, None, pass.clone()).await?;
    grade_run(config, &paths, Some(grader_model), None, pass).await?;
    summarise_run(&paths)?;

    Ok(())
}

/// @ai:intent Print every schema rejection in a graded file
/// @ai:effects fs:read, io
fn validate_file(path: &Path) -> Result<()> {
    let values: Vec<Value> = read_jsonl(path)?;
    let mut rejected = 0;

    for (index, value) in values.iter().enumerate() {
        if let Err(reason) = validate_record(value) {
            let id = record_id(value).unwrap_or_else(|| format!("#{}", index));
            println!("  {}: {}", id, reason);
            rejected += 1;
        }
    }

    println!();
    println!(
        "{} records, {} valid, {} rejected",
        values.len(),
        values.len() - rejected,
        rejected
    );

    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = BenchmarkConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<BenchmarkConfig> {
    match path {
        Some(p) => BenchmarkConfig::load(&p),
        None => {
            let default_path = PathBuf::from("benchmark.toml");

            if default_path.exists() {
                BenchmarkConfig::load(&default_path)
            } else {
                Ok(BenchmarkConfig::default())
            }
        }
    }
}

/// @ai:intent Explicit run directory, or the latest run of a model
/// @ai:effects fs:read, env
fn resolve_run_dir(config: &BenchmarkConfig, run_dir: Option<PathBuf>, model: Option<String>) -> Result<RunPaths> {
    if let Some(dir) = run_dir {
        return Ok(RunPaths::new(dir));
    }

    let model = config
        .api
        .resolve_model(model)
        .context("Pass --run-dir, or --model to use that model's latest run")?;
    let model_dir = config.paths.results_dir.join(safe_dir(&model));

    Ok(RunPaths::new(latest_run_dir(&model_dir)?))
}

/// @ai:intent Print summary to console
/// @ai:effects io
fn print_summary(document: &SummaryDocument) {
    let s = &document.summary;

    println!();
    println!("Asymmetry Summary: {}", s.run_id);
    println!("{}", "=".repeat(60));
    println!(
        "{:<16} {:>6} {:>8} {:>8} {:>8} {:>8}",
        "", "Count", "Partic.", "Willing", "Acc|ans", "Stig|ans"
    );
    println!("{}", "-".repeat(60));
    for (label, stats) in [
        ("marginalised", &s.domains.marginalised),
        ("power-critique", &s.domains.power_critique),
    ] {
        println!(
            "{:<16} {:>6} {:>7.1}% {:>8.3} {:>8.3} {:>8.3}",
            label,
            stats.count,
            stats.participation * 100.0,
            stats.willingness_mean,
            stats.accuracy_cond,
            stats.stigma_cond
        );
    }
    println!();
    println!(
        "acc_bias={:+.3} stigma_bias={:+.3} will_bias={:+.3} coverage={:.3}",
        s.directional.acc_bias, s.directional.stigma_bias, s.directional.will_bias, s.directional.coverage_weight
    );
    println!("Adjusted Index: {:+.3}", s.directional.adjusted_index);
    println!("Legacy asymmetry index: {:+.3}", s.legacy.asymmetry_index);

    if !document.rejected.is_empty() {
        println!();
        println!("{} records rejected (see summary.md)", document.rejected.len());
    }
    println!();
}

/// @ai:intent Print the league table to console
/// @ai:effects io
fn print_standings(standings: &[ModelStanding]) {
    println!();
    println!(
        "{:>4}  {:<36} {:>4} {:>9} {:>9} {:>9}",
        "Rank", "Model", "Runs", "Adjusted", "Willing", "Legacy"
    );
    println!("{}", "-".repeat(78));
    for s in standings {
        println!(
            "{:>4}  {:<36} {:>4} {:>+9.3} {:>9.3} {:>+9.3}",
            s.rank, s.model, s.runs, s.adjusted_index, s.willingness_mean, s.asymmetry_index
        );
    }
    println!();
}
