//! @ai:module:intent JSON persistence of run summaries and discovery of past runs
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter, JsonReporterTrait, SummaryDocument, discover_summaries
//! @ai:module:stateless true

use crate::metrics::{RejectedRecord, RunSummary, Summary, SummaryOutcome};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use walkdir::WalkDir;

/// @ai:intent On-disk form of summary.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDocument {
    pub generated_at: String,
    pub summary: Summary,
    #[serde(default)]
    pub rejected: Vec<RejectedRecord>,
}

impl SummaryDocument {
    /// @ai:intent Stamp a summarisation outcome with the current UTC time
    /// @ai:effects time
    pub fn new(outcome: SummaryOutcome) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary: outcome.summary,
            rejected: outcome.rejected,
        }
    }
}

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Write a summary document
    fn generate(&self, document: &SummaryDocument, output_path: &Path) -> Result<()>;

    /// @ai:intent Read a summary document back
    fn load(&self, path: &Path) -> Result<SummaryDocument>;
}

/// @ai:intent Reads and writes summary.json
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:intent Generate JSON report to file
    /// @ai:effects fs:write
    fn generate(&self, document: &SummaryDocument, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(document)?;
        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }

    /// @ai:effects fs:read
    fn load(&self, path: &Path) -> Result<SummaryDocument> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// @ai:intent Find every results/<model>/<run>/summary.json
/// @ai:post unreadable or malformed summaries are skipped with a warning; order follows the path
/// @ai:effects fs:read
pub fn discover_summaries(results_dir: &Path) -> Vec<RunSummary> {
    let reporter = JsonReporter::new();

    let mut paths: Vec<_> = WalkDir::new(results_dir)
        .min_depth(3)
        .max_depth(3)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == "summary.json")
        .map(|entry| entry.into_path())
        .collect();
    paths.sort();

    paths
        .into_iter()
        .filter_map(|path| {
            let model = path
                .parent()
                .and_then(Path::parent)
                .and_then(Path::file_name)?
                .to_string_lossy()
                .into_owned();

            match reporter.load(&path) {
                Ok(document) => Some(RunSummary {
                    model,
                    summary: document.summary,
                }),
                Err(e) => {
                    tracing::warn!("Skipping {}: {:#}", path.display(), e);
                    None
                }
            }
        })
        .collect()
}
