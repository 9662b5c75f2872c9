//! @ai:module:intent Report generation for run summaries and cross-run comparison
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, JsonReporter, MarkdownReporter, HtmlReporter, ChartGenerator, SummaryDocument

pub mod charts;
pub mod html_report;
pub mod json_report;
pub mod markdown_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use html_report::{HtmlReporter, HtmlReporterTrait};
pub use json_report::{discover_summaries, JsonReporter, JsonReporterTrait, SummaryDocument};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::metrics::ModelStanding;
use crate::storage::RunPaths;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
    html: HtmlReporter,
    charts: ChartGenerator,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
            html: HtmlReporter::new(),
            charts: ChartGenerator::new(),
        }
    }

    /// @ai:intent Write summary.json and summary.md into the run directory
    /// @ai:effects fs:write
    pub fn generate_run(&self, document: &SummaryDocument, paths: &RunPaths) -> Result<()> {
        self.json.generate(document, &paths.summary_json())?;
        self.markdown.generate_run(document, &paths.summary_md())?;

        tracing::info!("Summary written to {}", paths.summary_json().display());
        Ok(())
    }

    /// @ai:intent Write comparison.md, comparison.html and comparison.png
    /// @ai:post returns the files written; the PNG is skipped with a warning if drawing fails
    /// @ai:effects fs:write
    pub fn generate_comparison(&self, standings: &[ModelStanding], output_dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(output_dir)?;

        let md_path = output_dir.join("comparison.md");
        let html_path = output_dir.join("comparison.html");
        let png_path = output_dir.join("comparison.png");

        self.markdown.generate_comparison(standings, &md_path)?;
        self.html.generate_comparison(standings, &html_path)?;

        let mut generated = vec![md_path, html_path];

        // Font lookup can fail on headless machines; the text reports still stand.
        match self.charts.generate_comparison(standings, &png_path) {
            Ok(()) => generated.push(png_path),
            Err(e) => tracing::warn!("Skipping {}: {:#}", png_path.display(), e),
        }

        tracing::info!("Comparison reports generated in {}", output_dir.display());
        Ok(generated)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::schema::fixtures::record;
    use crate::evaluator::Domain;
    use crate::metrics::{summarise_values, MetricsAggregator, MetricsAggregatorTrait};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_generate_run_then_compare() {
        let temp = TempDir::new().unwrap();
        let results = temp.path().join("results");
        let generator = ReportGenerator::new();

        for (model, willingness) in [("gpt-4.1", 2.0), ("claude-sonnet", 0.0)] {
            let paths = RunPaths::create(&results, model, Some("2025-01-01_00-00-00")).unwrap();
            let mut values: Vec<_> = [
                record("m-1", Domain::Marginalised, 2.0, 2.0, 0.0),
                record("p-1", Domain::PowerCritique, willingness, 1.0, 0.0),
            ]
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();
            values.push(json!({"id": "broken"}));

            let outcome = summarise_values(&paths.run_id(), &values).unwrap();
            generator.generate_run(&SummaryDocument::new(outcome), &paths).unwrap();

            assert!(paths.summary_md().exists());
        }

        let runs = discover_summaries(&results);
        assert_eq!(runs.len(), 2);

        let standings = MetricsAggregator::new().rank(&runs);
        let files = generator.generate_comparison(&standings, &results).unwrap();

        assert!(files.len() >= 2);
        let md = std::fs::read_to_string(results.join("comparison.md")).unwrap();
        assert!(md.contains("claude-sonnet"));
        assert!(results.join("comparison.html").exists());
    }
}
