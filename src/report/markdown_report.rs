//! @ai:module:intent Markdown rendering of run summaries and the cross-run league table
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter, MarkdownReporterTrait
//! @ai:module:stateless true

use crate::evaluator::Domain;
use crate::metrics::{ModelStanding, Summary};
use crate::report::json_report::SummaryDocument;
use anyhow::{Context, Result};
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Write summary.md for one run
    fn generate_run(&self, document: &SummaryDocument, output_path: &Path) -> Result<()>;

    /// @ai:intent Write comparison.md for ranked models
    fn generate_comparison(&self, standings: &[ModelStanding], output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown reports
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Format a signed metric
    /// @ai:effects pure
    fn signed(value: f64) -> String {
        format!("{:+.3}", value)
    }

    fn percent(value: f64) -> String {
        format!("{:.1}%", value * 100.0)
    }

    /// @ai:intent Per-domain table
    /// @ai:effects pure
    fn domain_section(output: &mut String, summary: &Summary) -> std::fmt::Result {
        writeln!(output, "## Domains")?;
        writeln!(output)?;
        writeln!(
            output,
            "| Domain | Count | Participation | Willingness | Accuracy | Stigma | Accuracy (answered) | Stigma (answered) |"
        )?;
        writeln!(output, "|--------|-------|---------------|-------------|----------|--------|---------------------|-------------------|")?;

        for domain in Domain::ALL {
            let stats = summary.domains.get(domain);
            writeln!(
                output,
                "| {} | {} | {} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} |",
                domain,
                stats.count,
                Self::percent(stats.participation),
                stats.willingness_mean,
                stats.accuracy_mean,
                stats.stigma_mean,
                stats.accuracy_cond,
                stats.stigma_cond
            )?;
        }

        writeln!(output)?;
        writeln!(
            output,
            "Overall means: accuracy {:.3}, stigma {:.3}, willingness {:.3} ({} records)",
            summary.overall.accuracy, summary.overall.stigma, summary.overall.willingness, summary.counts.total
        )?;
        writeln!(output)
    }

    /// @ai:intent Directional and legacy metrics
    /// @ai:effects pure
    fn metrics_section(output: &mut String, summary: &Summary) -> std::fmt::Result {
        let d = &summary.directional;

        writeln!(output, "## Directional Metrics")?;
        writeln!(output)?;
        writeln!(output, "| Metric | Value |")?;
        writeln!(output, "|--------|-------|")?;
        writeln!(output, "| Accuracy Bias | {} |", Self::signed(d.acc_bias))?;
        writeln!(output, "| Stigma Bias | {} |", Self::signed(d.stigma_bias))?;
        writeln!(output, "| Willingness Bias | {} |", Self::signed(d.will_bias))?;
        writeln!(output, "| Coverage Weight | {:.3} |", d.coverage_weight)?;
        writeln!(output, "| **Adjusted Index** | **{}** |", Self::signed(d.adjusted_index))?;
        writeln!(output)?;
        writeln!(
            output,
            "Positive values mean the model favours power; negative values mean it favours marginalised groups."
        )?;
        writeln!(output)?;

        let l = &summary.legacy;

        writeln!(output, "## Legacy Asymmetry")?;
        writeln!(output)?;
        writeln!(output, "| Delta (marginalised - power-critique) | Value |")?;
        writeln!(output, "|---------------------------------------|-------|")?;
        writeln!(output, "| Accuracy | {} |", Self::signed(l.accuracy_delta))?;
        writeln!(output, "| Stigma | {} |", Self::signed(l.stigma_delta))?;
        writeln!(output, "| Participation | {} |", Self::signed(l.participation_delta))?;
        writeln!(output, "| Asymmetry Index | {} |", Self::signed(l.asymmetry_index))?;
        writeln!(output)
    }

    /// @ai:intent Full summary.md body
    /// @ai:effects pure
    pub fn render_run(document: &SummaryDocument) -> Result<String, std::fmt::Error> {
        let summary = &document.summary;
        let mut output = String::new();

        writeln!(output, "# Asymmetry Summary")?;
        writeln!(output)?;
        writeln!(output, "**Run:** {}", summary.run_id)?;
        writeln!(output, "**Generated:** {}", document.generated_at)?;
        writeln!(
            output,
            "**Records:** {} valid ({} marginalised, {} power-critique), {} rejected",
            summary.counts.total,
            summary.counts.marginalised,
            summary.counts.power_critique,
            document.rejected.len()
        )?;
        writeln!(output)?;

        Self::domain_section(&mut output, summary)?;
        Self::metrics_section(&mut output, summary)?;

        if !document.rejected.is_empty() {
            writeln!(output, "## Rejected Records")?;
            writeln!(output)?;
            for rejected in &document.rejected {
                writeln!(output, "- `{}`: {}", rejected.id, rejected.reason)?;
            }
            writeln!(output)?;
        }

        Ok(output)
    }

    /// @ai:intent Full comparison.md body
    /// @ai:effects pure
    pub fn render_comparison(standings: &[ModelStanding]) -> Result<String, std::fmt::Error> {
        let mut output = String::new();

        writeln!(output, "# Model Comparison")?;
        writeln!(output)?;
        writeln!(
            output,
            "Ranked by Adjusted Index (descending), then willingness, then model name."
        )?;
        writeln!(output)?;
        writeln!(
            output,
            "| Rank | Model | Runs | Adjusted Index | Acc Bias | Stigma Bias | Will Bias | Coverage | Willingness | Legacy Asymmetry |"
        )?;
        writeln!(output, "|------|-------|------|----------------|----------|-------------|-----------|----------|-------------|------------------|")?;

        for s in standings {
            writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} | {} | {:.3} | {:.3} | {} |",
                s.rank,
                s.model,
                s.runs,
                Self::signed(s.adjusted_index),
                Self::signed(s.acc_bias),
                Self::signed(s.stigma_bias),
                Self::signed(s.will_bias),
                s.coverage_weight,
                s.willingness_mean,
                Self::signed(s.asymmetry_index)
            )?;
        }

        writeln!(output)?;
        Ok(output)
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:effects fs:write
    fn generate_run(&self, document: &SummaryDocument, output_path: &Path) -> Result<()> {
        let content = Self::render_run(document)?;
        std::fs::write(output_path, content)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }

    /// @ai:effects fs:write
    fn generate_comparison(&self, standings: &[ModelStanding], output_path: &Path) -> Result<()> {
        let content = Self::render_comparison(standings)?;
        std::fs::write(output_path, content)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}
