//! @ai:module:intent Standalone HTML comparison page with an inline SVG chart
//! @ai:module:layer infrastructure
//! @ai:module:public_api HtmlReporter, HtmlReporterTrait
//! @ai:module:stateless true

use crate::metrics::ModelStanding;
use anyhow::{Context, Result};
use std::path::Path;

const CSS_STYLES: &str = r#"body { font-family: -apple-system, "Segoe UI", sans-serif; margin: 2rem; color: #222; }
table { border-collapse: collapse; margin: 1rem 0; }
th, td { border: 1px solid #ccc; padding: 0.35rem 0.7rem; text-align: right; }
th:nth-child(2), td:nth-child(2) { text-align: left; }
thead { background: #f3f3f3; }
.pos { color: #b03a2e; }
.neg { color: #1e8449; }
.note { color: #666; font-size: 0.9rem; }
"#;

const LABEL_WIDTH: f64 = 220.0;
const PLOT_WIDTH: f64 = 480.0;
const ROW_HEIGHT: f64 = 28.0;
const MARGIN: f64 = 20.0;

/// @ai:intent Trait for HTML report generation
pub trait HtmlReporterTrait: Send + Sync {
    /// @ai:intent Write comparison.html for ranked models
    fn generate_comparison(&self, standings: &[ModelStanding], output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates the HTML league table
pub struct HtmlReporter;

impl HtmlReporter {
    /// @ai:intent Create a new HTML reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Horizontal bar chart of Adjusted Index, bars grow left or right from zero
    /// @ai:effects pure
    pub fn render_svg(standings: &[ModelStanding]) -> String {
        let (lo, hi) = value_range(standings.iter().map(|s| s.adjusted_index));
        let x = |v: f64| MARGIN + LABEL_WIDTH + (v - lo) / (hi - lo) * PLOT_WIDTH;
        let zero = x(0.0);

        let width = MARGIN * 2.0 + LABEL_WIDTH + PLOT_WIDTH + 60.0;
        let height = MARGIN * 2.0 + ROW_HEIGHT * standings.len() as f64;

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" role=\"img\" aria-label=\"Adjusted Index by model\">\n"
        ));
        svg.push_str(&format!(
            "<line x1=\"{zero:.1}\" y1=\"{:.1}\" x2=\"{zero:.1}\" y2=\"{:.1}\" stroke=\"#555\" stroke-width=\"1\"/>\n",
            MARGIN / 2.0,
            height - MARGIN / 2.0
        ));

        for (i, standing) in standings.iter().enumerate() {
            let y = MARGIN + ROW_HEIGHT * i as f64;
            let end = x(standing.adjusted_index);
            let (left, bar_width) = if end >= zero { (zero, end - zero) } else { (end, zero - end) };
            let colour = if standing.adjusted_index > 0.0 { "#c0392b" } else { "#27ae60" };

            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"12\">{}</text>\n",
                MARGIN + LABEL_WIDTH - 8.0,
                y + ROW_HEIGHT * 0.65,
                escape_html(&standing.model)
            ));
            svg.push_str(&format!(
                "<rect x=\"{left:.1}\" y=\"{:.1}\" width=\"{bar_width:.1}\" height=\"{:.1}\" fill=\"{colour}\"/>\n",
                y + 4.0,
                ROW_HEIGHT - 8.0
            ));
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\">{:+.3}</text>\n",
                left + bar_width + 4.0,
                y + ROW_HEIGHT * 0.65,
                standing.adjusted_index
            ));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// @ai:intent Full comparison.html document
    /// @ai:effects pure
    pub fn render_comparison(standings: &[ModelStanding]) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str("<title>Model Comparison</title>\n");
        html.push_str("<style>\n");
        html.push_str(CSS_STYLES);
        html.push_str("</style>\n</head>\n<body>\n");
        html.push_str("<h1>Model Comparison</h1>\n");

        if standings.is_empty() {
            html.push_str("<p class=\"note\">No summaries found.</p>\n");
        } else {
            html.push_str("<h2>Adjusted Index</h2>\n");
            html.push_str(&Self::render_svg(standings));
            html.push_str(
                "<p class=\"note\">Positive values favour power; negative values favour marginalised groups.</p>\n",
            );

            html.push_str("<h2>League Table</h2>\n<table>\n<thead><tr>");
            for header in [
                "Rank",
                "Model",
                "Runs",
                "Adjusted Index",
                "Acc Bias",
                "Stigma Bias",
                "Will Bias",
                "Coverage",
                "Willingness",
                "Legacy Asymmetry",
            ] {
                html.push_str(&format!("<th>{header}</th>"));
            }
            html.push_str("</tr></thead>\n<tbody>\n");

            for s in standings {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td>{}{}{}{}<td>{:.3}</td><td>{:.3}</td>{}</tr>\n",
                    s.rank,
                    escape_html(&s.model),
                    s.runs,
                    signed_cell(s.adjusted_index),
                    signed_cell(s.acc_bias),
                    signed_cell(s.stigma_bias),
                    signed_cell(s.will_bias),
                    s.coverage_weight,
                    s.willingness_mean,
                    signed_cell(s.asymmetry_index)
                ));
            }

            html.push_str("</tbody>\n</table>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlReporterTrait for HtmlReporter {
    /// @ai:effects fs:write
    fn generate_comparison(&self, standings: &[ModelStanding], output_path: &Path) -> Result<()> {
        std::fs::write(output_path, Self::render_comparison(standings))
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}

/// Axis range that always contains zero and is never degenerate.
pub(crate) fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if hi - lo < f64::EPSILON {
        (-1.0, 1.0)
    } else {
        (lo, hi)
    }
}

fn signed_cell(value: f64) -> String {
    let class = if value > 0.0 {
        "pos"
    } else if value < 0.0 {
        "neg"
    } else {
        ""
    };
    format!("<td class=\"{class}\">{value:+.3}</td>")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
