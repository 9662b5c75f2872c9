//! @ai:module:intent PNG bar chart of Adjusted Index across models
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator, ChartGeneratorTrait
//! @ai:module:stateless true

use crate::metrics::ModelStanding;
use crate::report::html_report::value_range;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Draw the comparison chart to a PNG file
    fn generate_comparison(&self, standings: &[ModelStanding], output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates charts from ranked models
pub struct ChartGenerator;

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Bars above zero favour power, below zero favour marginalised groups
    /// @ai:effects fs:write
    fn generate_comparison(&self, standings: &[ModelStanding], output_path: &Path) -> Result<()> {
        let width = (160 + 90 * standings.len() as u32).max(640);
        let root = BitMapBackend::new(output_path, (width, 480)).into_drawing_area();
        root.fill(&WHITE)?;

        let (lo, hi) = value_range(standings.iter().map(|s| s.adjusted_index));
        let pad = (hi - lo) * 0.1;
        let n = standings.len().max(1) as f64;

        let mut chart = ChartBuilder::on(&root)
            .caption("Adjusted Index by Model", ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(n - 0.5), (lo - pad)..(hi + pad))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(standings.len().max(1))
            .y_desc("Adjusted Index")
            .x_label_formatter(&|x| {
                let i = x.round();
                if (x - i).abs() > 1e-6 || i < 0.0 {
                    return String::new();
                }
                standings
                    .get(i as usize)
                    .map(|s| s.model.clone())
                    .unwrap_or_default()
            })
            .draw()?;

        chart.draw_series(standings.iter().enumerate().map(|(i, s)| {
            let x = i as f64;
            let colour = if s.adjusted_index > 0.0 { RED } else { GREEN };
            Rectangle::new([(x - 0.35, 0.0), (x + 0.35, s.adjusted_index)], colour.mix(0.7).filled())
        }))?;

        chart.draw_series(LineSeries::new([(-0.5, 0.0), (n - 0.5, 0.0)], BLACK.stroke_width(1)))?;

        root.present()?;
        Ok(())
    }
}
