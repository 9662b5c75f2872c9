//! @ai:module:intent Cross-run aggregation and model ranking
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator, MetricsAggregatorTrait
//! @ai:module:stateless true

use crate::metrics::mean;
use crate::metrics::types::{ModelStanding, RunSummary, Summary};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// @ai:intent Trait for cross-run aggregation
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Average each model's runs and rank the models
    fn rank(&self, runs: &[RunSummary]) -> Vec<ModelStanding>;
}

/// @ai:intent Averages repeated runs per model and produces a total ordering
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// @ai:intent Create a new metrics aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Mean of every scalar metric across one model's runs
    /// @ai:pre summaries is non-empty
    /// @ai:effects pure
    fn standing(model: &str, summaries: &[&Summary]) -> ModelStanding {
        let avg = |f: fn(&Summary) -> f64| mean(summaries.iter().map(|s| f(s)));

        ModelStanding {
            rank: 0,
            model: model.to_string(),
            runs: summaries.len() as u32,
            adjusted_index: avg(|s| s.directional.adjusted_index),
            asymmetry_index: avg(|s| s.legacy.asymmetry_index),
            acc_bias: avg(|s| s.directional.acc_bias),
            stigma_bias: avg(|s| s.directional.stigma_bias),
            will_bias: avg(|s| s.directional.will_bias),
            coverage_weight: avg(|s| s.directional.coverage_weight),
            accuracy_mean: avg(|s| s.overall.accuracy),
            stigma_mean: avg(|s| s.overall.stigma),
            willingness_mean: avg(|s| s.overall.willingness),
            marginalised_participation: avg(|s| s.domains.marginalised.participation),
            power_critique_participation: avg(|s| s.domains.power_critique.participation),
        }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Descending adjusted index, then descending willingness, then model id
/// @ai:effects pure
fn ranking_order(a: &ModelStanding, b: &ModelStanding) -> Ordering {
    b.adjusted_index
        .total_cmp(&a.adjusted_index)
        .then_with(|| b.willingness_mean.total_cmp(&a.willingness_mean))
        .then_with(|| a.model.cmp(&b.model))
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:intent Group runs by model, average, sort and assign unique ranks
    /// @ai:post models without runs are absent; ranks are 1..=n with no ties
    /// @ai:effects pure
    fn rank(&self, runs: &[RunSummary]) -> Vec<ModelStanding> {
        let mut by_model: BTreeMap<&str, Vec<&Summary>> = BTreeMap::new();

        for run in runs {
            by_model
                .entry(run.model.as_str())
                .or_default()
                .push(&run.summary);
        }

        let mut standings: Vec<ModelStanding> = by_model
            .into_iter()
            .filter(|(_, summaries)| !summaries.is_empty())
            .map(|(model, summaries)| Self::standing(model, &summaries))
            .collect();

        standings.sort_by(ranking_order);

        for (position, standing) in standings.iter_mut().enumerate() {
            standing.rank = position as u32 + 1;
        }

        standings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::schema::fixtures::record;
    use crate::evaluator::Domain;
    use crate::metrics::summarise;

    fn run(model: &str, adjusted_index: f64, willingness: f64) -> RunSummary {
        let mut summary = summarise(
            "run",
            &[
                record("m", Domain::Marginalised, 1.0, 1.0, 1.0),
                record("p", Domain::PowerCritique, 1.0, 1.0, 1.0),
            ],
        )
        .unwrap();
        summary.directional.adjusted_index = adjusted_index;
        summary.overall.willingness = willingness;

        RunSummary {
            model: model.to_string(),
            summary,
        }
    }

    fn order(standings: &[ModelStanding]) -> Vec<(u32, &str)> {
        standings.iter().map(|s| (s.rank, s.model.as_str())).collect()
    }

    #[test]
    fn test_ranks_descending_by_adjusted_index() {
        let runs = vec![run("a", -0.2, 1.0), run("b", 0.4, 1.0), run("c", 0.1, 1.0)];

        let standings = MetricsAggregator::new().rank(&runs);

        assert_eq!(order(&standings), vec![(1, "b"), (2, "c"), (3, "a")]);
    }

    #[test]
    fn test_tie_broken_by_willingness_then_model_id() {
        let runs = vec![
            run("zeta", 0.3, 1.0),
            run("alpha", 0.3, 1.0),
            run("mid", 0.3, 1.8),
        ];

        let standings = MetricsAggregator::new().rank(&runs);

        assert_eq!(order(&standings), vec![(1, "mid"), (2, "alpha"), (3, "zeta")]);
    }

    #[test]
    fn test_repeated_runs_are_averaged() {
        let runs = vec![run("a", 0.1, 1.0), run("a", 0.2, 2.0), run("b", 0.0, 1.0)];

        let standings = MetricsAggregator::new().rank(&runs);

        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].model, "a");
        assert_eq!(standings[0].runs, 2);
        assert_eq!(standings[0].adjusted_index, 0.15);
        assert_eq!(standings[0].willingness_mean, 1.5);
        assert_eq!(standings[0].coverage_weight, 1.0);
    }

    #[test]
    fn test_average_landing_on_zero_ties_with_exact_zero() {
        let runs = vec![
            run("eager", 0.3, 2.0),
            run("eager", -0.1, 2.0),
            run("eager", -0.2, 2.0),
            run("calm", 0.0, 1.0),
        ];

        let standings = MetricsAggregator::new().rank(&runs);

        assert_eq!(standings[0].adjusted_index, 0.0);
        assert!(standings[0].adjusted_index.is_sign_positive());
        assert_eq!(order(&standings), vec![(1, "eager"), (2, "calm")]);
    }

    #[test]
    fn test_no_runs_no_rows() {
        assert!(MetricsAggregator::new().rank(&[]).is_empty());
    }
}
