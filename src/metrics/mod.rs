//! @ai:module:intent Aggregation engine: domain stats, directional biases, composite indices, cross-run ranking
//! @ai:module:layer domain
//! @ai:module:public_api summarise, summarise_values, Summary, DomainStats, DirectionalBiases, MetricsAggregator, ModelStanding
//! @ai:module:stateless true

pub mod aggregator;
pub mod composite;
pub mod directional;
pub mod domain_stats;
pub mod types;

pub use aggregator::{MetricsAggregator, MetricsAggregatorTrait};
pub use composite::{adjusted_index, coverage_weight, legacy_metrics, summarise, summarise_values};
pub use directional::{accuracy_term, compute_directional, refusal_rate, stigma_term};
pub use domain_stats::{compute_domain_stats, domain_stats};
pub use types::{
    DirectionalBiases, DirectionalMetrics, DomainBreakdown, DomainStats, LegacyMetrics,
    ModelStanding, OverallMeans, RecordCounts, RejectedRecord, RunSummary, Summary,
    SummaryOutcome,
};

/// @ai:intent Round to 3 decimal places, exact halves to even
/// @ai:post never returns -0.0
/// @ai:effects pure
pub fn round3(value: f64) -> f64 {
    let scaled = value * 1000.0;
    // Exact rounding error of the scaling; decides halves that are not truly halves.
    let error = value.mul_add(1000.0, -scaled);

    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 && error != 0.0 {
        if error > 0.0 {
            scaled.ceil()
        } else {
            scaled.floor()
        }
    } else {
        scaled.round_ties_even()
    };

    let result = rounded / 1000.0;
    if result == 0.0 {
        0.0
    } else {
        result
    }
}

/// @ai:intent Arithmetic mean rounded to 3 places, 0.0 for no values
/// @ai:effects pure
pub(crate) fn mean<I: Iterator<Item = f64>>(iter: I) -> f64 {
    let (sum, count) = iter.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        0.0
    } else {
        round3(sum / count as f64)
    }
}

/// Unrounded part/whole, 0.0 for an empty whole.
pub(crate) fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(vec![10.0, 20.0, 30.0].into_iter()), 20.0);
        assert_eq!(mean(vec![1.0, 2.0, 2.0].into_iter()), 1.667);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_round3_halves_go_to_even() {
        assert_eq!(round3(0.3125), 0.312);
        assert_eq!(round3(0.0625), 0.062);
        assert_eq!(round3(0.1875), 0.188);
        assert_eq!(round3(-0.3125), -0.312);
        assert_eq!(round3(0.00050000001), 0.001);
    }

    #[test]
    fn test_round3_never_negative_zero() {
        assert!(round3(-0.0001).is_sign_positive());
        assert!(round3(-0.0).is_sign_positive());
        assert!(round3(-2.8e-17).is_sign_positive());
    }

    #[test]
    fn test_round3_handles_negatives() {
        assert_eq!(round3(-2.0 / 3.0), -0.667);
        assert_eq!(round3(-1.0 / 3.0), -0.333);
    }
}
