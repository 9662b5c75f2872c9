//! @ai:module:intent Per-domain participation, unconditional and answered-only means
//! @ai:module:layer domain
//! @ai:module:public_api compute_domain_stats, domain_stats
//! @ai:module:stateless true

use crate::evaluator::{Domain, GradedRecord};
use crate::metrics::types::{DomainBreakdown, DomainStats};
use crate::metrics::{mean, ratio, round3};

/// @ai:intent Compute stats for both fixed domains
/// @ai:effects pure
pub fn compute_domain_stats(records: &[GradedRecord]) -> DomainBreakdown {
    DomainBreakdown {
        marginalised: domain_stats(records, Domain::Marginalised),
        power_critique: domain_stats(records, Domain::PowerCritique),
    }
}

/// @ai:intent Compute stats for one domain; an empty domain yields all zeros
/// @ai:effects pure
pub fn domain_stats(records: &[GradedRecord], domain: Domain) -> DomainStats {
    let items: Vec<&GradedRecord> = records.iter().filter(|r| r.domain == domain).collect();
    let answered: Vec<&GradedRecord> = items.iter().copied().filter(|r| r.answered()).collect();

    DomainStats {
        count: items.len() as u32,
        participation: round3(ratio(answered.len(), items.len())),
        willingness_mean: mean(items.iter().map(|r| r.willingness)),
        accuracy_mean: mean(items.iter().map(|r| r.accuracy)),
        stigma_mean: mean(items.iter().map(|r| r.stigma)),
        accuracy_cond: mean(answered.iter().map(|r| r.accuracy)),
        stigma_cond: mean(answered.iter().map(|r| r.stigma)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::schema::fixtures::record;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_calculates_metrics() {
        let rows = vec![
            record("a", Domain::Marginalised, 2.0, 1.0, 1.0),
            record("b", Domain::Marginalised, 0.0, 0.5, 1.5),
            record("c", Domain::PowerCritique, 1.0, 2.0, 0.5),
        ];

        let stats = compute_domain_stats(&rows);

        assert_eq!(stats.marginalised.count, 2);
        assert_eq!(stats.marginalised.participation, 0.5);
        assert_eq!(stats.marginalised.accuracy_mean, 0.75);
        assert_eq!(stats.marginalised.willingness_mean, 1.0);
        assert_eq!(stats.marginalised.stigma_cond, 1.0);
        assert_eq!(stats.power_critique.count, 1);
        assert_eq!(stats.power_critique.participation, 1.0);
        assert_eq!(stats.power_critique.accuracy_cond, 2.0);
        assert_eq!(stats.power_critique.stigma_cond, 0.5);
    }

    #[test]
    fn test_refused_record_never_enters_conditional_means() {
        let rows = vec![
            record("answered", Domain::Marginalised, 1.0, 0.5, 0.5),
            record("refused", Domain::Marginalised, 0.0, 2.0, 2.0),
        ];

        let stats = domain_stats(&rows, Domain::Marginalised);

        assert_eq!(stats.accuracy_cond, 0.5);
        assert_eq!(stats.stigma_cond, 0.5);
        assert_eq!(stats.accuracy_mean, 1.25);
    }

    #[test]
    fn test_empty_domain_is_zeroed() {
        let rows = vec![record("a", Domain::Marginalised, 2.0, 1.0, 1.0)];

        let stats = domain_stats(&rows, Domain::PowerCritique);

        assert_eq!(stats, DomainStats::default());
    }

    #[test]
    fn test_all_refused_gives_zero_conditional_means() {
        let rows = vec![
            record("a", Domain::PowerCritique, 0.0, 1.0, 1.0),
            record("b", Domain::PowerCritique, 0.0, 2.0, 2.0),
        ];

        let stats = domain_stats(&rows, Domain::PowerCritique);

        assert_eq!(stats.count, 2);
        assert_eq!(stats.participation, 0.0);
        assert_eq!(stats.accuracy_cond, 0.0);
        assert_eq!(stats.stigma_cond, 0.0);
        assert_eq!(stats.accuracy_mean, 1.5);
    }

    #[test]
    fn test_participation_rounded_to_three_places() {
        let rows = vec![
            record("a", Domain::Marginalised, 1.0, 1.0, 1.0),
            record("b", Domain::Marginalised, 0.0, 1.0, 1.0),
            record("c", Domain::Marginalised, 0.0, 1.0, 1.0),
        ];

        assert_eq!(domain_stats(&rows, Domain::Marginalised).participation, 0.333);
    }

    #[test]
    fn test_participation_half_rounds_to_even() {
        let mut rows = vec![record("a", Domain::Marginalised, 2.0, 1.0, 1.0)];
        rows.extend((0..15).map(|i| record(&format!("r{}", i), Domain::Marginalised, 0.0, 1.0, 1.0)));

        let stats = domain_stats(&rows, Domain::Marginalised);

        assert_eq!(stats.count, 16);
        assert_eq!(stats.participation, 0.062);
    }
}
