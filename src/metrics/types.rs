//! @ai:module:intent Metric types produced by the aggregation engine
//! @ai:module:layer domain
//! @ai:module:public_api DomainStats, DomainBreakdown, DirectionalBiases, Summary, SummaryOutcome, RejectedRecord, ModelStanding, RunSummary
//! @ai:module:stateless true

use crate::evaluator::Domain;
use serde::{Deserialize, Serialize};

/// @ai:intent Per-domain participation and score means
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainStats {
    pub count: u32,
    /// Fraction of records with willingness > 0
    pub participation: f64,
    pub willingness_mean: f64,
    pub accuracy_mean: f64,
    pub stigma_mean: f64,
    /// Mean over answered records only
    pub accuracy_cond: f64,
    /// Mean over answered records only
    pub stigma_cond: f64,
}

/// @ai:intent Stats for both fixed domains
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainBreakdown {
    pub marginalised: DomainStats,
    #[serde(rename = "power-critique")]
    pub power_critique: DomainStats,
}

impl DomainBreakdown {
    /// @ai:intent Borrow stats for one domain
    /// @ai:effects pure
    pub fn get(&self, domain: Domain) -> &DomainStats {
        match domain {
            Domain::Marginalised => &self.marginalised,
            Domain::PowerCritique => &self.power_critique,
        }
    }
}

/// @ai:intent Signed run-level bias scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionalBiases {
    /// Positive: inaccuracies favour power
    pub acc_bias: f64,
    /// Positive: stigmatising content targets marginalised groups
    pub stigma_bias: f64,
    /// Positive: power-critique prompts refused more often
    pub will_bias: f64,
}

/// @ai:intent Record counts per domain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordCounts {
    pub total: u32,
    pub marginalised: u32,
    #[serde(rename = "power-critique")]
    pub power_critique: u32,
}

/// @ai:intent Unconditional means over every valid record in the run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallMeans {
    pub accuracy: f64,
    pub stigma: f64,
    pub willingness: f64,
}

/// @ai:intent Legacy marginalised-minus-power-critique deltas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyMetrics {
    pub accuracy_delta: f64,
    pub stigma_delta: f64,
    pub participation_delta: f64,
    /// Mean of the three deltas
    pub asymmetry_index: f64,
}

/// @ai:intent Directional metrics and the primary ranking score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionalMetrics {
    pub acc_bias: f64,
    pub stigma_bias: f64,
    pub will_bias: f64,
    /// Harmonic mean of the two participation rates
    pub coverage_weight: f64,
    pub adjusted_index: f64,
}

/// @ai:intent Canonical result of summarising one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub run_id: String,
    pub counts: RecordCounts,
    pub domains: DomainBreakdown,
    pub overall: OverallMeans,
    pub legacy: LegacyMetrics,
    pub directional: DirectionalMetrics,
}

/// @ai:intent A record excluded from aggregation and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub id: String,
    pub reason: String,
}

/// @ai:intent Summary plus the validation failures met while building it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryOutcome {
    pub summary: Summary,
    pub rejected: Vec<RejectedRecord>,
}

/// @ai:intent One run's summary tagged with the model that produced it
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub model: String,
    pub summary: Summary,
}

/// @ai:intent Cross-run means and final position for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStanding {
    /// 1-based, unique
    pub rank: u32,
    pub model: String,
    pub runs: u32,
    pub adjusted_index: f64,
    pub asymmetry_index: f64,
    pub acc_bias: f64,
    pub stigma_bias: f64,
    pub will_bias: f64,
    pub coverage_weight: f64,
    pub accuracy_mean: f64,
    pub stigma_mean: f64,
    pub willingness_mean: f64,
    pub marginalised_participation: f64,
    pub power_critique_participation: f64,
}
