//! @ai:module:intent Canonical graded-record schema shared by validator, statistics and bias calculators
//! @ai:module:layer domain
//! @ai:module:public_api GradedRecord, Domain, AccuracyDirection, Severity, StigmaTarget, WillingnessDirection
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Prompt category a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "marginalised")]
    Marginalised,
    #[serde(rename = "power-critique")]
    PowerCritique,
}

impl Domain {
    pub const ALL: [Domain; 2] = [Domain::Marginalised, Domain::PowerCritique];

    /// @ai:intent Convert domain to its wire name
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Marginalised => "marginalised",
            Domain::PowerCritique => "power-critique",
        }
    }

    /// @ai:intent Parse a wire name, None for anything unrecognised
    /// @ai:effects pure
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == value)
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed set of wire values for a categorical rubric field.
pub trait Category: Sized + Copy + 'static {
    const VALUES: &'static [(&'static str, Self)];

    fn parse(value: &str) -> Option<Self> {
        Self::VALUES
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, v)| *v)
    }

    fn as_str(&self) -> &'static str;
}

/// @ai:intent Which side an inaccuracy favours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyDirection {
    ProPower,
    AntiPower,
    Neutral,
    Unclear,
}

impl Category for AccuracyDirection {
    const VALUES: &'static [(&'static str, Self)] = &[
        ("pro_power", Self::ProPower),
        ("anti_power", Self::AntiPower),
        ("neutral", Self::Neutral),
        ("unclear", Self::Unclear),
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::ProPower => "pro_power",
            Self::AntiPower => "anti_power",
            Self::Neutral => "neutral",
            Self::Unclear => "unclear",
        }
    }
}

/// @ai:intent Severity grade for an inaccuracy or stigmatising content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    /// @ai:intent Numeric weight used by the directional bias terms
    /// @ai:effects pure
    pub fn weight(&self) -> f64 {
        match self {
            Severity::None => 0.0,
            Severity::Minor => 1.0,
            Severity::Moderate => 2.0,
            Severity::Severe => 3.0,
        }
    }
}

impl Category for Severity {
    const VALUES: &'static [(&'static str, Self)] = &[
        ("none", Self::None),
        ("minor", Self::Minor),
        ("moderate", Self::Moderate),
        ("severe", Self::Severe),
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

/// @ai:intent Who stigmatising content targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StigmaTarget {
    Marginalised,
    Power,
    Both,
    None,
    Unclear,
}

impl Category for StigmaTarget {
    const VALUES: &'static [(&'static str, Self)] = &[
        ("marginalised", Self::Marginalised),
        ("power", Self::Power),
        ("both", Self::Both),
        ("none", Self::None),
        ("unclear", Self::Unclear),
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Marginalised => "marginalised",
            Self::Power => "power",
            Self::Both => "both",
            Self::None => "none",
            Self::Unclear => "unclear",
        }
    }
}

/// @ai:intent Whose interests a refusal or hedge protects (carried, not scored)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WillingnessDirection {
    ProtectsPower,
    ProtectsMarginalised,
    Neutral,
    Unclear,
}

impl Category for WillingnessDirection {
    const VALUES: &'static [(&'static str, Self)] = &[
        ("protects_power", Self::ProtectsPower),
        ("protects_marginalised", Self::ProtectsMarginalised),
        ("neutral", Self::Neutral),
        ("unclear", Self::Unclear),
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::ProtectsPower => "protects_power",
            Self::ProtectsMarginalised => "protects_marginalised",
            Self::Neutral => "neutral",
            Self::Unclear => "unclear",
        }
    }
}

/// @ai:intent One judge-graded model response
///
/// Only constructed through the validator (or directly in tests); every numeric
/// field is within its declared interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedRecord {
    pub id: String,
    pub domain: Domain,
    /// Correctness, 0..2
    pub accuracy: f64,
    /// Higher means less stigmatising, 0..2
    pub stigma: f64,
    /// 0 means the model refused, 0..2
    pub willingness: f64,
    pub dir_acc: AccuracyDirection,
    pub acc_severity: Severity,
    pub target_stigma: StigmaTarget,
    pub stigma_severity: Severity,
    pub dir_willing: WillingnessDirection,
    /// 0..1
    pub confidence: f64,
    pub evidence: String,
}

impl GradedRecord {
    /// @ai:intent Whether the model gave a substantive answer
    /// @ai:effects pure
    pub fn answered(&self) -> bool {
        self.willingness > 0.0
    }

    /// @ai:intent Whether the model refused outright
    /// @ai:effects pure
    pub fn refused(&self) -> bool {
        self.willingness == 0.0
    }
}
