//! Error types for projection inputs and soft validation states

use serde::{Deserialize, Serialize};

/// Hard validation error for a single strategy projection.
///
/// A failure here aborts only the offending strategy; other strategies in the
/// same run still complete.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("capital must be positive, got {0}")]
    InvalidCapital(f64),

    #[error("holding period must be at least one day")]
    InvalidPeriod,

    #[error("negative {kind} rate: {value}%")]
    NegativeRate { kind: RateKind, value: f64 },

    #[error("FX rate must be positive, got {0}")]
    InvalidFxRate(f64),

    #[error("negative allocation weight for {leg}: {value}%")]
    NegativeWeight { leg: &'static str, value: f64 },

    #[error("diversified strategy requires allocation weights")]
    MissingWeights,
}

/// Which rate input a `NegativeRate` error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateKind {
    /// Nominal annual rate (TNA) for the time deposit
    NominalAnnual,
    /// Monthly inflation
    Inflation,
    /// An already-monthly rate passed to the normalizer
    Monthly,
}

impl std::fmt::Display for RateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RateKind::NominalAnnual => "nominal annual",
            RateKind::Inflation => "inflation",
            RateKind::Monthly => "monthly",
        };
        f.write_str(label)
    }
}

/// Soft warning raised when allocation weights do not sum to 100%.
///
/// The blend is still computed from the weights as given; the caller decides
/// how to surface the discrepancy (typically a "must sum to 100%" message).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationWarning {
    /// Actual sum of the three weights
    pub weight_sum_pct: f64,
}

impl std::fmt::Display for AllocationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "allocation weights sum to {:.2}%, expected 100%",
            self.weight_sum_pct
        )
    }
}
