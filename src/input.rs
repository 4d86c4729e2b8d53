//! Projection input structures and per-strategy validation

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, RateKind};
use crate::rates::{self, DAYS_PER_MONTH};

/// Savings strategy being projected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Time deposit accruing simple interest at the nominal annual rate
    FixedDeposit,
    /// Hoarding USD bought at the informal ("blue") exchange rate
    UsdBlue,
    /// Hoarding USD bought through the stock-settled (MEP) exchange rate
    UsdMep,
    /// Capital-weighted blend of the three base strategies
    Diversified,
}

impl Strategy {
    /// All base strategies, in ranking-tiebreak order
    pub const BASE: [Strategy; 3] = [Strategy::FixedDeposit, Strategy::UsdBlue, Strategy::UsdMep];

    /// Stable identifier used in CSV/JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::FixedDeposit => "fixed_deposit",
            Strategy::UsdBlue => "usd_blue",
            Strategy::UsdMep => "usd_mep",
            Strategy::Diversified => "diversified",
        }
    }

}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete input for one projection run
///
/// All rates are percentages already resolved by the caller (the engine
/// performs no fetching). USD-blue and USD-MEP differ only by the quote the
/// caller resolves into `start_fx_rate` / `monthly_devaluation_pct`; a single
/// input applies the same pair to both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Capital to invest, in local currency units
    pub capital: f64,

    /// Holding period in days
    pub period_days: u32,

    /// Monthly inflation rate (percent)
    pub monthly_inflation_pct: f64,

    /// Monthly devaluation of the local currency against USD (percent).
    /// Negative values (appreciation) are floored to 0 during projection.
    pub monthly_devaluation_pct: f64,

    /// Nominal annual rate (TNA) for the time deposit (percent)
    pub nominal_annual_rate_pct: f64,

    /// FX rate at the start of the period (local currency per USD)
    pub start_fx_rate: f64,
}

impl ProjectionInput {
    /// Holding period expressed in fractional 30-day months
    pub fn months(&self) -> f64 {
        self.period_days as f64 / DAYS_PER_MONTH
    }

    /// Devaluation with the zero floor applied.
    ///
    /// A negative monthly devaluation (peso appreciation) is not an input
    /// error; it is clamped after derivation so FX-based strategies never
    /// project a strengthening peso.
    pub fn effective_devaluation_pct(&self) -> f64 {
        rates::floor_devaluation(self.monthly_devaluation_pct)
    }

    /// Validate the fields every strategy depends on
    pub fn validate_common(&self) -> Result<(), ProjectionError> {
        if self.capital <= 0.0 || !self.capital.is_finite() {
            return Err(ProjectionError::InvalidCapital(self.capital));
        }
        if self.period_days == 0 {
            return Err(ProjectionError::InvalidPeriod);
        }
        if self.monthly_inflation_pct < 0.0 {
            return Err(ProjectionError::NegativeRate {
                kind: RateKind::Inflation,
                value: self.monthly_inflation_pct,
            });
        }
        Ok(())
    }

    /// Validate for a specific strategy.
    ///
    /// Failures are per-strategy: an unusable FX quote must not prevent the
    /// time deposit from projecting, and vice versa.
    pub fn validate_for(&self, strategy: Strategy) -> Result<(), ProjectionError> {
        self.validate_common()?;

        match strategy {
            Strategy::FixedDeposit => {
                if self.nominal_annual_rate_pct < 0.0 {
                    return Err(ProjectionError::NegativeRate {
                        kind: RateKind::NominalAnnual,
                        value: self.nominal_annual_rate_pct,
                    });
                }
            }
            Strategy::UsdBlue | Strategy::UsdMep => {
                if self.start_fx_rate <= 0.0 || !self.start_fx_rate.is_finite() {
                    return Err(ProjectionError::InvalidFxRate(self.start_fx_rate));
                }
            }
            Strategy::Diversified => {
                // The blend touches every instrument; each leg re-validates
                // with its own sub-capital, so only common checks apply here.
            }
        }

        Ok(())
    }

    /// Copy of this input with a different capital (used for blend legs)
    pub fn with_capital(&self, capital: f64) -> Self {
        Self { capital, ..self.clone() }
    }
}

/// Allocation of capital across the three base strategies, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationWeights {
    /// Share allocated to the time deposit
    pub fixed_deposit: f64,

    /// Share allocated to USD-blue hoarding
    pub usd_blue: f64,

    /// Share allocated to USD-MEP hoarding
    pub usd_mep: f64,
}

impl AllocationWeights {
    /// Even three-way split
    pub fn even() -> Self {
        Self {
            fixed_deposit: 100.0 / 3.0,
            usd_blue: 100.0 / 3.0,
            usd_mep: 100.0 / 3.0,
        }
    }

    /// Sum of the three weights
    pub fn sum(&self) -> f64 {
        self.fixed_deposit + self.usd_blue + self.usd_mep
    }

    /// Whether the weights sum to 100% (within floating-point noise)
    pub fn is_balanced(&self) -> bool {
        (self.sum() - 100.0).abs() < 1e-6
    }

    /// Weight for a given base strategy
    pub fn weight_for(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::FixedDeposit => self.fixed_deposit,
            Strategy::UsdBlue => self.usd_blue,
            Strategy::UsdMep => self.usd_mep,
            Strategy::Diversified => 100.0,
        }
    }

    /// Reject negative weights. Weights not summing to 100 are NOT an error
    /// here; that state is reported separately as a warning so the blend can
    /// still be computed as given.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        for (leg, value) in [
            ("fixed_deposit", self.fixed_deposit),
            ("usd_blue", self.usd_blue),
            ("usd_mep", self.usd_mep),
        ] {
            if value < 0.0 {
                return Err(ProjectionError::NegativeWeight { leg, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> ProjectionInput {
        ProjectionInput {
            capital: 100_000.0,
            period_days: 90,
            monthly_inflation_pct: 4.0,
            monthly_devaluation_pct: 3.0,
            nominal_annual_rate_pct: 65.0,
            start_fx_rate: 1_000.0,
        }
    }

    #[test]
    fn test_valid_input_passes_all_strategies() {
        let input = base_input();
        for strategy in [
            Strategy::FixedDeposit,
            Strategy::UsdBlue,
            Strategy::UsdMep,
            Strategy::Diversified,
        ] {
            assert!(input.validate_for(strategy).is_ok());
        }
    }

    #[test]
    fn test_non_positive_capital_rejected() {
        let mut input = base_input();
        input.capital = 0.0;
        assert!(matches!(
            input.validate_for(Strategy::FixedDeposit),
            Err(ProjectionError::InvalidCapital(_))
        ));
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut input = base_input();
        input.period_days = 0;
        assert!(matches!(
            input.validate_for(Strategy::UsdBlue),
            Err(ProjectionError::InvalidPeriod)
        ));
    }

    #[test]
    fn test_bad_fx_only_fails_fx_strategies() {
        let mut input = base_input();
        input.start_fx_rate = 0.0;

        assert!(input.validate_for(Strategy::FixedDeposit).is_ok());
        assert!(matches!(
            input.validate_for(Strategy::UsdBlue),
            Err(ProjectionError::InvalidFxRate(_))
        ));
        assert!(matches!(
            input.validate_for(Strategy::UsdMep),
            Err(ProjectionError::InvalidFxRate(_))
        ));
    }

    #[test]
    fn test_negative_devaluation_is_floored_not_rejected() {
        let mut input = base_input();
        input.monthly_devaluation_pct = -2.5;

        assert!(input.validate_for(Strategy::UsdBlue).is_ok());
        assert_eq!(input.effective_devaluation_pct(), 0.0);
    }

    #[test]
    fn test_negative_inflation_rejected() {
        let mut input = base_input();
        input.monthly_inflation_pct = -1.0;
        assert!(matches!(
            input.validate_for(Strategy::FixedDeposit),
            Err(ProjectionError::NegativeRate { .. })
        ));
    }

    #[test]
    fn test_fractional_months() {
        let mut input = base_input();
        input.period_days = 45;
        assert!((input.months() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_weights_sum_and_balance() {
        let weights = AllocationWeights {
            fixed_deposit: 50.0,
            usd_blue: 30.0,
            usd_mep: 20.0,
        };
        assert!(weights.is_balanced());
        assert!(weights.validate().is_ok());

        let unbalanced = AllocationWeights {
            fixed_deposit: 50.0,
            usd_blue: 50.0,
            usd_mep: 50.0,
        };
        assert!(!unbalanced.is_balanced());
        // Not an error: surfaced as a warning by the blender instead
        assert!(unbalanced.validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = AllocationWeights {
            fixed_deposit: -10.0,
            usd_blue: 60.0,
            usd_mep: 50.0,
        };
        assert!(matches!(
            weights.validate(),
            Err(ProjectionError::NegativeWeight { leg: "fixed_deposit", .. })
        ));
    }
}
