//! Rate normalization helpers
//!
//! Two conventions coexist and must not be mixed:
//! - TNA (tasa nominal anual) accrues simple interest proportional to elapsed
//!   days over 365, the standard time-deposit convention.
//! - Macro series (inflation, devaluation) are monthly percentages applied by
//!   geometric compounding, never by simple summation.

use crate::error::{ProjectionError, RateKind};

/// Days per month used for month-indexed sampling and fractional-month math
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Days per year used for simple-interest (TNA) accrual
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Unit of the percentage handed to [`monthly_fraction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodUnit {
    /// Nominal annual (TNA): divided by 12, no compounding
    Annual,
    /// Already a monthly percentage
    Monthly,
}

/// Convert a percentage to a monthly decimal fraction.
///
/// A TNA of 120% yields 0.10 (10% per month, simple). A monthly 4% yields
/// 0.04. Zero maps to zero (identity growth). Negative rates are rejected;
/// devaluation never reaches this function negative because it is floored
/// upstream.
pub fn monthly_fraction(pct: f64, unit: PeriodUnit) -> Result<f64, ProjectionError> {
    if pct < 0.0 {
        let kind = match unit {
            PeriodUnit::Annual => RateKind::NominalAnnual,
            PeriodUnit::Monthly => RateKind::Monthly,
        };
        return Err(ProjectionError::NegativeRate { kind, value: pct });
    }

    let fraction = match unit {
        PeriodUnit::Annual => pct / 100.0 / 12.0,
        PeriodUnit::Monthly => pct / 100.0,
    };
    Ok(fraction)
}

/// Simple interest earned on `capital` at `annual_pct` TNA over `days`.
///
/// `capital * TNA/100 * days/365`, the amount a bank quotes for a time
/// deposit held `days` days.
pub fn simple_interest(capital: f64, annual_pct: f64, days: f64) -> f64 {
    capital * annual_pct / 100.0 * days / DAYS_PER_YEAR
}

/// Geometric growth factor for a monthly percentage over (possibly
/// fractional) `months`: `(1 + pct/100)^months`.
///
/// The fractional tail of a period compounds at the same monthly rate, so a
/// 45-day horizon uses an exponent of 1.5. Zero rate gives the identity
/// factor for any horizon.
pub fn compound_factor(monthly_pct: f64, months: f64) -> f64 {
    (1.0 + monthly_pct / 100.0).powf(months)
}

/// Accumulated percentage after compounding `monthly_pct` over `months`
pub fn accumulated_pct(monthly_pct: f64, months: f64) -> f64 {
    (compound_factor(monthly_pct, months) - 1.0) * 100.0
}

/// Devaluation floor: a strengthening peso (negative devaluation) projects
/// as a flat FX rate, never as a validation error.
pub fn floor_devaluation(monthly_pct: f64) -> f64 {
    monthly_pct.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tna_to_monthly_fraction() {
        let monthly = monthly_fraction(120.0, PeriodUnit::Annual).unwrap();
        assert!((monthly - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_monthly_pct_passthrough() {
        let monthly = monthly_fraction(4.0, PeriodUnit::Monthly).unwrap();
        assert!((monthly - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_zero_rate_identity() {
        assert_eq!(monthly_fraction(0.0, PeriodUnit::Annual).unwrap(), 0.0);
        assert_eq!(compound_factor(0.0, 7.5), 1.0);
        assert_eq!(accumulated_pct(0.0, 12.0), 0.0);
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(monthly_fraction(-1.0, PeriodUnit::Annual).is_err());
        assert!(monthly_fraction(-0.5, PeriodUnit::Monthly).is_err());
    }

    #[test]
    fn test_simple_interest_90_days() {
        // 100000 at 65% TNA for 90 days: 100000 * 0.65 * 90/365
        let interest = simple_interest(100_000.0, 65.0, 90.0);
        assert!((interest - 16_027.397260).abs() < 1e-4);
    }

    #[test]
    fn test_compounding_is_geometric_not_additive() {
        // 2% monthly over 12 months accumulates ~26.82%, not 24%
        let accumulated = accumulated_pct(2.0, 12.0);
        assert!((accumulated - 26.824).abs() < 0.01);
        assert!(accumulated > 24.0);
    }

    #[test]
    fn test_fractional_month_compounding() {
        let factor = compound_factor(5.0, 1.5);
        assert!((factor - 1.05_f64.powf(1.5)).abs() < 1e-12);
    }

    #[test]
    fn test_devaluation_floor() {
        assert_eq!(floor_devaluation(-2.5), 0.0);
        assert_eq!(floor_devaluation(3.0), 3.0);
    }
}
