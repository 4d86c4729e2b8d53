//! Return metrics derived from a projected series
//!
//! All metrics are pure functions of (capital, final value, macro rates);
//! expected numeric edge cases (zero months, non-positive final value) are
//! handled with degenerate values or `None`, never a panic.

use crate::rates;

/// Nominal return over the period, in percent
pub fn nominal_return_pct(capital: f64, final_value: f64) -> f64 {
    (final_value - capital) / capital * 100.0
}

/// Inflation accumulated over (possibly fractional) `months`, in percent.
///
/// Geometric: each period compounds on the previous accumulated base. The
/// fractional tail compounds at the same monthly rate.
pub fn accumulated_inflation_pct(monthly_inflation_pct: f64, months: f64) -> f64 {
    rates::accumulated_pct(monthly_inflation_pct, months)
}

/// Inflation-adjusted return, in percent.
///
/// Measured against the inflation-updated cost basis: the final value is
/// compared to what the capital would need to be worth just to keep pace
/// with inflation. This differs from (nominal - inflation) and is the
/// authoritative definition here.
pub fn real_return_pct(capital: f64, final_value: f64, inflation_accumulated_pct: f64) -> f64 {
    let adjusted_basis = capital * (1.0 + inflation_accumulated_pct / 100.0);
    (final_value - adjusted_basis) / adjusted_basis * 100.0
}

/// Present value of the single terminal cash flow discounted at the monthly
/// inflation rate, minus the capital. Positive NPV signals a real gain.
///
/// `None` when the final value is non-positive (metric undefined; the
/// strategy is flagged as not rankable).
pub fn npv(
    capital: f64,
    final_value: f64,
    monthly_inflation_pct: f64,
    months: f64,
) -> Option<f64> {
    if final_value <= 0.0 {
        return None;
    }
    let discount = rates::compound_factor(monthly_inflation_pct, months);
    Some(final_value / discount - capital)
}

/// Constant monthly rate solving `capital * (1+r)^months = final_value`,
/// in percent.
///
/// Zero months is a degenerate case returning 0%, not an error. A
/// non-positive final value has no defined IRR and returns `None`.
pub fn monthly_irr_pct(capital: f64, final_value: f64, months: f64) -> Option<f64> {
    if final_value <= 0.0 {
        return None;
    }
    if months == 0.0 {
        return Some(0.0);
    }
    Some(((final_value / capital).powf(1.0 / months) - 1.0) * 100.0)
}
