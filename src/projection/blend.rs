//! Portfolio blending for the diversified strategy
//!
//! Each leg is projected from its own share of the capital
//! (`capital * weight/100`) and the blended series is the pointwise sum of
//! the leg series. Scaling a full-capital series after the fact would give
//! slightly different rounding/compounding; the sub-capital path is the
//! authoritative one.

use log::warn;

use crate::error::AllocationWarning;
use crate::input::AllocationWeights;

use super::series::{ChartPoint, SeriesPoint};

/// Capital assigned to one leg of the blend
pub fn sub_capital(capital: f64, weight_pct: f64) -> f64 {
    capital * weight_pct / 100.0
}

/// Pointwise sum of aligned monthly leg series.
///
/// Legs projected from the same period share the same month grid; the blend
/// is truncated to the shortest leg if they ever disagree.
pub fn combine_series(legs: &[&[SeriesPoint]]) -> Vec<SeriesPoint> {
    let len = legs.iter().map(|leg| leg.len()).min().unwrap_or(0);

    (0..len)
        .map(|i| SeriesPoint {
            month_index: legs[0][i].month_index,
            value: legs.iter().map(|leg| leg[i].value).sum(),
        })
        .collect()
}

/// Pointwise sum of aligned chart-resolution leg series
pub fn combine_chart(legs: &[&[ChartPoint]]) -> Vec<ChartPoint> {
    let len = legs.iter().map(|leg| leg.len()).min().unwrap_or(0);

    (0..len)
        .map(|i| ChartPoint {
            days_elapsed: legs[0][i].days_elapsed,
            value: legs.iter().map(|leg| leg[i].value).sum(),
        })
        .collect()
}

/// Check the weight sum, producing a warning when it is not 100%.
///
/// The blend is never re-normalized: it is computed from the weights as
/// given so the caller can show the discrepancy to the user.
pub fn check_weights(weights: &AllocationWeights) -> Option<AllocationWarning> {
    if weights.is_balanced() {
        return None;
    }

    let warning = AllocationWarning {
        weight_sum_pct: weights.sum(),
    };
    warn!("{warning}");
    Some(warning)
}
