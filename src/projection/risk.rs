//! Volatility proxy, Sharpe-like scoring, and strategy ranking
//!
//! The volatility proxy is the sample standard deviation of month-over-month
//! percentage changes, and the risk-free proxy defaults to the period's
//! accumulated inflation. Both are pragmatic approximations carried over from
//! the product's methodology, not textbook conventions.

use super::series::{SeriesPoint, StrategyResult};

/// Epsilon used in place of zero volatility when computing the Sharpe-like
/// ratio, so a perfectly smooth series never divides by zero.
pub const VOLATILITY_EPSILON: f64 = 0.01;

/// Sample standard deviation of month-over-month percentage changes, in
/// percent.
///
/// Divides by n-1; series with fewer than two changes (fewer than three
/// points) report 0.
pub fn volatility_pct(series: &[SeriesPoint]) -> f64 {
    let changes: Vec<f64> = series
        .windows(2)
        .filter(|w| w[0].value != 0.0)
        .map(|w| (w[1].value - w[0].value) / w[0].value * 100.0)
        .collect();

    if changes.len() < 2 {
        return 0.0;
    }

    let mean = changes.iter().sum::<f64>() / changes.len() as f64;
    let variance = changes
        .iter()
        .map(|c| (c - mean).powi(2))
        .sum::<f64>()
        / (changes.len() - 1) as f64;

    variance.sqrt()
}

/// Excess-of-inflation return per unit of volatility.
///
/// `epsilon` replaces volatilities below it so the ratio stays finite for
/// flat series.
pub fn sharpe_ratio(
    real_return_pct: f64,
    risk_free_pct: f64,
    volatility_pct: f64,
    epsilon: f64,
) -> f64 {
    (real_return_pct - risk_free_pct) / volatility_pct.max(epsilon)
}

/// Indices of `results` ordered by real return, best first.
///
/// The sort is stable, so strategies with equal real return keep their input
/// order across repeated runs. Non-rankable results (undefined IRR) sort
/// last, also in input order.
pub fn rank_by_real_return(results: &[StrategyResult]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..results.len()).collect();
    order.sort_by(|&a, &b| {
        rank_key(&results[b])
            .partial_cmp(&rank_key(&results[a]))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

/// Indices of `results` ordered by Sharpe-like ratio, best first.
///
/// Computable from the same result set as [`rank_by_real_return`] without
/// re-projection.
pub fn rank_by_sharpe(results: &[StrategyResult]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..results.len()).collect();
    order.sort_by(|&a, &b| {
        let key = |r: &StrategyResult| (r.is_rankable(), r.sharpe_ratio);
        key(&results[b])
            .partial_cmp(&key(&results[a]))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

/// Index of the best rankable strategy by real return, if any
pub fn best_index(results: &[StrategyResult]) -> Option<usize> {
    rank_by_real_return(results)
        .into_iter()
        .find(|&i| results[i].is_rankable())
}

fn rank_key(result: &StrategyResult) -> (bool, f64) {
    (result.is_rankable(), result.real_return_pct)
}
