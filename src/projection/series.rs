//! Series and result structures for strategy projections

use serde::{Deserialize, Serialize};

use crate::error::AllocationWarning;
use crate::input::Strategy;

/// One month-indexed point of a strategy's value series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Elapsed whole months since the start (0 = initial capital).
    /// When the period is not a whole number of months, the last point
    /// carries the next index but is valued at the exact final day.
    pub month_index: u32,

    /// Strategy value in local currency at this point
    pub value: f64,
}

/// One day-sampled point of the chart-resolution series.
///
/// Chart sampling is evenly spaced in elapsed days (`period_days / N` steps)
/// for smooth plotting; it never feeds the financial metrics, which are
/// computed at exactly `period_days`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Elapsed days since the start
    pub days_elapsed: f64,

    /// Strategy value in local currency at this point
    pub value: f64,
}

/// Full result for one projected strategy.
///
/// Immutable after computation; a fresh set is produced per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    /// Which strategy this result belongs to
    pub strategy: Strategy,

    /// Month-indexed value series, starting at (0, capital)
    pub series: Vec<SeriesPoint>,

    /// Value at exactly `period_days`
    pub final_value: f64,

    /// (final - capital) / capital, in percent
    pub nominal_return_pct: f64,

    /// Inflation accumulated over the period (geometric), in percent
    pub inflation_accumulated_pct: f64,

    /// Return measured against the inflation-updated cost basis, in percent
    pub real_return_pct: f64,

    /// Present value of the terminal cash flow discounted at the monthly
    /// inflation rate, minus capital. `None` when not computable.
    pub npv: Option<f64>,

    /// Constant monthly rate reconciling capital with final value, in
    /// percent. `None` when not computable (non-positive final value).
    pub monthly_irr_pct: Option<f64>,

    /// Sample stdev of month-over-month percentage changes, in percent
    pub volatility_pct: f64,

    /// Excess-of-inflation return per unit of volatility
    pub sharpe_ratio: f64,
}

impl StrategyResult {
    /// Whether this result may participate in "best strategy" ranking.
    ///
    /// A non-positive final value leaves IRR/NPV undefined; the rest of the
    /// result is still reported, but it is excluded from ranking.
    pub fn is_rankable(&self) -> bool {
        self.final_value > 0.0 && self.monthly_irr_pct.is_some()
    }
}

/// A strategy that could not be projected, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyFailure {
    pub strategy: Strategy,
    pub reason: String,
}

/// Output of a full engine run across all strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionReport {
    /// Completed strategy results, in projection order
    pub results: Vec<StrategyResult>,

    /// Strategies that failed validation, isolated from the rest
    pub failures: Vec<StrategyFailure>,

    /// Index into `results` of the best rankable strategy by real return
    pub best_index: Option<usize>,

    /// Present when allocation weights did not sum to 100%
    pub allocation_warning: Option<AllocationWarning>,
}

impl ProjectionReport {
    /// Best strategy by real return, if any completed and is rankable
    pub fn best(&self) -> Option<&StrategyResult> {
        self.best_index.and_then(|i| self.results.get(i))
    }

    /// Result for a specific strategy, if it completed
    pub fn result_for(&self, strategy: Strategy) -> Option<&StrategyResult> {
        self.results.iter().find(|r| r.strategy == strategy)
    }

    /// Results ordered by real return, best first (stable on ties).
    /// Non-rankable results sort last.
    pub fn ranked_by_real_return(&self) -> Vec<&StrategyResult> {
        crate::projection::risk::rank_by_real_return(&self.results)
            .into_iter()
            .map(|i| &self.results[i])
            .collect()
    }

    /// Results ordered by Sharpe-like ratio, best first (stable on ties).
    /// Computed from the same result set, no re-projection.
    pub fn ranked_by_sharpe(&self) -> Vec<&StrategyResult> {
        crate::projection::risk::rank_by_sharpe(&self.results)
            .into_iter()
            .map(|i| &self.results[i])
            .collect()
    }
}
