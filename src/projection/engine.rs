//! Core projection engine for monthly strategy value series

use log::{debug, warn};

use crate::error::{AllocationWarning, ProjectionError};
use crate::input::{AllocationWeights, ProjectionInput, Strategy};
use crate::rates::{self, DAYS_PER_MONTH};

use super::blend;
use super::metrics;
use super::risk;
use super::series::{
    ChartPoint, ProjectionReport, SeriesPoint, StrategyFailure, StrategyResult,
};

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Number of steps in the chart-resolution series (points = steps + 1)
    pub chart_points: u32,

    /// Volatility floor used by the Sharpe-like ratio
    pub volatility_epsilon: f64,

    /// Override the risk-free proxy (percent for the period).
    /// If None, the period's accumulated inflation is used.
    pub risk_free_override: Option<f64>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            chart_points: 20,
            volatility_epsilon: risk::VOLATILITY_EPSILON,
            risk_free_override: None,
        }
    }
}

/// Main projection engine
///
/// Pure computation: every call builds fresh results from the supplied
/// input, so an engine can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Project a single base strategy.
    ///
    /// The diversified strategy needs allocation weights and has its own
    /// entry point, [`project_diversified`](Self::project_diversified).
    pub fn project_strategy(
        &self,
        input: &ProjectionInput,
        strategy: Strategy,
    ) -> Result<StrategyResult, ProjectionError> {
        if strategy == Strategy::Diversified {
            return Err(ProjectionError::MissingWeights);
        }
        input.validate_for(strategy)?;

        let series = monthly_series(input.period_days, |d| self.value_at(input, strategy, d));
        let final_value = self.value_at(input, strategy, input.period_days as f64);

        let result = self.build_result(strategy, input, series, final_value, input.capital);
        debug!(
            "{}: final value {:.2} over {} days",
            strategy, result.final_value, input.period_days
        );
        Ok(result)
    }

    /// Project the diversified blend from explicit allocation weights.
    ///
    /// Each leg runs from its own share of the capital; the blended series
    /// is the pointwise sum of the legs. Weights that do not sum to 100%
    /// still produce a blend plus a warning, never a silent
    /// re-normalization.
    pub fn project_diversified(
        &self,
        input: &ProjectionInput,
        weights: &AllocationWeights,
    ) -> Result<(StrategyResult, Option<AllocationWarning>), ProjectionError> {
        weights.validate()?;
        input.validate_common()?;
        let warning = blend::check_weights(weights);

        let mut legs: Vec<Vec<SeriesPoint>> = Vec::with_capacity(Strategy::BASE.len());
        let mut final_value = 0.0;
        for strategy in Strategy::BASE {
            let weight = weights.weight_for(strategy);
            if weight == 0.0 {
                continue;
            }
            let leg_input = input.with_capital(blend::sub_capital(input.capital, weight));
            let leg = self.project_strategy(&leg_input, strategy)?;
            final_value += leg.final_value;
            legs.push(leg.series);
        }

        let leg_refs: Vec<&[SeriesPoint]> = legs.iter().map(Vec::as_slice).collect();
        let series = blend::combine_series(&leg_refs);

        // With mismatched weights the deployed capital differs from the
        // input capital; metrics use what was actually deployed so the
        // series and the scalar returns stay consistent.
        let deployed = series.first().map(|p| p.value).unwrap_or(0.0);
        if deployed <= 0.0 {
            return Err(ProjectionError::InvalidCapital(deployed));
        }

        let result = self.build_result(Strategy::Diversified, input, series, final_value, deployed);
        Ok((result, warning))
    }

    /// Run every strategy for one input and rank the outcomes.
    ///
    /// Failures are isolated per strategy: an unusable FX quote fails the
    /// dollar strategies (and the blend that contains them) while the time
    /// deposit still completes.
    pub fn run(&self, input: &ProjectionInput, weights: &AllocationWeights) -> ProjectionReport {
        let mut results = Vec::with_capacity(4);
        let mut failures = Vec::new();

        for strategy in Strategy::BASE {
            match self.project_strategy(input, strategy) {
                Ok(result) => results.push(result),
                Err(err) => {
                    warn!("{strategy} failed: {err}");
                    failures.push(StrategyFailure {
                        strategy,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let allocation_warning = match self.project_diversified(input, weights) {
            Ok((result, warning)) => {
                results.push(result);
                warning
            }
            Err(err) => {
                warn!("{} failed: {err}", Strategy::Diversified);
                failures.push(StrategyFailure {
                    strategy: Strategy::Diversified,
                    reason: err.to_string(),
                });
                blend::check_weights(weights)
            }
        };

        let best_index = risk::best_index(&results);

        ProjectionReport {
            results,
            failures,
            best_index,
            allocation_warning,
        }
    }

    /// Day-sampled series for smooth charting (`period_days / chart_points`
    /// granularity). Chart resolution only; financial metrics always come
    /// from the exact-terminal-value path.
    pub fn chart_series(
        &self,
        input: &ProjectionInput,
        strategy: Strategy,
    ) -> Result<Vec<ChartPoint>, ProjectionError> {
        if strategy == Strategy::Diversified {
            return Err(ProjectionError::MissingWeights);
        }
        input.validate_for(strategy)?;
        Ok(chart_series(
            input.period_days,
            self.config.chart_points,
            |d| self.value_at(input, strategy, d),
        ))
    }

    /// Chart-resolution series for the diversified blend
    pub fn diversified_chart_series(
        &self,
        input: &ProjectionInput,
        weights: &AllocationWeights,
    ) -> Result<Vec<ChartPoint>, ProjectionError> {
        weights.validate()?;
        input.validate_common()?;

        let mut legs: Vec<Vec<ChartPoint>> = Vec::with_capacity(Strategy::BASE.len());
        for strategy in Strategy::BASE {
            let weight = weights.weight_for(strategy);
            if weight == 0.0 {
                continue;
            }
            let leg_input = input.with_capital(blend::sub_capital(input.capital, weight));
            legs.push(self.chart_series(&leg_input, strategy)?);
        }

        let leg_refs: Vec<&[ChartPoint]> = legs.iter().map(Vec::as_slice).collect();
        Ok(blend::combine_chart(&leg_refs))
    }

    /// Strategy value after `days` elapsed
    fn value_at(&self, input: &ProjectionInput, strategy: Strategy, days: f64) -> f64 {
        match strategy {
            // Simple-interest accrual per the TNA convention
            Strategy::FixedDeposit => {
                input.capital
                    + rates::simple_interest(input.capital, input.nominal_annual_rate_pct, days)
            }
            // Unit count is fixed at purchase; the peso value is the units
            // revalued at the devalued FX rate: units * fx(t), which equals
            // capital * (1 + dev)^months exactly.
            Strategy::UsdBlue | Strategy::UsdMep => {
                let months = days / DAYS_PER_MONTH;
                input.capital * rates::compound_factor(input.effective_devaluation_pct(), months)
            }
            // Blend values are sums of leg values; never valued directly
            Strategy::Diversified => 0.0,
        }
    }

    /// Assemble metrics for a completed series
    fn build_result(
        &self,
        strategy: Strategy,
        input: &ProjectionInput,
        series: Vec<SeriesPoint>,
        final_value: f64,
        capital_base: f64,
    ) -> StrategyResult {
        let months = input.months();

        let nominal_return_pct = metrics::nominal_return_pct(capital_base, final_value);
        let inflation_accumulated_pct =
            metrics::accumulated_inflation_pct(input.monthly_inflation_pct, months);
        let real_return_pct =
            metrics::real_return_pct(capital_base, final_value, inflation_accumulated_pct);
        let npv = metrics::npv(capital_base, final_value, input.monthly_inflation_pct, months);
        let monthly_irr_pct = metrics::monthly_irr_pct(capital_base, final_value, months);

        let volatility_pct = risk::volatility_pct(&series);
        let risk_free_pct = self
            .config
            .risk_free_override
            .unwrap_or(inflation_accumulated_pct);
        let sharpe_ratio = risk::sharpe_ratio(
            real_return_pct,
            risk_free_pct,
            volatility_pct,
            self.config.volatility_epsilon,
        );

        StrategyResult {
            strategy,
            series,
            final_value,
            nominal_return_pct,
            inflation_accumulated_pct,
            real_return_pct,
            npv,
            monthly_irr_pct,
            volatility_pct,
            sharpe_ratio,
        }
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}

/// Month-indexed series: one point per whole 30-day month plus month 0.
/// When the period is not a whole number of months, a final point is pinned
/// to the exact requested day under the next month index, so the last point
/// always equals the terminal value.
fn monthly_series(period_days: u32, value_at: impl Fn(f64) -> f64) -> Vec<SeriesPoint> {
    let whole_months = period_days / DAYS_PER_MONTH as u32;
    let mut series = Vec::with_capacity(whole_months as usize + 2);

    for month in 0..=whole_months {
        series.push(SeriesPoint {
            month_index: month,
            value: value_at((month * DAYS_PER_MONTH as u32) as f64),
        });
    }

    if period_days % DAYS_PER_MONTH as u32 != 0 {
        series.push(SeriesPoint {
            month_index: whole_months + 1,
            value: value_at(period_days as f64),
        });
    }

    series
}

/// Day-sampled series with `steps` even intervals across the period
fn chart_series(period_days: u32, steps: u32, value_at: impl Fn(f64) -> f64) -> Vec<ChartPoint> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|k| {
            let days_elapsed = period_days as f64 * k as f64 / steps as f64;
            ChartPoint {
                days_elapsed,
                value: value_at(days_elapsed),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_input() -> ProjectionInput {
        ProjectionInput {
            capital: 100_000.0,
            period_days: 90,
            monthly_inflation_pct: 4.0,
            monthly_devaluation_pct: 5.0,
            nominal_annual_rate_pct: 65.0,
            start_fx_rate: 1_000.0,
        }
    }

    fn engine() -> ProjectionEngine {
        ProjectionEngine::default()
    }

    #[test]
    fn test_fixed_deposit_simple_interest() {
        // 100000 at 65% TNA for 90 days: interest = 100000*0.65*90/365
        let result = engine()
            .project_strategy(&test_input(), Strategy::FixedDeposit)
            .unwrap();

        assert_relative_eq!(result.final_value, 116_027.397260, epsilon = 1e-4);
        assert_relative_eq!(result.nominal_return_pct, 16.027397, epsilon = 1e-4);
    }

    #[test]
    fn test_usd_hoarding_revalues_units() {
        // 1000 pesos at fx 1000 buys 1 USD; 5% monthly devaluation over
        // 3 months: fx(3) = 1000 * 1.05^3 = 1157.625
        let input = ProjectionInput {
            capital: 1_000.0,
            period_days: 90,
            monthly_inflation_pct: 0.0,
            monthly_devaluation_pct: 5.0,
            nominal_annual_rate_pct: 0.0,
            start_fx_rate: 1_000.0,
        };
        let result = engine().project_strategy(&input, Strategy::UsdBlue).unwrap();

        assert_relative_eq!(result.final_value, 1_157.625, epsilon = 1e-6);
    }

    #[test]
    fn test_series_starts_at_capital_and_ends_at_final() {
        let input = test_input();
        for strategy in Strategy::BASE {
            let result = engine().project_strategy(&input, strategy).unwrap();

            let first = result.series.first().unwrap();
            assert_eq!(first.month_index, 0);
            assert_relative_eq!(first.value, input.capital, max_relative = 1e-12);

            let last = result.series.last().unwrap();
            assert_eq!(last.value, result.final_value);
        }
    }

    #[test]
    fn test_partial_month_gets_final_point_at_exact_day() {
        let mut input = test_input();
        input.period_days = 100;

        let result = engine()
            .project_strategy(&input, Strategy::FixedDeposit)
            .unwrap();

        // Months 0..=3 plus the pinned final point
        assert_eq!(result.series.len(), 5);
        assert_eq!(result.series.last().unwrap().month_index, 4);
        let expected = 100_000.0 * (1.0 + 0.65 * 100.0 / 365.0);
        assert_relative_eq!(result.final_value, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_devaluation_floors_to_flat_fx() {
        let mut input = test_input();
        input.monthly_devaluation_pct = -3.0;

        let result = engine().project_strategy(&input, Strategy::UsdMep).unwrap();
        // Floored to 0: the dollar position never loses peso value
        assert_relative_eq!(result.final_value, input.capital, max_relative = 1e-12);
    }

    #[test]
    fn test_usd_constant_devaluation_has_zero_volatility() {
        let result = engine()
            .project_strategy(&test_input(), Strategy::UsdBlue)
            .unwrap();

        // Whole-month horizon, constant monthly change: sample stdev is 0
        // and the Sharpe denominator falls back to the epsilon floor
        assert_relative_eq!(result.volatility_pct, 0.0, epsilon = 1e-9);
        assert!(result.sharpe_ratio.is_finite());
    }

    #[test]
    fn test_fixed_deposit_declining_monthly_change() {
        // Simple interest grows linearly, so month-over-month percentage
        // changes decline and volatility is small but nonzero
        let mut input = test_input();
        input.period_days = 180;
        let result = engine()
            .project_strategy(&input, Strategy::FixedDeposit)
            .unwrap();
        assert!(result.volatility_pct > 0.0);
    }

    #[test]
    fn test_project_strategy_rejects_diversified() {
        let err = engine()
            .project_strategy(&test_input(), Strategy::Diversified)
            .unwrap_err();
        assert_eq!(err, ProjectionError::MissingWeights);
    }

    #[test]
    fn test_diversified_sums_sub_capital_legs() {
        let input = test_input();
        let weights = AllocationWeights {
            fixed_deposit: 50.0,
            usd_blue: 30.0,
            usd_mep: 20.0,
        };
        let (result, warning) = engine().project_diversified(&input, &weights).unwrap();
        assert!(warning.is_none());

        let e = engine();
        let fd = e
            .project_strategy(&input.with_capital(50_000.0), Strategy::FixedDeposit)
            .unwrap();
        let blue = e
            .project_strategy(&input.with_capital(30_000.0), Strategy::UsdBlue)
            .unwrap();
        let mep = e
            .project_strategy(&input.with_capital(20_000.0), Strategy::UsdMep)
            .unwrap();

        assert_relative_eq!(
            result.final_value,
            fd.final_value + blue.final_value + mep.final_value,
            max_relative = 1e-12
        );
        assert_relative_eq!(result.series[0].value, input.capital, max_relative = 1e-12);
    }

    #[test]
    fn test_unbalanced_weights_warn_and_compute_as_given() {
        let input = test_input();
        let weights = AllocationWeights {
            fixed_deposit: 50.0,
            usd_blue: 50.0,
            usd_mep: 50.0,
        };
        let (result, warning) = engine().project_diversified(&input, &weights).unwrap();

        let warning = warning.expect("sum 150 must warn");
        assert_relative_eq!(warning.weight_sum_pct, 150.0);
        // No re-normalization: 150% of the capital is deployed
        assert_relative_eq!(result.series[0].value, 150_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_run_isolates_fx_failure() {
        let mut input = test_input();
        input.start_fx_rate = 0.0;
        let report = engine().run(&input, &AllocationWeights::even());

        // Deposit completes; both dollar strategies and the blend fail
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].strategy, Strategy::FixedDeposit);
        assert_eq!(report.failures.len(), 3);
        assert_eq!(report.best().unwrap().strategy, Strategy::FixedDeposit);
    }

    #[test]
    fn test_run_ranks_by_real_return() {
        let input = test_input();
        let report = engine().run(&input, &AllocationWeights::even());

        assert_eq!(report.results.len(), 4);
        assert!(report.failures.is_empty());

        let ranked = report.ranked_by_real_return();
        for pair in ranked.windows(2) {
            assert!(pair[0].real_return_pct >= pair[1].real_return_pct);
        }
        assert_eq!(
            report.best().unwrap().strategy,
            ranked.first().unwrap().strategy
        );
    }

    #[test]
    fn test_run_is_idempotent() {
        let input = test_input();
        let weights = AllocationWeights::even();
        let first = engine().run(&input, &weights);
        let second = engine().run(&input, &weights);

        for (a, b) in first.results.iter().zip(&second.results) {
            assert_eq!(a.final_value, b.final_value);
            assert_eq!(a.real_return_pct, b.real_return_pct);
            assert_eq!(a.series, b.series);
        }
        assert_eq!(first.best_index, second.best_index);
    }

    #[test]
    fn test_chart_series_resolution_and_endpoints() {
        let input = test_input();
        let chart = engine()
            .chart_series(&input, Strategy::FixedDeposit)
            .unwrap();

        assert_eq!(chart.len(), 21);
        assert_relative_eq!(chart[0].days_elapsed, 0.0);
        assert_relative_eq!(chart[0].value, input.capital);
        assert_relative_eq!(chart.last().unwrap().days_elapsed, 90.0);

        // Chart endpoint agrees with the exact terminal value
        let result = engine()
            .project_strategy(&input, Strategy::FixedDeposit)
            .unwrap();
        assert_relative_eq!(chart.last().unwrap().value, result.final_value);
    }

    #[test]
    fn test_diversified_chart_matches_leg_sum() {
        let input = test_input();
        let weights = AllocationWeights {
            fixed_deposit: 60.0,
            usd_blue: 40.0,
            usd_mep: 0.0,
        };
        let chart = engine().diversified_chart_series(&input, &weights).unwrap();
        assert_eq!(chart.len(), 21);
        assert_relative_eq!(chart[0].value, input.capital, max_relative = 1e-12);
    }
}
