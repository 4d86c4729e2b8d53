//! Scenario runner for batch projections and macro sensitivity sweeps
//!
//! Pre-builds an engine once, then runs many independent projections with
//! different inputs or shocked macro assumptions. Every run is pure, so
//! callers may parallelize batches freely.

use serde::{Deserialize, Serialize};

use crate::input::{AllocationWeights, ProjectionInput};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionReport};

/// A named shift applied to the macro assumptions of a base input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroShock {
    /// Label for reporting ("inflation +2", "crawling peg ends", ...)
    pub name: String,

    /// Added to the monthly inflation rate (percentage points)
    #[serde(default)]
    pub inflation_delta_pct: f64,

    /// Added to the monthly devaluation rate (percentage points)
    #[serde(default)]
    pub devaluation_delta_pct: f64,

    /// Added to the nominal annual rate (percentage points)
    #[serde(default)]
    pub rate_delta_pct: f64,
}

impl MacroShock {
    /// Base input with the shock applied.
    ///
    /// Shocked rates may leave the valid range (e.g. inflation pushed
    /// negative); the run then reports per-strategy validation failures
    /// rather than silently clamping.
    pub fn apply(&self, base: &ProjectionInput) -> ProjectionInput {
        ProjectionInput {
            monthly_inflation_pct: base.monthly_inflation_pct + self.inflation_delta_pct,
            monthly_devaluation_pct: base.monthly_devaluation_pct + self.devaluation_delta_pct,
            nominal_annual_rate_pct: base.nominal_annual_rate_pct + self.rate_delta_pct,
            ..base.clone()
        }
    }
}

/// Pre-built runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// for shock in &shocks {
///     let report = runner.run(&shock.apply(&base), &weights);
/// }
/// ```
#[derive(Debug, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Runner with the default projection config
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner with a specific projection config
    pub fn with_config(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    /// Run a single projection
    pub fn run(&self, input: &ProjectionInput, weights: &AllocationWeights) -> ProjectionReport {
        self.engine.run(input, weights)
    }

    /// Run projections for many independent inputs with the same weights
    pub fn run_batch(
        &self,
        inputs: &[ProjectionInput],
        weights: &AllocationWeights,
    ) -> Vec<ProjectionReport> {
        inputs.iter().map(|input| self.run(input, weights)).collect()
    }

    /// Run a base input under a list of macro shocks, one report per shock
    pub fn run_scenarios(
        &self,
        base: &ProjectionInput,
        weights: &AllocationWeights,
        shocks: &[MacroShock],
    ) -> Vec<ProjectionReport> {
        shocks
            .iter()
            .map(|shock| self.run(&shock.apply(base), weights))
            .collect()
    }

    /// Access to the underlying engine (for chart series, single strategies)
    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }
}
