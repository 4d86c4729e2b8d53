//! Investment Projector - Multi-strategy savings projection engine
//!
//! This library provides:
//! - Month-by-month value projections for peso time deposits (simple-interest
//!   TNA accrual) and USD hoarding at blue/MEP quotes (geometric devaluation)
//! - Capital-weighted blending of strategies with explicit allocation weights
//! - Return metrics per strategy: nominal, inflation-adjusted real return,
//!   NPV, monthly IRR
//! - Risk scoring (volatility proxy, Sharpe-like ratio) and strategy ranking
//! - Batch scenario runs for macro sensitivity sweeps

pub mod error;
pub mod input;
pub mod projection;
pub mod rates;
pub mod scenario;

// Re-export commonly used types
pub use error::{AllocationWarning, ProjectionError};
pub use input::{AllocationWeights, ProjectionInput, Strategy};
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionReport, StrategyResult};
pub use scenario::{MacroShock, ScenarioRunner};
