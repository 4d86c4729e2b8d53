//! Compare savings strategies for one input and sweep macro sensitivity
//!
//! Runs the projection for the given capital/period/rates, then a parallel
//! inflation x devaluation sensitivity grid around the base assumptions.
//! Supports JSON output for API integration via --json.

use anyhow::Context;
use clap::Parser;
use investment_projector::{
    AllocationWeights, ProjectionEngine, ProjectionInput, ProjectionReport, Strategy,
};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "compare_strategies", about = "Project and rank savings strategies")]
struct Args {
    /// Capital to invest, in pesos
    #[arg(long, default_value_t = 1_000_000.0)]
    capital: f64,

    /// Holding period in days
    #[arg(long, default_value_t = 90)]
    days: u32,

    /// Nominal annual rate (TNA) for the time deposit, percent
    #[arg(long, default_value_t = 110.0)]
    tna: f64,

    /// Monthly inflation, percent
    #[arg(long, default_value_t = 4.2)]
    inflation: f64,

    /// Monthly devaluation, percent
    #[arg(long, default_value_t = 3.5)]
    devaluation: f64,

    /// Starting FX rate, pesos per USD
    #[arg(long, default_value_t = 1_185.0)]
    fx: f64,

    /// Allocation weight for the time deposit, percent
    #[arg(long, default_value_t = 40.0)]
    w_fixed: f64,

    /// Allocation weight for USD blue, percent
    #[arg(long, default_value_t = 30.0)]
    w_blue: f64,

    /// Allocation weight for USD MEP, percent
    #[arg(long, default_value_t = 30.0)]
    w_mep: f64,

    /// Half-width of the sensitivity grid, percentage points
    #[arg(long, default_value_t = 2.0)]
    grid_span: f64,

    /// Steps on each side of the sensitivity grid
    #[arg(long, default_value_t = 2)]
    grid_steps: i32,

    /// Emit the full response as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct CompareResponse {
    base: ProjectionReport,
    best_strategy: Option<Strategy>,
    sensitivity: Vec<SensitivityCell>,
    execution_time_ms: u64,
}

#[derive(Serialize)]
struct SensitivityCell {
    inflation_pct: f64,
    devaluation_pct: f64,
    best_strategy: Option<Strategy>,
    best_real_return_pct: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let input = ProjectionInput {
        capital: args.capital,
        period_days: args.days,
        monthly_inflation_pct: args.inflation,
        monthly_devaluation_pct: args.devaluation,
        nominal_annual_rate_pct: args.tna,
        start_fx_rate: args.fx,
    };
    let weights = AllocationWeights {
        fixed_deposit: args.w_fixed,
        usd_blue: args.w_blue,
        usd_mep: args.w_mep,
    };

    let engine = ProjectionEngine::default();
    let base = engine.run(&input, &weights);

    // Inflation x devaluation grid around the base assumptions
    let step = args.grid_span / args.grid_steps.max(1) as f64;
    let offsets: Vec<f64> = (-args.grid_steps..=args.grid_steps)
        .map(|k| k as f64 * step)
        .collect();
    let cells: Vec<(f64, f64)> = offsets
        .iter()
        .flat_map(|&di| offsets.iter().map(move |&dd| (di, dd)))
        .collect();

    let sensitivity: Vec<SensitivityCell> = cells
        .par_iter()
        .map(|&(di, dd)| {
            let shocked = ProjectionInput {
                monthly_inflation_pct: input.monthly_inflation_pct + di,
                monthly_devaluation_pct: input.monthly_devaluation_pct + dd,
                ..input.clone()
            };
            let report = engine.run(&shocked, &weights);
            let best = report.best();
            SensitivityCell {
                inflation_pct: shocked.monthly_inflation_pct,
                devaluation_pct: shocked.monthly_devaluation_pct,
                best_strategy: best.map(|r| r.strategy),
                best_real_return_pct: best.map(|r| r.real_return_pct),
            }
        })
        .collect();

    let response = CompareResponse {
        best_strategy: base.best().map(|r| r.strategy),
        base,
        sensitivity,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    if args.json {
        let out = serde_json::to_string_pretty(&response).context("serializing response")?;
        println!("{out}");
        return Ok(());
    }

    println!("Strategy comparison ({} days, ${:.2}):", args.days, args.capital);
    if let Some(warning) = &response.base.allocation_warning {
        println!("WARNING: {warning}");
    }
    for failure in &response.base.failures {
        println!("FAILED: {}: {}", failure.strategy, failure.reason);
    }
    println!(
        "{:<15} {:>14} {:>9} {:>9} {:>8}",
        "Strategy", "Final", "Real%", "IRR%/mo", "Sharpe"
    );
    for result in response.base.ranked_by_real_return() {
        println!(
            "{:<15} {:>14.2} {:>9.2} {:>9} {:>8.2}",
            result.strategy.as_str(),
            result.final_value,
            result.real_return_pct,
            result
                .monthly_irr_pct
                .map(|irr| format!("{irr:.2}"))
                .unwrap_or_else(|| "n/a".into()),
            result.sharpe_ratio,
        );
    }

    println!("\nBest strategy across the sensitivity grid:");
    println!("{:>10} {:>12}  {}", "Inflation", "Devaluation", "Best");
    for cell in &response.sensitivity {
        println!(
            "{:>9.2}% {:>11.2}%  {}",
            cell.inflation_pct,
            cell.devaluation_pct,
            cell.best_strategy
                .map(|s| s.as_str())
                .unwrap_or("(none)"),
        );
    }

    println!("\nDone in {}ms", response.execution_time_ms);
    Ok(())
}
