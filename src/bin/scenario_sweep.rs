//! Run projections for a batch of macro scenarios from a CSV file
//!
//! Input columns:
//!   name,capital,period_days,tna_pct,inflation_pct,devaluation_pct,fx_rate,w_fixed,w_blue,w_mep
//! Outputs one ranked summary row per scenario/strategy pair.

use anyhow::Context;
use clap::Parser;
use investment_projector::{AllocationWeights, ProjectionInput, ProjectionReport, ScenarioRunner};
use rayon::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "scenario_sweep", about = "Batch-project macro scenarios from CSV")]
struct Args {
    /// Scenario CSV file
    #[arg(short, long)]
    scenarios: PathBuf,

    /// Output CSV path
    #[arg(short, long, default_value = "sweep_output.csv")]
    output: PathBuf,
}

/// One scenario row from the input CSV
#[derive(Debug, Clone, Deserialize)]
struct ScenarioRow {
    name: String,
    capital: f64,
    period_days: u32,
    tna_pct: f64,
    inflation_pct: f64,
    devaluation_pct: f64,
    fx_rate: f64,
    w_fixed: f64,
    w_blue: f64,
    w_mep: f64,
}

impl ScenarioRow {
    fn input(&self) -> ProjectionInput {
        ProjectionInput {
            capital: self.capital,
            period_days: self.period_days,
            monthly_inflation_pct: self.inflation_pct,
            monthly_devaluation_pct: self.devaluation_pct,
            nominal_annual_rate_pct: self.tna_pct,
            start_fx_rate: self.fx_rate,
        }
    }

    fn weights(&self) -> AllocationWeights {
        AllocationWeights {
            fixed_deposit: self.w_fixed,
            usd_blue: self.w_blue,
            usd_mep: self.w_mep,
        }
    }
}

fn load_scenarios(path: &PathBuf) -> anyhow::Result<Vec<ScenarioRow>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: ScenarioRow = result.context("parsing scenario row")?;
        rows.push(row);
    }
    Ok(rows)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    println!("Loading scenarios from {}...", args.scenarios.display());
    let scenarios = load_scenarios(&args.scenarios)?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let runner = ScenarioRunner::new();

    println!("Running projections...");
    let proj_start = Instant::now();
    let reports: Vec<(String, ProjectionReport)> = scenarios
        .par_iter()
        .map(|row| (row.name.clone(), runner.run(&row.input(), &row.weights())))
        .collect();
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writeln!(
        file,
        "Scenario,Strategy,Rank,FinalValue,NominalPct,RealPct,NPV,IrrPctMonthly,VolatilityPct,Sharpe,Best"
    )?;

    for (name, report) in &reports {
        for (rank, result) in report.ranked_by_real_return().iter().enumerate() {
            let is_best = report
                .best()
                .map(|b| b.strategy == result.strategy)
                .unwrap_or(false);
            writeln!(
                file,
                "{},{},{},{:.2},{:.4},{:.4},{},{},{:.4},{:.4},{}",
                name,
                result.strategy.as_str(),
                rank + 1,
                result.final_value,
                result.nominal_return_pct,
                result.real_return_pct,
                result
                    .npv
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or_else(|| "undefined".into()),
                result
                    .monthly_irr_pct
                    .map(|v| format!("{v:.4}"))
                    .unwrap_or_else(|| "undefined".into()),
                result.volatility_pct,
                result.sharpe_ratio,
                is_best,
            )?;
        }
        for failure in &report.failures {
            eprintln!("{name}: {} failed: {}", failure.strategy, failure.reason);
        }
    }

    println!("Output written to {}", args.output.display());

    // Console summary: winner per scenario
    println!("\nSweep summary:");
    for (name, report) in &reports {
        match report.best() {
            Some(best) => println!(
                "  {name}: best {} (real {:.2}%)",
                best.strategy, best.real_return_pct
            ),
            None => println!("  {name}: no rankable strategy"),
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
