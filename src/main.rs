//! Investment Projector CLI
//!
//! Runs a reference projection and prints the strategy comparison

use investment_projector::rates::{self, PeriodUnit};
use investment_projector::{
    AllocationWeights, ProjectionEngine, ProjectionInput, Strategy,
};
use std::fs::File;
use std::io::Write;

fn main() {
    env_logger::init();

    println!("Investment Projector v0.1.0");
    println!("===========================\n");

    // Reference inputs: 1M pesos for 90 days under 2024-style macro rates
    let input = ProjectionInput {
        capital: 1_000_000.0,
        period_days: 90,
        monthly_inflation_pct: 4.2,
        monthly_devaluation_pct: 3.5,
        nominal_annual_rate_pct: 110.0,
        start_fx_rate: 1_185.0,
    };
    let weights = AllocationWeights {
        fixed_deposit: 40.0,
        usd_blue: 30.0,
        usd_mep: 30.0,
    };

    let monthly_tna = rates::monthly_fraction(input.nominal_annual_rate_pct, PeriodUnit::Annual)
        .expect("non-negative TNA");

    println!("Inputs:");
    println!("  Capital: ${:.2}", input.capital);
    println!("  Period: {} days", input.period_days);
    println!(
        "  TNA: {:.2}% ({:.2}% monthly)",
        input.nominal_annual_rate_pct,
        monthly_tna * 100.0
    );
    println!("  Monthly inflation: {:.2}%", input.monthly_inflation_pct);
    println!("  Monthly devaluation: {:.2}%", input.monthly_devaluation_pct);
    println!(
        "  FX: ${:.2}/USD ({:.2} USD bought)",
        input.start_fx_rate,
        input.capital / input.start_fx_rate
    );
    println!(
        "  Allocation: {:.0}/{:.0}/{:.0}\n",
        weights.fixed_deposit, weights.usd_blue, weights.usd_mep
    );

    let engine = ProjectionEngine::default();
    let report = engine.run(&input, &weights);

    if let Some(warning) = &report.allocation_warning {
        println!("WARNING: {warning}\n");
    }
    for failure in &report.failures {
        println!("FAILED: {}: {}", failure.strategy, failure.reason);
    }

    // Print metric summary per strategy
    println!(
        "{:<15} {:>14} {:>9} {:>9} {:>12} {:>8} {:>7} {:>8}",
        "Strategy", "Final", "Nominal%", "Real%", "NPV", "IRR%/mo", "Vol%", "Sharpe"
    );
    println!("{}", "-".repeat(90));
    for result in &report.results {
        println!(
            "{:<15} {:>14.2} {:>9.2} {:>9.2} {:>12.2} {:>8} {:>7.3} {:>8.2}",
            result.strategy.as_str(),
            result.final_value,
            result.nominal_return_pct,
            result.real_return_pct,
            result.npv.unwrap_or(f64::NAN),
            result
                .monthly_irr_pct
                .map(|irr| format!("{irr:.2}"))
                .unwrap_or_else(|| "n/a".into()),
            result.volatility_pct,
            result.sharpe_ratio,
        );
    }

    println!(
        "\nAccumulated inflation over the period: {:.2}%",
        report
            .results
            .first()
            .map(|r| r.inflation_accumulated_pct)
            .unwrap_or(0.0)
    );

    println!("\nRanking by real return:");
    for (position, result) in report.ranked_by_real_return().iter().enumerate() {
        println!(
            "  {}. {:<15} real {:>6.2}%  sharpe {:>6.2}",
            position + 1,
            result.strategy.as_str(),
            result.real_return_pct,
            result.sharpe_ratio,
        );
    }
    if let Some(best) = report.best() {
        println!("\nBest by real return: {}", best.strategy);
    }

    // Write monthly series to CSV for charting
    let csv_path = "projection_output.csv";
    let mut file = File::create(csv_path).expect("Unable to create CSV file");

    writeln!(file, "Strategy,Month,Value").unwrap();
    for result in &report.results {
        for point in &result.series {
            writeln!(
                file,
                "{},{},{:.6}",
                result.strategy.as_str(),
                point.month_index,
                point.value
            )
            .unwrap();
        }
    }

    println!("\nMonthly series written to: {csv_path}");
}
