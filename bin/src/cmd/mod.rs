//! CLI subcommand modules.
//!
//! This module contains the implementations for all cadiz CLI subcommands.

pub(crate) mod factors;
pub(crate) mod optimize;
pub(crate) mod portfolio;
pub(crate) mod rank;

use anyhow::Result;
use cadiz::Portfolio;
use serde::Serialize;

/// Print a boxed section title.
pub(crate) fn print_header(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{title:^62}║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

/// Print any serializable result as pretty JSON.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Holdings table and statistics of a portfolio.
pub(crate) fn print_portfolio(portfolio: &Portfolio) {
    println!("Objective:  {}", portfolio.objective);
    println!("Iterations: {}", portfolio.iterations);
    if let Some(reason) = &portfolio.fallback_reason {
        println!("Fallback:   equal weights ({reason})");
    }
    println!();

    println!("{:<10} {:>10}", "Asset", "Weight");
    println!("{}", "-".repeat(21));
    for (symbol, weight) in portfolio.holdings() {
        println!("{symbol:<10} {:>9.2}%", weight * 100.0);
    }
    println!();

    let stats = &portfolio.statistics;
    println!("Expected return: {:>8.2}%", stats.expected_return * 100.0);
    println!("Volatility:      {:>8.2}%", stats.volatility * 100.0);
    println!("Sharpe ratio:    {:>8.3}", stats.sharpe_ratio);
    println!();
}
