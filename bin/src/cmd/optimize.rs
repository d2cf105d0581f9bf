//! Optimize command implementation.

use std::path::Path;

use anyhow::Result;
use cadiz::Objective;
use cadiz::portfolio::{PortfolioOptimizer, to_returns};

use super::{print_header, print_json, print_portfolio};
use crate::{OutputFormat, data};

/// Optimize over the assets of a price file.
pub(crate) fn optimize_prices(
    prices_path: &Path,
    symbols: &[String],
    objective: Objective,
    periods_per_year: usize,
    date_column: &str,
    format: OutputFormat,
) -> Result<()> {
    let mut prices = data::load_prices(prices_path, date_column)?;
    if !symbols.is_empty() {
        prices = prices.select(symbols)?;
    }

    let returns = to_returns(&prices)?;
    let portfolio = PortfolioOptimizer::new(objective, periods_per_year).optimize(&returns)?;

    if format == OutputFormat::Json {
        return print_json(&portfolio);
    }

    print_header("Portfolio Optimization");
    println!("Prices:       {}", prices_path.display());
    println!("Assets:       {}", prices.symbols().join(", "));
    println!(
        "Observations: {} returns ({} to {})",
        returns.n_observations(),
        returns.dates().first().map(ToString::to_string).unwrap_or_default(),
        returns.dates().last().map(ToString::to_string).unwrap_or_default()
    );
    println!();
    print_portfolio(&portfolio);
    Ok(())
}
