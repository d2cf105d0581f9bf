//! Rank command implementation.

use std::path::Path;

use anyhow::Result;
use cadiz::FactorFamily;
use cadiz::factors::{FactorRanker, create_factor};

use super::{print_header, print_json};
use crate::{OutputFormat, data};

/// Rank one family's metric table with the family's default specs.
pub(crate) fn rank_table(
    family: FactorFamily,
    input: &Path,
    symbol_column: &str,
    format: OutputFormat,
) -> Result<()> {
    let table = data::load_metric_table(input, symbol_column)?;
    let ranking = FactorRanker::new(create_factor(family)).rank(&table)?;

    if format == OutputFormat::Json {
        return print_json(&ranking);
    }

    print_header("Factor Ranking");
    println!("Family:  {family}");
    println!("Input:   {} ({} assets, {} metrics)", input.display(), table.len(), table.metrics().len());
    if !ranking.skipped_metrics.is_empty() {
        println!("Skipped: {} (not in input)", ranking.skipped_metrics.join(", "));
    }
    println!();

    println!("{:<6} {:<10} {:>10}", "Pos", "Asset", "Composite");
    println!("{}", "-".repeat(28));
    for (i, (symbol, rank)) in ranking.composite.sorted_ascending().iter().enumerate() {
        println!("{:<6} {symbol:<10} {rank:>10.2}", i + 1);
    }
    println!();

    if !ranking.dropped.is_empty() {
        println!("Dropped (no qualifying metric): {}\n", ranking.dropped.join(", "));
    }
    Ok(())
}
