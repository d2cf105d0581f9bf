//! CSV loading for the CLI.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use cadiz::{FactorFamily, MetricTable, PriceTable};
use polars::prelude::*;

/// Read a CSV file with a header row.
pub(crate) fn load_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Load a metric table: one row per asset, one numeric column per metric.
pub(crate) fn load_metric_table(path: &Path, symbol_column: &str) -> Result<MetricTable> {
    let df = load_csv(path)?;
    MetricTable::from_dataframe(&df, symbol_column)
        .with_context(|| format!("invalid metric table {}", path.display()))
}

/// Load a price table: a `YYYY-MM-DD` date column and one column per asset.
pub(crate) fn load_prices(path: &Path, date_column: &str) -> Result<PriceTable> {
    let df = load_csv(path)?;
    PriceTable::from_dataframe(&df, date_column)
        .with_context(|| format!("invalid price table {}", path.display()))
}

/// Parse a `family=path` argument.
pub(crate) fn parse_family_path(arg: &str) -> Result<(FactorFamily, String)> {
    let (family, path) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected FAMILY=PATH, got '{arg}'"))?;
    if path.is_empty() {
        return Err(anyhow!("missing path for family '{family}'"));
    }
    Ok((family.parse()?, path.to_string()))
}
