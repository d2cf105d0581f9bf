//! Rectangular asset x metric tables.
//!
//! A [`MetricTable`] is built once per factor family from raw observations and
//! is immutable afterwards. Every cell is a [`MetricValue`]; a gap in the
//! observations is recorded as [`MetricValue::Missing`] and is never confused
//! with a zero.

use std::collections::{HashMap, HashSet};

use polars::prelude::*;

use crate::{CadizError, Result, Symbol};

/// A single metric observation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MetricValue {
    /// A finite observed value.
    Value(f64),
    /// No usable observation.
    #[default]
    Missing,
}

impl MetricValue {
    /// Build from an optional raw value. Non-finite values become `Missing`.
    #[must_use]
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Self::Value(v),
            _ => Self::Missing,
        }
    }

    /// The observed value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Missing => None,
        }
    }

    /// Whether the observation is missing.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        Self::from_option(value)
    }
}

/// Immutable table: rows are assets, columns are named metrics.
///
/// Asset and metric order is first-seen order from the builder.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    assets: Vec<Symbol>,
    metrics: Vec<String>,
    // Row-major: cells[row * metrics.len() + col]
    cells: Vec<MetricValue>,
}

impl MetricTable {
    /// Start building a table.
    #[must_use]
    pub fn builder() -> MetricTableBuilder {
        MetricTableBuilder::default()
    }

    /// Asset identifiers in row order.
    #[must_use]
    pub fn assets(&self) -> &[Symbol] {
        &self.assets
    }

    /// Metric names in column order.
    #[must_use]
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Number of assets.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the table has no assets.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Whether a metric column exists.
    #[must_use]
    pub fn has_metric(&self, metric: &str) -> bool {
        self.metric_position(metric).is_some()
    }

    /// Value of `metric` for `symbol`. `None` when the asset or the metric
    /// column does not exist at all.
    #[must_use]
    pub fn get(&self, symbol: &str, metric: &str) -> Option<MetricValue> {
        let row = self.assets.iter().position(|s| s == symbol)?;
        let col = self.metric_position(metric)?;
        Some(self.cells[row * self.metrics.len() + col])
    }

    /// Iterate over `(symbol, value)` pairs of one metric column, in row
    /// order. `None` when the column does not exist.
    pub fn column(
        &self,
        metric: &str,
    ) -> Option<impl Iterator<Item = (&str, MetricValue)> + '_> {
        let col = self.metric_position(metric)?;
        let width = self.metrics.len();
        Some(
            self.assets
                .iter()
                .enumerate()
                .map(move |(row, symbol)| (symbol.as_str(), self.cells[row * width + col])),
        )
    }

    /// Number of present (non-missing) values in a metric column.
    #[must_use]
    pub fn present_count(&self, metric: &str) -> usize {
        self.column(metric)
            .map(|col| col.filter(|(_, v)| !v.is_missing()).count())
            .unwrap_or(0)
    }

    fn metric_position(&self, metric: &str) -> Option<usize> {
        self.metrics.iter().position(|m| m == metric)
    }

    /// Build a table from a DataFrame with one symbol column and numeric
    /// metric columns. Nulls become `Missing`; non-numeric columns other than
    /// the symbol column are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol column is absent, contains nulls or
    /// duplicate symbols, or if a Polars operation fails.
    pub fn from_dataframe(df: &DataFrame, symbol_column: &str) -> Result<Self> {
        let symbols: Vec<Option<String>> = df
            .column(symbol_column)
            .map_err(|_| {
                CadizError::data_quality(format!("missing symbol column '{symbol_column}'"))
            })?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|s: Option<&str>| s.map(str::to_string))
            .collect();

        let mut builder = Self::builder();
        let mut symbol_list = Vec::with_capacity(symbols.len());
        let mut seen = HashSet::with_capacity(symbols.len());
        for (row, symbol) in symbols.into_iter().enumerate() {
            let symbol = symbol.ok_or_else(|| {
                CadizError::data_quality(format!("null symbol at row {row}"))
            })?;
            if !seen.insert(symbol.clone()) {
                return Err(CadizError::data_quality(format!(
                    "duplicate symbol {symbol} at row {row}"
                )));
            }
            builder.asset(&symbol);
            symbol_list.push(symbol);
        }

        for column in df.get_column_names() {
            let name = column.to_string();
            if name == symbol_column {
                continue;
            }
            let series = df.column(&name)?.as_materialized_series();
            if !is_numeric(series.dtype()) {
                continue;
            }
            builder.metric(&name);
            let values = series.cast(&DataType::Float64)?;
            for (symbol, value) in symbol_list.iter().zip(values.f64()?.into_iter()) {
                builder.record(symbol, &name, value)?;
            }
        }

        Ok(builder.build())
    }

    /// Convert to a DataFrame: one string symbol column followed by one
    /// nullable `f64` column per metric.
    ///
    /// # Errors
    ///
    /// Returns an error if the DataFrame cannot be assembled.
    pub fn to_dataframe(&self, symbol_column: &str) -> Result<DataFrame> {
        let width = self.metrics.len();
        let mut columns = Vec::with_capacity(width + 1);
        columns.push(Column::new(symbol_column.into(), self.assets.clone()));

        for (col, metric) in self.metrics.iter().enumerate() {
            let values: Vec<Option<f64>> = (0..self.assets.len())
                .map(|row| self.cells[row * width + col].value())
                .collect();
            columns.push(Column::new(metric.as_str().into(), values));
        }

        Ok(DataFrame::new(columns)?)
    }
}

const fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32
    )
}

/// Accumulates raw per-asset observations into a [`MetricTable`].
///
/// Observations may arrive in any order. Cells never observed are `Missing`
/// in the built table.
#[derive(Debug, Default)]
pub struct MetricTableBuilder {
    assets: Vec<Symbol>,
    asset_index: HashMap<Symbol, usize>,
    metrics: Vec<String>,
    metric_index: HashMap<String, usize>,
    observations: HashMap<(usize, usize), MetricValue>,
}

impl MetricTableBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an asset row. Declaring an existing asset is a no-op.
    pub fn asset(&mut self, symbol: &str) -> &mut Self {
        self.asset_row(symbol);
        self
    }

    /// Declare a metric column. Declaring an existing metric is a no-op.
    pub fn metric(&mut self, metric: &str) -> &mut Self {
        self.metric_col(metric);
        self
    }

    /// Record one observation. `None` and non-finite values are recorded as
    /// `Missing`.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::DataQuality`] if the same `(symbol, metric)`
    /// pair was already recorded.
    pub fn record(&mut self, symbol: &str, metric: &str, value: Option<f64>) -> Result<&mut Self> {
        let row = self.asset_row(symbol);
        let col = self.metric_col(metric);
        if self.observations.insert((row, col), MetricValue::from_option(value)).is_some() {
            return Err(CadizError::data_quality(format!(
                "duplicate observation for {symbol} / {metric}"
            )));
        }
        Ok(self)
    }

    /// Record every metric of one asset.
    ///
    /// # Errors
    ///
    /// Returns an error on a duplicate observation.
    pub fn record_row<'a>(
        &mut self,
        symbol: &str,
        values: impl IntoIterator<Item = (&'a str, Option<f64>)>,
    ) -> Result<&mut Self> {
        self.asset(symbol);
        for (metric, value) in values {
            self.record(symbol, metric, value)?;
        }
        Ok(self)
    }

    /// Finish the table.
    #[must_use]
    pub fn build(self) -> MetricTable {
        let width = self.metrics.len();
        let mut cells = vec![MetricValue::Missing; self.assets.len() * width];
        for ((row, col), value) in self.observations {
            cells[row * width + col] = value;
        }
        MetricTable { assets: self.assets, metrics: self.metrics, cells }
    }

    fn asset_row(&mut self, symbol: &str) -> usize {
        if let Some(&row) = self.asset_index.get(symbol) {
            return row;
        }
        let row = self.assets.len();
        self.assets.push(symbol.to_string());
        self.asset_index.insert(symbol.to_string(), row);
        row
    }

    fn metric_col(&mut self, metric: &str) -> usize {
        if let Some(&col) = self.metric_index.get(metric) {
            return col;
        }
        let col = self.metrics.len();
        self.metrics.push(metric.to_string());
        self.metric_index.insert(metric.to_string(), col);
        col
    }
}
