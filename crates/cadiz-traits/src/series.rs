//! Date-indexed price and return panels.
//!
//! Both tables store rows as periods (oldest first) and columns as assets.
//! Missing prices are stored as `NaN`; it is up to the consumer to decide
//! whether a gap is acceptable.

use std::collections::HashSet;

use ndarray::{Array2, ArrayView1, Axis};
use polars::prelude::*;

use crate::{CadizError, Date, Result, Symbol};

/// Days from 0001-01-01 (CE) to 1970-01-01, for converting Polars dates.
pub const CE_TO_UNIX_EPOCH_DAYS: i32 = 719_163;

fn check_shape(dates: &[Date], symbols: &[Symbol], values: &Array2<f64>, what: &str) -> Result<()> {
    if values.nrows() != dates.len() || values.ncols() != symbols.len() {
        return Err(CadizError::data_quality(format!(
            "{what} shape {:?} does not match {} dates x {} assets",
            values.dim(),
            dates.len(),
            symbols.len()
        )));
    }
    let mut seen = HashSet::with_capacity(symbols.len());
    for symbol in symbols {
        if !seen.insert(symbol.as_str()) {
            return Err(CadizError::data_quality(format!("duplicate asset {symbol} in {what}")));
        }
    }
    Ok(())
}

fn select_columns(symbols: &[Symbol], wanted: &[Symbol], what: &str) -> Result<Vec<usize>> {
    wanted
        .iter()
        .map(|w| {
            symbols.iter().position(|s| s == w).ok_or_else(|| {
                CadizError::data_quality(format!("asset {w} not present in {what}"))
            })
        })
        .collect()
}

/// Per-asset closing prices over an ordered sequence of dates.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    dates: Vec<Date>,
    symbols: Vec<Symbol>,
    prices: Array2<f64>,
}

impl PriceTable {
    /// Create a price table. `prices` has one row per date and one column per
    /// symbol. Non-finite cells are treated as missing.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::DataQuality`] on a shape mismatch or a duplicate
    /// symbol.
    pub fn new(dates: Vec<Date>, symbols: Vec<Symbol>, prices: Array2<f64>) -> Result<Self> {
        check_shape(&dates, &symbols, &prices, "price table")?;
        Ok(Self { dates, symbols, prices })
    }

    /// Create a price table from per-asset columns of optional prices.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::DataQuality`] if a column length differs from the
    /// number of dates or a symbol repeats.
    pub fn from_columns(dates: Vec<Date>, columns: Vec<(Symbol, Vec<Option<f64>>)>) -> Result<Self> {
        let mut prices = Array2::from_elem((dates.len(), columns.len()), f64::NAN);
        let mut symbols = Vec::with_capacity(columns.len());
        for (j, (symbol, values)) in columns.into_iter().enumerate() {
            if values.len() != dates.len() {
                return Err(CadizError::data_quality(format!(
                    "price column {symbol} has {} values for {} dates",
                    values.len(),
                    dates.len()
                )));
            }
            for (i, v) in values.into_iter().enumerate() {
                prices[[i, j]] = v.unwrap_or(f64::NAN);
            }
            symbols.push(symbol);
        }
        Self::new(dates, symbols, prices)
    }

    /// Build from a wide DataFrame: one date column plus one numeric column
    /// per asset.
    ///
    /// The date column may be a Polars `Date` or an ISO `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns an error if the date column is missing or unparsable, or if a
    /// Polars cast fails.
    pub fn from_dataframe(df: &DataFrame, date_column: &str) -> Result<Self> {
        let date_col = df.column(date_column).map_err(|_| {
            CadizError::data_quality(format!("missing date column '{date_column}'"))
        })?;
        let dates = parse_dates(date_col.as_materialized_series())?;

        let mut columns = Vec::new();
        for name in df.get_column_names() {
            let name = name.to_string();
            if name == date_column {
                continue;
            }
            let series = df.column(&name)?.as_materialized_series().cast(&DataType::Float64)?;
            let values: Vec<Option<f64>> = series.f64()?.into_iter().collect();
            columns.push((name, values));
        }

        Self::from_columns(dates, columns)
    }

    /// Dates, oldest first.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Asset symbols in column order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Price matrix (dates x assets).
    #[must_use]
    pub const fn prices(&self) -> &Array2<f64> {
        &self.prices
    }

    /// Number of dates.
    #[must_use]
    pub fn n_periods(&self) -> usize {
        self.prices.nrows()
    }

    /// Number of assets.
    #[must_use]
    pub fn n_assets(&self) -> usize {
        self.prices.ncols()
    }

    /// Price history of one asset.
    #[must_use]
    pub fn column(&self, symbol: &str) -> Option<ArrayView1<'_, f64>> {
        let j = self.symbols.iter().position(|s| s == symbol)?;
        Some(self.prices.column(j))
    }

    /// Restrict to `symbols`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::DataQuality`] if a symbol is absent.
    pub fn select(&self, symbols: &[Symbol]) -> Result<Self> {
        let cols = select_columns(&self.symbols, symbols, "price table")?;
        Self::new(self.dates.clone(), symbols.to_vec(), self.prices.select(Axis(1), &cols))
    }
}

fn parse_dates(series: &Series) -> Result<Vec<Date>> {
    let parsed: Vec<Option<Date>> = match series.dtype() {
        DataType::Date => series
            .date()?
            .into_iter()
            .map(|d: Option<i32>| {
                d.and_then(|days| Date::from_num_days_from_ce_opt(days + CE_TO_UNIX_EPOCH_DAYS))
            })
            .collect(),
        DataType::String => series
            .str()?
            .into_iter()
            .map(|s| s.and_then(|s| Date::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
            .collect(),
        other => {
            return Err(CadizError::data_quality(format!(
                "date column has unsupported type {other}"
            )));
        }
    };

    parsed
        .into_iter()
        .enumerate()
        .map(|(row, d)| {
            d.ok_or_else(|| CadizError::data_quality(format!("invalid or null date at row {row}")))
        })
        .collect()
}

/// Simple periodic returns, one row per interval between consecutive dates.
///
/// Row `t` holds the return from date `t` to date `t + 1`; its date is the
/// later one.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnTable {
    dates: Vec<Date>,
    symbols: Vec<Symbol>,
    returns: Array2<f64>,
}

impl ReturnTable {
    /// Create a return table.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::DataQuality`] on a shape mismatch or a duplicate
    /// symbol.
    pub fn new(dates: Vec<Date>, symbols: Vec<Symbol>, returns: Array2<f64>) -> Result<Self> {
        check_shape(&dates, &symbols, &returns, "return table")?;
        Ok(Self { dates, symbols, returns })
    }

    /// End date of each return interval.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Asset symbols in column order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Return matrix (observations x assets).
    #[must_use]
    pub const fn returns(&self) -> &Array2<f64> {
        &self.returns
    }

    /// Number of return observations.
    #[must_use]
    pub fn n_observations(&self) -> usize {
        self.returns.nrows()
    }

    /// Number of assets.
    #[must_use]
    pub fn n_assets(&self) -> usize {
        self.returns.ncols()
    }

    /// Restrict to `symbols`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::DataQuality`] if a symbol is absent.
    pub fn select(&self, symbols: &[Symbol]) -> Result<Self> {
        let cols = select_columns(&self.symbols, symbols, "return table")?;
        Self::new(self.dates.clone(), symbols.to_vec(), self.returns.select(Axis(1), &cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_price_table_shape_check() {
        let err = PriceTable::new(vec![d(1)], vec!["A".into(), "B".into()], array![[1.0]]).unwrap_err();
        assert!(matches!(err, CadizError::DataQuality(_)));

        let err = PriceTable::new(
            vec![d(1)],
            vec!["A".into(), "A".into()],
            array![[1.0, 2.0]],
        )
        .unwrap_err();
        assert!(matches!(err, CadizError::DataQuality(_)));
    }

    #[test]
    fn test_from_columns_and_select() {
        let table = PriceTable::from_columns(
            vec![d(1), d(2)],
            vec![("A".into(), vec![Some(10.0), Some(11.0)]), ("B".into(), vec![Some(5.0), None])],
        )
        .unwrap();
        assert_eq!(table.n_periods(), 2);
        assert_eq!(table.n_assets(), 2);
        assert!(table.prices()[[1, 1]].is_nan());

        let only_b = table.select(&["B".to_string()]).unwrap();
        assert_eq!(only_b.symbols(), &["B"]);
        assert_eq!(only_b.prices()[[0, 0]], 5.0);

        assert!(table.select(&["Z".to_string()]).is_err());
        assert_eq!(table.column("A").unwrap()[1], 11.0);
    }

    #[test]
    fn test_from_dataframe_string_dates() {
        let df = df! {
            "date" => &["2024-01-01", "2024-01-02"],
            "AAPL" => &[190.0, 192.5],
            "MSFT" => &[Some(370.0), None],
        }
        .unwrap();
        let table = PriceTable::from_dataframe(&df, "date").unwrap();
        assert_eq!(table.dates(), &[d(1), d(2)]);
        assert_eq!(table.symbols(), &["AAPL", "MSFT"]);
        assert!(table.prices()[[1, 1]].is_nan());
    }

    #[test]
    fn test_from_dataframe_bad_date() {
        let df = df! {
            "date" => &["2024-01-01", "not a date"],
            "AAPL" => &[190.0, 192.5],
        }
        .unwrap();
        assert!(PriceTable::from_dataframe(&df, "date").is_err());
        assert!(PriceTable::from_dataframe(&df, "day").is_err());
    }

    #[test]
    fn test_return_table_select_unknown() {
        let table = ReturnTable::new(
            vec![d(2), d(3)],
            vec!["A".into(), "B".into()],
            array![[0.01, 0.02], [0.03, -0.01]],
        )
        .unwrap();
        let err = table.select(&["A".to_string(), "C".to_string()]).unwrap_err();
        assert!(matches!(err, CadizError::DataQuality(_)));

        let swapped = table.select(&["B".to_string(), "A".to_string()]).unwrap();
        assert_eq!(swapped.returns()[[1, 0]], -0.01);
        assert_eq!(swapped.n_observations(), 2);
    }
}
