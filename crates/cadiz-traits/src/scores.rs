//! Ordered asset -> score mappings.
//!
//! Every stage of the ranking pipeline produces a [`ScoreTable`]: per-metric
//! ranks, per-family composites and the cross-family combined rank. Lower is
//! always better.

use std::collections::HashMap;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{CadizError, Result, Symbol, stats};

/// Rank of assets under a single metric (1 = best, ties averaged).
pub type FactorRank = ScoreTable;

/// Mean of per-metric ranks within one factor family.
pub type CompositeFactorRank = ScoreTable;

/// Weighted combination of family composites across the universe.
pub type CombinedRank = ScoreTable;

/// One `(symbol, score)` entry, used for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Asset identifier.
    pub symbol: Symbol,
    /// Score value.
    pub score: f64,
}

/// An ordered mapping from asset to a finite score.
///
/// Insertion order is preserved. Symbols are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<ScoreEntry>", try_from = "Vec<ScoreEntry>")]
pub struct ScoreTable {
    symbols: Vec<Symbol>,
    scores: Vec<f64>,
    index: HashMap<Symbol, usize>,
}

impl ScoreTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: Vec::with_capacity(capacity),
            scores: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Build from `(symbol, score)` pairs, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::DataQuality`] on a duplicate symbol or a
    /// non-finite score.
    pub fn from_pairs<S: Into<Symbol>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Result<Self> {
        let mut table = Self::new();
        for (symbol, score) in pairs {
            table.insert(symbol, score)?;
        }
        Ok(table)
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::DataQuality`] on a duplicate symbol or a
    /// non-finite score.
    pub fn insert(&mut self, symbol: impl Into<Symbol>, score: f64) -> Result<()> {
        let symbol = symbol.into();
        if !score.is_finite() {
            return Err(CadizError::data_quality(format!("non-finite score for {symbol}")));
        }
        if self.index.contains_key(&symbol) {
            return Err(CadizError::data_quality(format!("duplicate symbol {symbol}")));
        }
        self.index.insert(symbol.clone(), self.symbols.len());
        self.symbols.push(symbol);
        self.scores.push(score);
        Ok(())
    }

    /// Score of `symbol`, if present.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.index.get(symbol).map(|&i| self.scores[i])
    }

    /// Whether `symbol` has a score.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over `(symbol, score)` in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.symbols.iter().map(String::as_str).zip(self.scores.iter().copied())
    }

    /// Symbols in order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Scores in order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.scores
    }

    /// Median score, or `None` when empty.
    #[must_use]
    pub fn median(&self) -> Option<f64> {
        stats::median(&self.scores)
    }

    /// A copy sorted by ascending score. Ties keep their current order.
    #[must_use]
    pub fn sorted_ascending(&self) -> Self {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| self.scores[a].total_cmp(&self.scores[b]));

        let mut sorted = Self::with_capacity(self.len());
        for i in order {
            sorted.index.insert(self.symbols[i].clone(), sorted.symbols.len());
            sorted.symbols.push(self.symbols[i].clone());
            sorted.scores.push(self.scores[i]);
        }
        sorted
    }

    /// The first `n` entries (or all, if fewer).
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        let mut head = Self::with_capacity(n.min(self.len()));
        for (symbol, score) in self.iter().take(n) {
            head.index.insert(symbol.to_string(), head.symbols.len());
            head.symbols.push(symbol.to_string());
            head.scores.push(score);
        }
        head
    }

    /// Convert to a two-column DataFrame (`symbol`, `score_column`).
    ///
    /// # Errors
    ///
    /// Returns an error if the DataFrame cannot be assembled.
    pub fn to_dataframe(&self, score_column: &str) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Column::new("symbol".into(), self.symbols.clone()),
            Column::new(score_column.into(), self.scores.clone()),
        ])?;
        Ok(df)
    }
}

impl From<ScoreTable> for Vec<ScoreEntry> {
    fn from(table: ScoreTable) -> Self {
        table
            .symbols
            .into_iter()
            .zip(table.scores)
            .map(|(symbol, score)| ScoreEntry { symbol, score })
            .collect()
    }
}

impl TryFrom<Vec<ScoreEntry>> for ScoreTable {
    type Error = CadizError;

    fn try_from(entries: Vec<ScoreEntry>) -> Result<Self> {
        Self::from_pairs(entries.into_iter().map(|e| (e.symbol, e.score)))
    }
}
