//! Per-family rank aggregation.
//!
//! [`rank_factor`] turns a [`MetricTable`] and an ordered list of
//! [`MetricSpec`]s into one rank per metric and a composite rank per asset.

use std::collections::HashSet;

use cadiz_traits::{
    CadizError, CompositeFactorRank, Factor, FactorRank, MetricSpec, MetricTable, Result, Symbol,
    stats,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::rank::average_ranks;

/// Rank of one metric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRank {
    /// Metric column name.
    pub metric: String,
    /// Ranks of the assets that qualified for this metric.
    pub ranks: FactorRank,
}

/// Result of ranking one factor family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorRanking {
    /// Per-metric ranks, in spec order. Skipped metrics are absent.
    pub metric_ranks: Vec<MetricRank>,

    /// Mean of each asset's available metric ranks.
    pub composite: CompositeFactorRank,

    /// Assets with no qualifying metric at all.
    pub dropped: Vec<Symbol>,

    /// Metrics named in the specs but absent from the table.
    pub skipped_metrics: Vec<String>,
}

impl FactorRanking {
    /// Ranks of one metric, if it was ranked.
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<&FactorRank> {
        self.metric_ranks.iter().find(|m| m.metric == name).map(|m| &m.ranks)
    }
}

/// Rank every metric of `table` named in `specs` and aggregate per asset.
///
/// A metric whose column is absent is skipped and reported in
/// [`FactorRanking::skipped_metrics`]. Within a metric only present values
/// passing the spec's filter are ranked. An asset's composite is the mean of
/// the ranks it has; assets with none are listed in
/// [`FactorRanking::dropped`].
///
/// # Errors
///
/// Returns [`CadizError::Configuration`] if `specs` is empty or names the
/// same metric twice.
pub fn rank_factor(table: &MetricTable, specs: &[MetricSpec]) -> Result<FactorRanking> {
    validate_specs(specs)?;

    let mut metric_ranks = Vec::with_capacity(specs.len());
    let mut skipped_metrics = Vec::new();

    for spec in specs {
        let Some(column) = table.column(&spec.name) else {
            debug!(metric = %spec.name, "metric column absent, skipping");
            skipped_metrics.push(spec.name.clone());
            continue;
        };

        let (symbols, values): (Vec<&str>, Vec<f64>) = column
            .filter_map(|(symbol, value)| {
                value.value().filter(|v| spec.filter.accepts(*v)).map(|v| (symbol, v))
            })
            .unzip();

        let ranks = average_ranks(&values, spec.direction);
        let ranks = FactorRank::from_pairs(symbols.into_iter().zip(ranks))?;
        debug!(metric = %spec.name, qualified = ranks.len(), total = table.len(), "ranked metric");

        metric_ranks.push(MetricRank { metric: spec.name.clone(), ranks });
    }

    let mut composite = CompositeFactorRank::with_capacity(table.len());
    let mut dropped = Vec::new();
    for symbol in table.assets() {
        let ranks: Vec<f64> =
            metric_ranks.iter().filter_map(|m| m.ranks.get(symbol)).collect();
        match stats::mean(&ranks) {
            Some(mean) => composite.insert(symbol.as_str(), mean)?,
            None => dropped.push(symbol.clone()),
        }
    }

    if !dropped.is_empty() {
        warn!(count = dropped.len(), assets = ?dropped, "assets without any qualifying metric");
    }

    Ok(FactorRanking { metric_ranks, composite, dropped, skipped_metrics })
}

fn validate_specs(specs: &[MetricSpec]) -> Result<()> {
    if specs.is_empty() {
        return Err(CadizError::configuration("at least one metric spec is required"));
    }
    let mut seen = HashSet::with_capacity(specs.len());
    for spec in specs {
        if !seen.insert(spec.name.as_str()) {
            return Err(CadizError::configuration(format!(
                "metric '{}' specified more than once",
                spec.name
            )));
        }
    }
    Ok(())
}

/// Ranks metric tables with the specs of a [`Factor`].
#[derive(Debug, Clone)]
pub struct FactorRanker<F> {
    factor: F,
}

impl<F: Factor> FactorRanker<F> {
    /// Wrap a factor.
    pub const fn new(factor: F) -> Self {
        Self { factor }
    }

    /// The wrapped factor.
    pub const fn factor(&self) -> &F {
        &self.factor
    }

    /// Rank `table` with the factor's metric specs.
    ///
    /// # Errors
    ///
    /// Returns an error if the factor's specs are invalid.
    pub fn rank(&self, table: &MetricTable) -> Result<FactorRanking> {
        debug!(factor = self.factor.name(), family = %self.factor.family(), "ranking factor");
        rank_factor(table, self.factor.metrics())
    }
}
