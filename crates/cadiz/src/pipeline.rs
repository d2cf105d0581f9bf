//! End-to-end ranking and allocation.
//!
//! A [`Pipeline`] runs the stages in order, each consuming the previous
//! stage's output:
//!
//! 1. rank every supplied family's [`MetricTable`]
//! 2. combine the family composites into one [`CombinedRank`]
//! 3. select the `top_n` best-ranked assets
//! 4. convert their price columns to returns
//! 5. optimize the allocation

use std::collections::BTreeMap;

use cadiz_combine::{Combiner, EqualWeightCombiner, FamilyRanks, WeightedRankCombiner, select_top_n};
use cadiz_factors::{FactorRanker, FactorRanking, create_factor, rank_factor};
use cadiz_portfolio::{Portfolio, PortfolioOptimizer, to_returns};
use cadiz_traits::{
    CadizError, CombinedRank, FactorFamily, MetricTable, PriceTable, Result, Symbol,
};
use serde::Serialize;
use tracing::info;

use crate::config::PipelineConfig;

/// Metric tables keyed by the family they belong to.
pub type FamilyTables = BTreeMap<FactorFamily, MetricTable>;

/// Every intermediate result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// Per-family rankings. Empty when the run started from composites.
    pub rankings: BTreeMap<FactorFamily, FactorRanking>,
    /// Cross-family rank, best first.
    pub combined: CombinedRank,
    /// Assets handed to the optimizer, best first.
    pub candidates: Vec<Symbol>,
    /// Optimized allocation over the candidates.
    pub portfolio: Portfolio,
}

/// Ranking-to-allocation workflow driven by a [`PipelineConfig`].
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline. The configuration is validated when a run starts.
    #[must_use]
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Rank one family's table with its configured (or default) metrics.
    ///
    /// # Errors
    ///
    /// See [`rank_factor`].
    pub fn rank_family(&self, family: FactorFamily, table: &MetricTable) -> Result<FactorRanking> {
        match self.config.metric_override(family) {
            Some(specs) => rank_factor(table, specs),
            None => FactorRanker::new(create_factor(family)).rank(table),
        }
    }

    /// Run every stage starting from raw metric tables.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::Configuration`] if no tables are supplied, and
    /// propagates the first error of any stage. A solver failure is not an
    /// error; see [`Portfolio::is_fallback`].
    pub fn run(&self, tables: &FamilyTables, prices: &PriceTable) -> Result<PipelineOutput> {
        self.config.validate()?;
        if tables.is_empty() {
            return Err(CadizError::configuration("no factor tables supplied"));
        }

        let mut rankings = BTreeMap::new();
        for (&family, table) in tables {
            let ranking = self.rank_family(family, table)?;
            info!(
                %family,
                ranked = ranking.composite.len(),
                dropped = ranking.dropped.len(),
                skipped_metrics = ranking.skipped_metrics.len(),
                "ranked factor family"
            );
            rankings.insert(family, ranking);
        }

        let composites: FamilyRanks =
            rankings.iter().map(|(&family, ranking)| (family, ranking.composite.clone())).collect();
        self.finish(rankings, &composites, prices)
    }

    /// Run from precomputed composite ranks, skipping the ranking stage.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_with_composites(&self, composites: &FamilyRanks, prices: &PriceTable) -> Result<PipelineOutput> {
        self.config.validate()?;
        if composites.is_empty() {
            return Err(CadizError::configuration("no composite ranks supplied"));
        }
        self.finish(BTreeMap::new(), composites, prices)
    }

    fn finish(
        &self,
        rankings: BTreeMap<FactorFamily, FactorRanking>,
        composites: &FamilyRanks,
        prices: &PriceTable,
    ) -> Result<PipelineOutput> {
        let combined = self.combine(composites)?;
        info!(assets = combined.len(), "combined family ranks");

        let candidates = select_top_n(&combined, self.config.top_n)?;
        info!(candidates = ?candidates, "selected candidates");

        let returns = to_returns(&prices.select(&candidates)?)?;
        let portfolio = PortfolioOptimizer::new(self.config.objective, self.config.periods_per_year)
            .with_solver_config(self.config.optimizer)
            .optimize(&returns)?;
        info!(
            objective = %portfolio.objective,
            sharpe = portfolio.statistics.sharpe_ratio,
            fallback = portfolio.is_fallback,
            "optimized portfolio"
        );

        Ok(PipelineOutput { rankings, combined, candidates, portfolio })
    }

    fn combine(&self, composites: &FamilyRanks) -> Result<CombinedRank> {
        match &self.config.factor_weights {
            Some(weights) => WeightedRankCombiner::new(weights.clone()).combine(composites),
            None => EqualWeightCombiner::new().combine(composites),
        }
    }
}
