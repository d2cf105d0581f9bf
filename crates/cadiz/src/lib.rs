#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cadiz/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # Crate Organization
//!
//! - [`traits`] - Errors, tables and the [`Factor`] trait
//! - [`factors`] - Factor families, ranking and the factor registry
//! - [`combine`] - Cross-family rank combination and candidate selection
//! - [`portfolio`] - Returns, moments and the portfolio optimizer
//! - [`config`] / [`pipeline`] - The end-to-end workflow

/// Version information for the cadiz crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod pipeline;

// ============================================================================
// Core Types
// ============================================================================

/// Core types and trait definitions.
pub mod traits {
    pub use cadiz_traits::*;
}

pub use cadiz_traits::{
    CadizError, CombinedRank, CompositeFactorRank, Date, Direction, Factor, FactorFamily,
    FactorRank, MetricFilter, MetricSpec, MetricTable, MetricValue, PriceTable, Result,
    ReturnTable, ScoreTable, Symbol,
};

// ============================================================================
// Factor Ranking
// ============================================================================

/// Factor families and per-family ranking.
///
/// Each family turns raw observations into a [`MetricTable`] and carries the
/// [`MetricSpec`]s it is ranked with:
///
/// - **Value**: P/E, P/B, dividend yield, EV/EBITDA
/// - **Momentum**: trailing returns and moving-average trend ratios
/// - **Quality**: ROE, ROA, leverage, operating margin, FCF yield
/// - **Growth**: annual and quarterly revenue and earnings growth
pub mod factors {
    pub use cadiz_factors::*;
}

// ============================================================================
// Rank Combination
// ============================================================================

/// Cross-family rank combination.
///
/// - **WeightedRankCombiner**: weighted sum of family composites, median
///   imputation for assets a family did not rank
/// - **EqualWeightCombiner**: the same with every family weighted equally
pub mod combine {
    pub use cadiz_combine::*;
}

pub use cadiz_combine::{Combiner, FactorWeights};

// ============================================================================
// Portfolio Construction
// ============================================================================

/// Long-only mean-variance optimization.
pub mod portfolio {
    pub use cadiz_portfolio::*;
}

pub use cadiz_portfolio::{Objective, Portfolio, PortfolioOptimizer};

pub use config::PipelineConfig;
pub use pipeline::{FamilyTables, Pipeline, PipelineOutput};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_reexports_resolve() {
        let family: FactorFamily = "quality".parse().unwrap();
        assert_eq!(factors::create_factor(family).name(), "quality");
        assert_eq!(Objective::default(), Objective::MaximizeSharpe);
    }
}
