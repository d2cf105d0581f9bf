#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cadiz/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types shared by every cadiz crate.
//!
//! This crate holds the data model (metric tables, score tables, price and
//! return panels), the ranking configuration types, the [`Factor`] trait and
//! the error taxonomy.

/// The version of the cadiz-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod factor;
pub mod scores;
pub mod series;
pub mod spec;
pub mod stats;
pub mod table;
pub mod types;

pub use error::{CadizError, Result};
pub use factor::Factor;
pub use scores::{CombinedRank, CompositeFactorRank, FactorRank, ScoreEntry, ScoreTable};
pub use series::{CE_TO_UNIX_EPOCH_DAYS, PriceTable, ReturnTable};
pub use spec::{Direction, MetricFilter, MetricSpec};
pub use table::{MetricTable, MetricTableBuilder, MetricValue};
pub use types::{Date, FactorFamily, Symbol};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
