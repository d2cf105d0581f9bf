//! Factor families and rank aggregation for cadiz.
//!
//! This crate provides:
//! - The four factor families (value, momentum, quality, growth), each with
//!   a default metric set and a builder turning raw observations into a
//!   [`MetricTable`](cadiz_traits::MetricTable)
//! - [`rank_factor`]: per-metric average-tie ranking and the per-asset
//!   composite rank
//! - A registry for discovering factors
//!
//! # Example
//!
//! ```
//! use cadiz_factors::{FactorRanker, ValueFactor, ValueObservation};
//!
//! let factor = ValueFactor::default();
//! let table = factor
//!     .build_table(&[
//!         ValueObservation { symbol: "A".into(), trailing_pe: Some(12.0), ..Default::default() },
//!         ValueObservation { symbol: "B".into(), trailing_pe: Some(25.0), ..Default::default() },
//!     ])
//!     .unwrap();
//!
//! let ranking = FactorRanker::new(factor).rank(&table).unwrap();
//! assert_eq!(ranking.composite.get("A"), Some(1.0));
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod growth;
pub mod momentum;
pub mod quality;
pub mod rank;
pub mod ranker;
pub mod registry;
pub mod value;

pub use growth::{GrowthConfig, GrowthFactor, GrowthHistory};
pub use momentum::{MomentumConfig, MomentumFactor, PriceHistory, ReturnLookback};
pub use quality::{FinancialSnapshot, QualityConfig, QualityFactor};
pub use ranker::{FactorRanker, FactorRanking, MetricRank, rank_factor};
pub use registry::{FactorInfo, available_factors, create_factor, factor_info, factors_by_family};
pub use value::{ValueConfig, ValueFactor, ValueObservation};
