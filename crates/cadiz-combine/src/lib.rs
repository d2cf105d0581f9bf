//! Rank combination strategies for cadiz.
//!
//! This crate merges per-family composite ranks into one cross-family rank
//! and picks the best candidates from it.
//!
//! # Examples
//!
//! ```rust
//! use cadiz_combine::{Combiner, EqualWeightCombiner, FamilyRanks, select_top_n};
//! use cadiz_traits::{FactorFamily, ScoreTable};
//!
//! let mut ranks = FamilyRanks::new();
//! ranks.insert(FactorFamily::Value, ScoreTable::from_pairs([("A", 2.0), ("B", 1.0), ("C", 3.0)]).unwrap());
//! ranks.insert(FactorFamily::Momentum, ScoreTable::from_pairs([("A", 1.0), ("B", 2.0), ("C", 3.0)]).unwrap());
//!
//! let combined = EqualWeightCombiner::new().combine(&ranks).unwrap();
//! let top = select_top_n(&combined, 2).unwrap();
//! assert_eq!(top, vec!["A", "B"]);
//! ```

mod combiner;
mod equal_weight;
mod select;
mod weighted;
mod weights;

pub use combiner::{Combiner, FamilyRanks};
pub use equal_weight::EqualWeightCombiner;
pub use select::select_top_n;
pub use weighted::WeightedRankCombiner;
pub use weights::FactorWeights;
