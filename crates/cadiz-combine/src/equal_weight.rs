//! Equal-weighted rank combination.

use cadiz_traits::{CombinedRank, Result};

use crate::combiner::{Combiner, FamilyRanks};
use crate::weighted::WeightedRankCombiner;
use crate::weights::FactorWeights;

/// Gives every provided family the same weight.
///
/// This is the fallback when no family weights are configured. Median
/// imputation and ordering follow [`WeightedRankCombiner`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualWeightCombiner;

impl EqualWeightCombiner {
    /// Create an equal-weight combiner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Combiner for EqualWeightCombiner {
    fn combine(&self, ranks: &FamilyRanks) -> Result<CombinedRank> {
        let weights: FactorWeights = ranks.keys().map(|family| (*family, 1.0)).collect();
        WeightedRankCombiner::new(weights).combine(ranks)
    }

    fn name(&self) -> &str {
        "equal_weight"
    }
}
