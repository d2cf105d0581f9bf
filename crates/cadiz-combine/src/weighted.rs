//! Weighted cross-family rank combination with median imputation.

use std::collections::HashSet;

use cadiz_traits::{CadizError, CombinedRank, Result, Symbol};
use tracing::debug;

use crate::combiner::{Combiner, FamilyRanks};
use crate::weights::FactorWeights;

/// Combines family composites as a weighted sum of ranks.
///
/// The universe is the union of assets across every provided family. For
/// each weighted family, an asset without a composite rank there is imputed
/// to that family's median composite rank. Families present without a
/// weight do not contribute to the score but still widen the universe.
///
/// # Examples
///
/// ```rust
/// use cadiz_combine::{Combiner, FactorWeights, FamilyRanks, WeightedRankCombiner};
/// use cadiz_traits::{FactorFamily, ScoreTable};
///
/// let mut ranks = FamilyRanks::new();
/// ranks.insert(FactorFamily::Value, ScoreTable::from_pairs([("A", 1.0), ("B", 2.0)]).unwrap());
/// ranks.insert(FactorFamily::Momentum, ScoreTable::from_pairs([("A", 2.0), ("B", 1.0)]).unwrap());
///
/// let weights = FactorWeights::new()
///     .with(FactorFamily::Value, 0.75)
///     .with(FactorFamily::Momentum, 0.25);
/// let combined = WeightedRankCombiner::new(weights).combine(&ranks).unwrap();
/// assert_eq!(combined.symbols(), &["A", "B"]);
/// ```
#[derive(Debug, Clone)]
pub struct WeightedRankCombiner {
    weights: FactorWeights,
}

impl WeightedRankCombiner {
    /// Create a combiner with the given (unnormalized) weights.
    #[must_use]
    pub const fn new(weights: FactorWeights) -> Self {
        Self { weights }
    }

    /// The configured weights.
    #[must_use]
    pub const fn weights(&self) -> &FactorWeights {
        &self.weights
    }
}

impl Combiner for WeightedRankCombiner {
    fn combine(&self, ranks: &FamilyRanks) -> Result<CombinedRank> {
        let weights = self.weights.normalized()?;

        let mut weighted = Vec::with_capacity(weights.len());
        for (family, weight) in weights.iter() {
            let composite = ranks.get(&family).ok_or_else(|| {
                CadizError::configuration(format!("weighted family {family} has no composite ranks"))
            })?;
            let median = composite.median().ok_or_else(|| {
                CadizError::data_quality(format!("family {family} ranked no assets"))
            })?;
            weighted.push((family, weight, composite, median));
        }

        // Union of assets in family order, first-seen within each family
        let mut seen = HashSet::new();
        let mut universe: Vec<&Symbol> = Vec::new();
        for composite in ranks.values() {
            for symbol in composite.symbols() {
                if seen.insert(symbol.as_str()) {
                    universe.push(symbol);
                }
            }
        }

        let mut scores = vec![0.0; universe.len()];
        for (family, weight, composite, median) in &weighted {
            let mut imputed = 0usize;
            for (score, symbol) in scores.iter_mut().zip(&universe) {
                let rank = composite.get(symbol).unwrap_or_else(|| {
                    imputed += 1;
                    *median
                });
                *score += weight * rank;
            }
            debug!(%family, weight, median, imputed, "applied family weight");
        }

        let combined = CombinedRank::from_pairs(universe.into_iter().cloned().zip(scores))?;
        Ok(combined.sorted_ascending())
    }

    fn name(&self) -> &str {
        "weighted_rank"
    }
}
