//! Core trait definition for rank combiners.

use std::collections::BTreeMap;

use cadiz_traits::{CombinedRank, CompositeFactorRank, FactorFamily, Result};

/// Composite ranks keyed by family, iterated in [`FactorFamily`] order.
pub type FamilyRanks = BTreeMap<FactorFamily, CompositeFactorRank>;

/// Combines per-family composite ranks into one cross-family rank.
///
/// Implementors define how families are weighted and how an asset missing
/// from a family is treated. All implementations must be thread-safe.
///
/// # Examples
///
/// ```rust
/// use cadiz_combine::{Combiner, FamilyRanks};
/// use cadiz_traits::{CombinedRank, Result};
///
/// struct FirstFamily;
///
/// impl Combiner for FirstFamily {
///     fn combine(&self, ranks: &FamilyRanks) -> Result<CombinedRank> {
///         Ok(ranks.values().next().cloned().unwrap_or_default())
///     }
///
///     fn name(&self) -> &str {
///         "first_family"
///     }
/// }
/// ```
pub trait Combiner: Send + Sync {
    /// Combine composite ranks into a single rank, sorted ascending (best
    /// first).
    ///
    /// # Errors
    ///
    /// Returns an error if the combination is not well defined for the given
    /// families (for example a weighted family is absent).
    fn combine(&self, ranks: &FamilyRanks) -> Result<CombinedRank>;

    /// Name of this combination strategy.
    fn name(&self) -> &str;
}
