//! Candidate selection from a combined rank.

use cadiz_traits::{CadizError, CombinedRank, Result, Symbol};

/// The `n` best assets (lowest combined score), best first.
///
/// Ties keep the order of `combined`.
///
/// # Errors
///
/// Returns [`CadizError::InvalidParameter`] if `n` is zero or larger than the
/// number of ranked assets.
///
/// # Examples
///
/// ```rust
/// use cadiz_combine::select_top_n;
/// use cadiz_traits::ScoreTable;
///
/// let combined = ScoreTable::from_pairs([("A", 1.0), ("B", 2.0), ("C", 1.0)]).unwrap();
/// assert_eq!(select_top_n(&combined, 2).unwrap(), vec!["A", "C"]);
/// ```
pub fn select_top_n(combined: &CombinedRank, n: usize) -> Result<Vec<Symbol>> {
    if n == 0 {
        return Err(CadizError::invalid_parameter("top_n must be at least 1"));
    }
    if n > combined.len() {
        return Err(CadizError::invalid_parameter(format!(
            "top_n = {n} exceeds the {} ranked assets",
            combined.len()
        )));
    }
    Ok(combined.sorted_ascending().head(n).symbols().to_vec())
}
