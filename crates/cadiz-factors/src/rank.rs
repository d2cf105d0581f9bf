//! Average-tie ranking.

use std::cmp::Ordering;

use cadiz_traits::Direction;

/// Rank `values` 1-based in the given direction.
///
/// Tied values receive the mean of the positions they span, so three equal
/// values all get rank 2. Values must be finite; callers filter beforehand.
///
/// # Examples
///
/// ```
/// use cadiz_factors::rank::average_ranks;
/// use cadiz_traits::Direction;
///
/// assert_eq!(average_ranks(&[1.0, 2.0, 3.0], Direction::Ascending), vec![1.0, 2.0, 3.0]);
/// assert_eq!(average_ranks(&[1.0, 2.0, 3.0], Direction::Descending), vec![3.0, 2.0, 1.0]);
/// assert_eq!(average_ranks(&[5.0, 5.0, 5.0], Direction::Ascending), vec![2.0, 2.0, 2.0]);
/// ```
#[must_use]
pub fn average_ranks(values: &[f64], direction: Direction) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| compare(values[a], values[b], direction));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }

        // Positions i..j (0-based) share the mean 1-based rank
        let avg_rank = (i + j + 1) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg_rank;
        }
        i = j;
    }

    ranks
}

fn compare(a: f64, b: f64, direction: Direction) -> Ordering {
    match direction {
        Direction::Ascending => a.total_cmp(&b),
        Direction::Descending => b.total_cmp(&a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ascending() {
        assert_eq!(average_ranks(&[3.0, 1.0, 2.0], Direction::Ascending), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_descending() {
        assert_eq!(average_ranks(&[3.0, 1.0, 2.0], Direction::Descending), vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_partial_ties() {
        let ranks = average_ranks(&[10.0, 20.0, 20.0, 30.0], Direction::Ascending);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);

        let ranks = average_ranks(&[10.0, 20.0, 20.0, 30.0], Direction::Descending);
        assert_eq!(ranks, vec![4.0, 2.5, 2.5, 1.0]);
    }

    #[test]
    fn test_all_tied() {
        assert_eq!(average_ranks(&[5.0, 5.0, 5.0], Direction::Descending), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(average_ranks(&[], Direction::Ascending).is_empty());
        assert_eq!(average_ranks(&[-4.2], Direction::Ascending), vec![1.0]);
    }

    #[test]
    fn test_rank_sum_invariant() {
        let values = [0.3, -1.0, 0.3, 7.5, 2.0, 2.0, 2.0];
        let ranks = average_ranks(&values, Direction::Ascending);
        let n = values.len() as f64;
        assert_relative_eq!(ranks.iter().sum::<f64>(), n * (n + 1.0) / 2.0);
    }
}
