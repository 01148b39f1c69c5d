//! Ordering of fuzzy matches.
//!
//! Matches are ordered by aggregate score (ascending, lower is better), then
//! by their position in the indexed slice so that equal scores keep catalog
//! order.

use std::cmp::Ordering;

use crate::index::MatchResult;

/// Two-level comparator for fuzzy matches.
///
/// 1. **Lower score wins**. Incomparable scores (NaN) are treated as equal.
/// 2. **Earlier item wins** when scores are equal.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use wandersearch::{MatchResult, compare_matches};
///
/// let items = ["Tokyo".to_owned(), "Kyoto".to_owned()];
/// let a = MatchResult { item: &items[0], index: 0, score: 0.0, key_index: 0 };
/// let b = MatchResult { item: &items[1], index: 1, score: 0.1, key_index: 0 };
/// assert_eq!(compare_matches(&a, &b), Ordering::Less);
/// ```
pub fn compare_matches<T>(a: &MatchResult<'_, T>, b: &MatchResult<'_, T>) -> Ordering {
    a.score
        .partial_cmp(&b.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.index.cmp(&b.index))
}

/// Sort matches in place, best first.
pub fn sort_matches<T>(matches: &mut [MatchResult<'_, T>]) {
    matches.sort_by(compare_matches);
}
