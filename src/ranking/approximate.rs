//! Approximate substring matching.
//!
//! Finds the minimal number of edits (insertions, deletions, substitutions)
//! needed to turn the whole query into *some* substring of the candidate,
//! using the semi-global edit-distance recurrence: the alignment may begin
//! and end anywhere in the candidate at no cost, but every query character
//! must be accounted for.

/// Best alignment found by [`approximate_substring`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    /// Number of edits in the best alignment.
    pub errors: usize,
    /// Character offset in the candidate where the alignment begins.
    pub start: usize,
}

/// Compute the best approximate occurrence of `pattern` inside `text`.
///
/// Returns `None` if `pattern` is empty or if every alignment needs more
/// than `max_errors` edits. Among alignments with the fewest edits, the one
/// ending earliest in `text` wins, and among
/// those the one beginning earliest.
///
/// # Examples
///
/// ```
/// use wandersearch::ranking::approximate::approximate_substring;
///
/// let text: Vec<char> = "visit tokyo tower".chars().collect();
/// let typo: Vec<char> = "tokio".chars().collect();
/// let found = approximate_substring(&text, &typo, 1).unwrap();
/// assert_eq!(found.errors, 1);
/// assert_eq!(found.start, 6);
///
/// let unrelated: Vec<char> = "zzzzz".chars().collect();
/// assert!(approximate_substring(&text, &unrelated, 1).is_none());
/// ```
pub fn approximate_substring(
    text: &[char],
    pattern: &[char],
    max_errors: usize,
) -> Option<Alignment> {
    let m = pattern.len();
    if m == 0 {
        return None;
    }
    // At least `m - n` pattern characters cannot be aligned to anything.
    if m.saturating_sub(text.len()) > max_errors {
        return None;
    }

    // Column `j` holds, for every pattern prefix length `i`, the cheapest
    // alignment of that prefix ending right before text position `j`.
    let mut prev_cost: Vec<usize> = (0..=m).collect();
    let mut prev_start: Vec<usize> = vec![0; m + 1];
    let mut cur_cost: Vec<usize> = vec![0; m + 1];
    let mut cur_start: Vec<usize> = vec![0; m + 1];

    let mut best = Alignment {
        errors: m,
        start: 0,
    };

    for (j, &tc) in text.iter().enumerate() {
        // Empty pattern prefix aligns for free, starting after this char.
        cur_cost[0] = 0;
        cur_start[0] = j + 1;

        for i in 1..=m {
            let substitution = (
                prev_cost[i - 1] + usize::from(pattern[i - 1] != tc),
                prev_start[i - 1],
            );
            let skip_text = (prev_cost[i] + 1, prev_start[i]);
            let skip_pattern = (cur_cost[i - 1] + 1, cur_start[i - 1]);

            // Fewest edits first, then the alignment that begins earliest.
            let (cost, start) = substitution.min(skip_text).min(skip_pattern);
            cur_cost[i] = cost;
            cur_start[i] = start;
        }

        if cur_cost[m] < best.errors {
            best = Alignment {
                errors: cur_cost[m],
                start: cur_start[m],
            };
            if best.errors == 0 {
                break;
            }
        }

        std::mem::swap(&mut prev_cost, &mut cur_cost);
        std::mem::swap(&mut prev_start, &mut cur_start);
    }

    (best.errors <= max_errors).then_some(best)
}
