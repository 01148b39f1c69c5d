//! Ranking tiers and scoring logic for comparing one field value to a query.
//!
//! This module classifies a candidate string into one of six tiers, checked
//! in descending order of specificity, from full equality down to an
//! approximate (edit-distance) substring match. Every tier maps onto the
//! score scale used by the index, where `0.0` is an exact match and `1.0`
//! means no similarity.

pub mod approximate;

use std::borrow::Cow;
use std::cmp::Ordering;

use memchr::memmem::Finder;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::options::SearchOptions;
use approximate::{Alignment, approximate_substring};

/// Score of a prefix match that covers the whole candidate but one char.
pub const STARTS_WITH_BASE: f64 = 0.02;

/// Extra score a prefix match picks up as the uncovered remainder grows.
pub const STARTS_WITH_SPAN: f64 = 0.04;

/// Score of a query found at the start of an inner word.
pub const WORD_STARTS_WITH_SCORE: f64 = 0.08;

/// Score of a query found anywhere else as a substring.
pub const CONTAINS_SCORE: f64 = 0.12;

/// Lowest score an approximate match can reach, keeping every approximate
/// match behind every exact substring match.
pub const APPROXIMATE_FLOOR: f64 = 0.15;

/// Represents the quality of a match between a candidate string and a query.
///
/// | Tier             | Score            | Description                                  |
/// |------------------|------------------|----------------------------------------------|
/// | `Equal`          | 0.0              | Full match, ignoring case (and diacritics)   |
/// | `StartsWith`     | 0.02 .. 0.06     | Candidate starts with the query              |
/// | `WordStartsWith` | 0.08             | A word inside the candidate starts with it   |
/// | `Contains`       | 0.12             | Candidate contains the query as a substring  |
/// | `Approximate`    | 0.15 .. 1.0      | Query found with edits (typos, missing chars) |
/// | `NoMatch`        | 1.0              | No match found                               |
///
/// # Ordering
///
/// `Ranking` implements [`PartialOrd`] such that higher-quality matches
/// compare as greater, i.e. a *lower* score is a *greater* ranking.
/// `NoMatch` is below everything else.
#[derive(Debug, Clone, Copy)]
pub enum Ranking {
    /// Full match after lowercasing.
    Equal,
    /// Candidate starts with the query. Carries the fraction of the
    /// candidate's characters covered by the query, in `(0.0, 1.0)`.
    StartsWith(f64),
    /// The query starts a word inside the candidate (after a space or hyphen).
    WordStartsWith,
    /// Candidate contains the query somewhere else.
    Contains,
    /// Approximate substring match. Carries the precomputed score, which
    /// combines the error ratio and the distance from the field start.
    Approximate(f64),
    /// No match found.
    NoMatch,
}

impl Ranking {
    /// Returns this ranking on the 0.0 (exact) to 1.0 (unrelated) scale.
    ///
    /// # Examples
    ///
    /// ```
    /// use wandersearch::Ranking;
    ///
    /// assert_eq!(Ranking::Equal.score(), 0.0);
    /// assert_eq!(Ranking::Contains.score(), 0.12);
    /// assert_eq!(Ranking::NoMatch.score(), 1.0);
    /// assert!(Ranking::StartsWith(0.9).score() < Ranking::StartsWith(0.2).score());
    /// ```
    pub fn score(&self) -> f64 {
        match self {
            Ranking::Equal => 0.0,
            Ranking::StartsWith(coverage) => {
                STARTS_WITH_BASE + STARTS_WITH_SPAN * (1.0 - coverage.clamp(0.0, 1.0))
            }
            Ranking::WordStartsWith => WORD_STARTS_WITH_SCORE,
            Ranking::Contains => CONTAINS_SCORE,
            Ranking::Approximate(score) => *score,
            Ranking::NoMatch => 1.0,
        }
    }

    /// Returns `true` unless this is [`Ranking::NoMatch`].
    pub fn is_match(&self) -> bool {
        !matches!(self, Ranking::NoMatch)
    }
}

// Manual `PartialEq` so that equality agrees with the score-based ordering
// below. `f64` payloads rule out `Eq`.
impl PartialEq for Ranking {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Ranking::NoMatch, Ranking::NoMatch) => true,
            (Ranking::NoMatch, _) | (_, Ranking::NoMatch) => false,
            _ => self.score() == other.score(),
        }
    }
}

// Lower score is a better match, so the comparison is reversed. `NoMatch`
// sits below any real match even if an approximate score reaches 1.0.
impl PartialOrd for Ranking {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Ranking::NoMatch, Ranking::NoMatch) => Some(Ordering::Equal),
            (Ranking::NoMatch, _) => Some(Ordering::Less),
            (_, Ranking::NoMatch) => Some(Ordering::Greater),
            _ => other.score().partial_cmp(&self.score()),
        }
    }
}

/// Score an approximate alignment of a query with `query_len` characters.
///
/// The error ratio is penalized by how far into the field the alignment
/// starts, floored at [`APPROXIMATE_FLOOR`] and capped at `1.0`.
fn approximate_score(alignment: Alignment, query_len: usize, distance: usize) -> f64 {
    let accuracy = alignment.errors as f64 / query_len as f64;
    let proximity = alignment.start as f64 / distance as f64;
    (accuracy + proximity).clamp(APPROXIMATE_FLOOR, 1.0)
}

/// Prepare a string for comparison by optionally stripping diacritics.
///
/// When `keep_diacritics` is `false`, applies Unicode NFD decomposition and
/// removes combining marks, so that "Zürich" compares as "Zurich". Returns
/// [`Cow::Borrowed`] when nothing had to be removed.
///
/// # Examples
///
/// ```
/// use wandersearch::ranking::prepare_value_for_comparison;
///
/// let result = prepare_value_for_comparison("Z\u{00FC}rich", false);
/// assert_eq!(result, "Zurich");
///
/// let result = prepare_value_for_comparison("Zurich", false);
/// assert!(matches!(result, std::borrow::Cow::Borrowed(_)));
///
/// let result = prepare_value_for_comparison("Z\u{00FC}rich", true);
/// assert_eq!(result, "Z\u{00FC}rich");
/// ```
pub fn prepare_value_for_comparison(s: &str, keep_diacritics: bool) -> Cow<'_, str> {
    if keep_diacritics {
        return Cow::Borrowed(s);
    }

    // ASCII strings never contain combining marks.
    if s.is_ascii() {
        return Cow::Borrowed(s);
    }

    let stripped: String = s.nfd().filter(|c| !is_combining_mark(*c)).collect();

    if stripped == s {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(stripped)
    }
}

/// Lowercase `s` into `buf`, reusing the buffer's allocation.
fn lowercase_into(s: &str, buf: &mut String) {
    buf.clear();
    buf.reserve(s.len());
    if s.is_ascii() {
        buf.extend(s.as_bytes().iter().map(|&b| b.to_ascii_lowercase() as char));
    } else {
        for c in s.chars() {
            buf.extend(c.to_lowercase());
        }
    }
}

/// A candidate value normalized once at index-build time.
#[derive(Debug, Clone)]
pub(crate) struct PreparedText {
    /// Diacritics-stripped (unless kept), lowercased text.
    lower: String,
    /// `lower` split into chars for the approximate matcher.
    chars: Vec<char>,
}

impl PreparedText {
    pub(crate) fn new(raw: &str, keep_diacritics: bool) -> Self {
        let prepared = prepare_value_for_comparison(raw, keep_diacritics);
        let mut lower = String::new();
        lowercase_into(&prepared, &mut lower);
        let chars = lower.chars().collect();
        Self { lower, chars }
    }
}

/// Pre-computed query data for amortizing repeated per-field ranking calls.
///
/// Holds the normalized query, its characters, and a substring searcher so
/// that searching a whole catalog prepares the query exactly once.
pub(crate) struct PreparedQuery {
    text: PreparedText,
    /// `None` when the query is empty, since `memmem` rejects empty needles.
    finder: Option<Finder<'static>>,
}

impl PreparedQuery {
    pub(crate) fn new(query: &str, keep_diacritics: bool) -> Self {
        let text = PreparedText::new(query, keep_diacritics);
        let finder = if text.lower.is_empty() {
            None
        } else {
            Some(Finder::new(text.lower.as_bytes()).into_owned())
        };
        Self { text, finder }
    }

    /// Number of characters in the normalized query.
    pub(crate) fn char_len(&self) -> usize {
        self.text.chars.len()
    }
}

/// Word boundaries for [`Ranking::WordStartsWith`]. Both are ASCII, so a
/// byte check on UTF-8 is exact.
fn is_word_boundary(byte: u8) -> bool {
    byte == b' ' || byte == b'-'
}

/// Rank a prepared candidate against a prepared query.
pub(crate) fn rank_prepared(
    candidate: &PreparedText,
    query: &PreparedQuery,
    options: &SearchOptions,
) -> Ranking {
    let Some(finder) = query.finder.as_ref() else {
        return Ranking::NoMatch;
    };

    if candidate.lower == query.text.lower {
        return Ranking::Equal;
    }

    let bytes = candidate.lower.as_bytes();
    let mut positions = finder.find_iter(bytes);
    if let Some(first) = positions.next() {
        if first == 0 {
            let coverage = query.char_len() as f64 / candidate.chars.len() as f64;
            return Ranking::StartsWith(coverage);
        }
        if is_word_boundary(bytes[first - 1]) {
            return Ranking::WordStartsWith;
        }
        // Later positions are all past `first`, hence non-zero.
        if positions.any(|pos| is_word_boundary(bytes[pos - 1])) {
            return Ranking::WordStartsWith;
        }
        return Ranking::Contains;
    }

    // No exact occurrence. Fall back to approximate matching, allowing only
    // as many edits as the threshold can tolerate.
    let query_len = query.char_len();
    let max_errors = (options.threshold * query_len as f64).floor() as usize;
    match approximate_substring(&candidate.chars, &query.text.chars, max_errors) {
        Some(alignment) => {
            Ranking::Approximate(approximate_score(alignment, query_len, options.distance))
        }
        None => Ranking::NoMatch,
    }
}

/// Determine how well a candidate string matches a search query.
///
/// Both inputs are normalized (diacritics stripped unless
/// `options.keep_diacritics`, then lowercased) before comparison. The query
/// is used as given; trimming is the caller's job. An empty query never
/// matches.
///
/// # Examples
///
/// ```
/// use wandersearch::{Ranking, SearchOptions, get_match_ranking};
///
/// let opts = SearchOptions::default();
/// assert_eq!(get_match_ranking("Tokyo", "tokyo", &opts), Ranking::Equal);
/// assert!(matches!(get_match_ranking("Tokyo", "tok", &opts), Ranking::StartsWith(_)));
/// assert_eq!(get_match_ranking("Rio de Janeiro", "jan", &opts), Ranking::WordStartsWith);
/// assert!(matches!(get_match_ranking("Tokyo", "tokio", &opts), Ranking::Approximate(_)));
/// assert_eq!(get_match_ranking("Tokyo", "lima", &opts), Ranking::NoMatch);
/// ```
pub fn get_match_ranking(candidate: &str, query: &str, options: &SearchOptions) -> Ranking {
    let query = PreparedQuery::new(query, options.keep_diacritics);
    let candidate = PreparedText::new(candidate, options.keep_diacritics);
    rank_prepared(&candidate, &query, options)
}
