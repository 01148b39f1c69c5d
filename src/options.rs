//! Tunable parameters for fuzzy matching.
//!
//! [`SearchOptions`] controls global behavior that applies across all keys
//! of an index: how lenient the fuzzy comparison is, how short a query may be
//! before it is ignored, and how text is normalized before comparison.

use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// Default match threshold on the 0.0 (exact) to 1.0 (unrelated) scale.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Default minimum number of characters a trimmed query needs to match.
pub const DEFAULT_MIN_MATCH_LEN: usize = 2;

/// Default number of characters over which an approximate match's start
/// position decays to a full point of score.
pub const DEFAULT_DISTANCE: usize = 100;

/// Global options that control fuzzy matching.
///
/// # Defaults
///
/// - `threshold`: `0.3`
/// - `min_match_len`: `2`
/// - `keep_diacritics`: `false` (diacritics are stripped before comparison)
/// - `distance`: `100`
///
/// # Examples
///
/// ```
/// use wandersearch::SearchOptions;
///
/// let opts = SearchOptions::default();
/// assert_eq!(opts.threshold, 0.3);
///
/// // A stricter index that keeps accents significant.
/// let opts = SearchOptions { threshold: 0.1, keep_diacritics: true, ..Default::default() };
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Field scores above this value are discarded. Must lie in `[0.0, 1.0]`.
    pub threshold: f64,

    /// Queries whose trimmed length (in characters) is below this value never
    /// produce matches.
    pub min_match_len: usize,

    /// When `true`, diacritics (accents, combining marks) are preserved during
    /// comparison. When `false` (default), "Tokyo" matches "Tōkyō".
    pub keep_diacritics: bool,

    /// Proximity divisor for approximate matches: a match starting `distance`
    /// characters into a field is penalized by a full point. Must be non-zero.
    pub distance: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_match_len: DEFAULT_MIN_MATCH_LEN,
            keep_diacritics: false,
            distance: DEFAULT_DISTANCE,
        }
    }
}

impl SearchOptions {
    /// Check that the options describe a usable index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidThreshold`] when `threshold` is not a
    /// finite value in `[0.0, 1.0]`, and [`IndexError::ZeroDistance`] when
    /// `distance` is zero.
    pub fn validate(&self) -> Result<(), IndexError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(IndexError::InvalidThreshold(self.threshold));
        }
        if self.distance == 0 {
            return Err(IndexError::ZeroDistance);
        }
        Ok(())
    }
}

/// Relative weights of the destination fields.
///
/// Heavier fields dominate a record's aggregate score. `travel_type` is only
/// indexed by the listing profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    /// Destination name. Default 3.0.
    pub name: f64,
    /// Default 2.0.
    pub country: f64,
    /// Default 1.5.
    pub top_attractions: f64,
    /// Default 1.2.
    pub travel_type: f64,
    /// Default 1.0.
    pub description: f64,
    /// Default 1.0.
    pub category: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 3.0,
            country: 2.0,
            top_attractions: 1.5,
            travel_type: 1.2,
            description: 1.0,
            category: 1.0,
        }
    }
}
