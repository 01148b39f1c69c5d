//! The fuzzy match index.
//!
//! [`FuzzyIndex`] is built once over a shared, read-only slice of items and
//! a set of weighted [`Key`]s. Every extracted field value is normalized at
//! build time so that a search only prepares the query and walks the
//! pre-lowercased fields.
//!
//! # Aggregate scoring
//!
//! Each key contributes its best value's score, and only when that score is
//! within the threshold. A contributing key's score `s` is then biased by
//! its weight `w`:
//!
//! ```text
//! adjusted = s + (threshold - s) * WEIGHT_BIAS * (1 - w / max_weight)
//! ```
//!
//! so that the heaviest key keeps its raw score and lighter keys drift
//! toward the threshold. The record's score is the best adjusted score,
//! shrunk by `(1 - COVERAGE_BONUS * w_j / total_weight)` for every other
//! contributing key `j`. Both steps keep the score inside
//! `[0.0, threshold]`, and an exact match on the heaviest key stays at `0.0`.

use std::sync::Arc;

use tracing::debug;

use crate::error::IndexError;
use crate::key::Key;
use crate::options::SearchOptions;
use crate::ranking::{PreparedQuery, PreparedText, rank_prepared};
use crate::sort::sort_matches;

/// How far a light key's score is pulled toward the threshold.
pub const WEIGHT_BIAS: f64 = 0.5;

/// Maximum share by which additional matching keys shrink the score.
pub const COVERAGE_BONUS: f64 = 0.25;

/// A ranked search hit.
///
/// Scores follow the "lower is better" convention and are only meaningful
/// for ordering results of the same search.
#[derive(Debug)]
pub struct MatchResult<'a, T> {
    /// The matched item.
    pub item: &'a T,
    /// Position of the item in the indexed slice.
    pub index: usize,
    /// Aggregate score in `[0.0, threshold]`.
    pub score: f64,
    /// Index of the key that produced the best adjusted score.
    pub key_index: usize,
}

impl<T> Clone for MatchResult<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MatchResult<'_, T> {}

/// Weight and name of a key, kept after its extractor has run.
#[derive(Debug, Clone)]
struct IndexedKey {
    name: String,
    weight: f64,
}

/// Prepared field values of one item, indexed by key then by value.
#[derive(Debug, Clone)]
struct IndexEntry {
    fields: Vec<Vec<PreparedText>>,
}

/// A searchable, immutable index over a shared slice of items.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use wandersearch::{FuzzyIndex, Key, SearchOptions};
///
/// let cities: Arc<[String]> = vec!["Lisbon".to_owned(), "London".to_owned()].into();
/// let keys = vec![Key::new(|s: &String| vec![s.clone()]).named("city")];
/// let index = FuzzyIndex::new(cities, keys, SearchOptions::default()).unwrap();
///
/// let hits = index.search("lisb");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].item, "Lisbon");
///
/// // Queries shorter than two characters never match.
/// assert!(index.search("l").is_empty());
/// ```
#[derive(Debug)]
pub struct FuzzyIndex<T> {
    items: Arc<[T]>,
    keys: Vec<IndexedKey>,
    entries: Vec<IndexEntry>,
    options: SearchOptions,
    max_weight: f64,
    total_weight: f64,
}

impl<T> FuzzyIndex<T> {
    /// Build an index over `items` using `keys`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::NoKeys`] for an empty key list,
    /// [`IndexError::InvalidWeight`] for a non-finite or non-positive weight,
    /// and the errors of [`SearchOptions::validate`].
    pub fn new(items: Arc<[T]>, keys: Vec<Key<T>>, options: SearchOptions) -> Result<Self, IndexError> {
        if keys.is_empty() {
            return Err(IndexError::NoKeys);
        }
        options.validate()?;
        for key in &keys {
            key.validate()?;
        }

        let entries = items
            .iter()
            .map(|item| IndexEntry {
                fields: keys
                    .iter()
                    .map(|key| {
                        key.extract(item)
                            .iter()
                            .map(|value| PreparedText::new(value, options.keep_diacritics))
                            .collect()
                    })
                    .collect(),
            })
            .collect();

        let max_weight = keys.iter().map(|k| k.weight).fold(f64::MIN, f64::max);
        let total_weight = keys.iter().map(|k| k.weight).sum();
        let keys: Vec<IndexedKey> = keys
            .into_iter()
            .map(|k| IndexedKey {
                name: k.name,
                weight: k.weight,
            })
            .collect();

        debug!(
            items = items.len(),
            keys = ?keys.iter().map(|k| k.name.as_str()).collect::<Vec<_>>(),
            threshold = options.threshold,
            "built fuzzy index"
        );

        Ok(Self {
            items,
            keys,
            entries,
            options,
            max_weight,
            total_weight,
        })
    }

    /// Search the index, returning every match ordered best first.
    ///
    /// The query is trimmed; if fewer than `min_match_len` characters remain
    /// the result is empty. Results are sorted ascending by score, with ties
    /// kept in item order.
    pub fn search(&self, query: &str) -> Vec<MatchResult<'_, T>> {
        let trimmed = query.trim();
        let min_len = self.options.min_match_len.max(1);
        if trimmed.chars().count() < min_len {
            return Vec::new();
        }

        let prepared = PreparedQuery::new(trimmed, self.options.keep_diacritics);
        if prepared.char_len() < min_len {
            return Vec::new();
        }

        let mut results: Vec<MatchResult<'_, T>> = self
            .items
            .iter()
            .zip(&self.entries)
            .enumerate()
            .filter_map(|(index, (item, entry))| {
                self.score_entry(entry, &prepared)
                    .map(|(score, key_index)| MatchResult {
                        item,
                        index,
                        score,
                        key_index,
                    })
            })
            .collect();

        sort_matches(&mut results);

        debug!(query = trimmed, hits = results.len(), "fuzzy search");
        results
    }

    /// Search and keep at most `limit` results.
    pub fn search_limit(&self, query: &str, limit: usize) -> Vec<MatchResult<'_, T>> {
        let mut results = self.search(query);
        results.truncate(limit);
        results
    }

    /// The indexed items, in their original order.
    pub fn items(&self) -> &Arc<[T]> {
        &self.items
    }

    /// The options this index was built with.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Names of the indexed keys, in key order.
    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.name.as_str())
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the index holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Aggregate score of one entry, with the index of its dominant key.
    fn score_entry(&self, entry: &IndexEntry, query: &PreparedQuery) -> Option<(f64, usize)> {
        let threshold = self.options.threshold;

        // (key index, adjusted score) for every key within the threshold.
        let mut contributing: Vec<(usize, f64)> = Vec::new();
        for (key_index, (key, values)) in self.keys.iter().zip(&entry.fields).enumerate() {
            let best = values
                .iter()
                .map(|value| rank_prepared(value, query, &self.options))
                .filter(|ranking| ranking.is_match())
                .map(|ranking| ranking.score())
                .fold(f64::INFINITY, f64::min);
            if best > threshold {
                continue;
            }
            let bias = WEIGHT_BIAS * (1.0 - key.weight / self.max_weight);
            contributing.push((key_index, best + (threshold - best) * bias));
        }

        // Strict comparison keeps the earliest key on ties.
        let &(best_key, best_score) = contributing
            .iter()
            .reduce(|a, b| if b.1 < a.1 { b } else { a })?;

        let score = contributing
            .iter()
            .filter(|(key_index, _)| *key_index != best_key)
            .fold(best_score, |acc, (key_index, _)| {
                acc * (1.0 - COVERAGE_BONUS * self.keys[*key_index].weight / self.total_weight)
            });

        Some((score, best_key))
    }
}
