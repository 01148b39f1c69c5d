//! Key extraction types and builder API.
//!
//! A [`Key<T>`] describes how to extract one or more string values from an
//! item of type `T` for ranking. Each key carries an extractor closure, a
//! relative weight that biases the aggregate record score, and a name used
//! in diagnostics.

use crate::error::IndexError;

/// Extract all string values from an item for a given key.
///
/// Thin free-function wrapper around [`Key::extract`].
///
/// # Examples
///
/// ```
/// use wandersearch::key::{Key, get_item_values};
///
/// let key = Key::new(|s: &String| vec![s.clone()]);
/// let values = get_item_values(&"Lisbon".to_owned(), &key);
/// assert_eq!(values, vec!["Lisbon"]);
/// ```
pub fn get_item_values<T>(item: &T, key: &Key<T>) -> Vec<String> {
    key.extract(item)
}

/// Type alias for the boxed extractor closure stored inside a [`Key`].
type Extractor<T> = Box<dyn Fn(&T) -> Vec<String> + Send + Sync>;

/// A single weighted key for extracting matchable string values from an item.
///
/// Keys are constructed via [`Key::new`], [`Key::from_fn`], or
/// [`Key::from_fn_multi`], then optionally refined with [`Key::weight`] and
/// [`Key::named`].
///
/// # Examples
///
/// ```
/// use wandersearch::key::Key;
///
/// struct Place { name: String, tags: Vec<String> }
///
/// let name = Key::<Place>::from_fn(|p| p.name.as_str()).named("name").weight(3.0);
/// let tags = Key::<Place>::from_fn_multi(|p| p.tags.iter().map(String::as_str).collect())
///     .named("tags")
///     .weight(1.2);
/// assert_eq!(name.weight_value(), 3.0);
/// assert_eq!(tags.name(), "tags");
/// ```
pub struct Key<T> {
    /// Returns a `Vec<String>` to support multi-valued fields (e.g. tags).
    extractor: Extractor<T>,

    /// Relative influence on the record score. Defaults to `1.0`.
    pub(crate) weight: f64,

    /// Label used in logs and build errors.
    pub(crate) name: String,
}

impl<T> Key<T> {
    /// Create a key from a closure that returns zero or more owned strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use wandersearch::key::Key;
    ///
    /// let key = Key::new(|s: &String| vec![s.clone()]);
    /// ```
    pub fn new<F>(extractor: F) -> Self
    where
        F: Fn(&T) -> Vec<String> + Send + Sync + 'static,
    {
        Self {
            extractor: Box::new(extractor),
            weight: 1.0,
            name: String::from("key"),
        }
    }

    /// Create a key from a closure that returns a single borrowed `&str`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&T) -> &str + Send + Sync + 'static,
    {
        Self::new(move |item| vec![f(item).to_owned()])
    }

    /// Create a key from a closure that returns multiple borrowed `&str`
    /// values, such as a list of attractions.
    pub fn from_fn_multi<F>(f: F) -> Self
    where
        F: Fn(&T) -> Vec<&str> + Send + Sync + 'static,
    {
        Self::new(move |item| f(item).into_iter().map(str::to_owned).collect())
    }

    /// Set the relative weight of this key.
    ///
    /// Heavier keys dominate the aggregate score: a match on a key with
    /// weight `3.0` ranks ahead of an equally good match on a key with
    /// weight `1.0`. Weights must be finite and positive; this is checked
    /// when the index is built.
    #[must_use]
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the diagnostic name of this key.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }

    /// Extract string values from an item using this key's extractor closure.
    ///
    /// An empty vector means the item produces no match candidates for this
    /// key.
    pub fn extract(&self, item: &T) -> Vec<String> {
        (self.extractor)(item)
    }

    /// Returns the relative weight of this key.
    pub fn weight_value(&self) -> f64 {
        self.weight
    }

    /// Returns the diagnostic name of this key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reject weights the aggregate scoring cannot use.
    pub(crate) fn validate(&self) -> Result<(), IndexError> {
        if self.weight.is_finite() && self.weight > 0.0 {
            Ok(())
        } else {
            Err(IndexError::InvalidWeight {
                key: self.name.clone(),
                weight: self.weight,
            })
        }
    }
}

impl<T> std::fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Place {
        name: String,
        country: String,
        attractions: Vec<String>,
    }

    fn sample_place() -> Place {
        Place {
            name: "Kyoto".to_owned(),
            country: "Japan".to_owned(),
            attractions: vec!["Fushimi Inari".to_owned(), "Kinkaku-ji".to_owned()],
        }
    }

    #[test]
    fn new_accepts_closure_returning_vec_string() {
        let key = Key::new(|p: &Place| vec![p.name.clone()]);
        assert_eq!(key.extract(&sample_place()), vec!["Kyoto"]);
    }

    #[test]
    fn new_defaults() {
        let key = Key::new(|_: &Place| vec![]);
        assert_eq!(key.weight, 1.0);
        assert_eq!(key.name, "key");
    }

    #[test]
    fn from_fn_equivalent_to_new_with_vec() {
        let place = sample_place();
        let key_new = Key::new(|p: &Place| vec![p.country.clone()]);
        let key_fn = Key::<Place>::from_fn(|p| p.country.as_str());
        assert_eq!(key_new.extract(&place), key_fn.extract(&place));
    }

    #[test]
    fn from_fn_multi_extracts_in_order() {
        let key = Key::<Place>::from_fn_multi(|p| p.attractions.iter().map(String::as_str).collect());
        assert_eq!(key.extract(&sample_place()), vec!["Fushimi Inari", "Kinkaku-ji"]);
    }

    #[test]
    fn from_fn_multi_empty_vec() {
        let key = Key::<Place>::from_fn_multi(|_| vec![]);
        assert!(key.extract(&sample_place()).is_empty());
    }

    #[test]
    fn builder_chain_preserves_extractor() {
        let key = Key::<Place>::from_fn(|p| p.name.as_str())
            .weight(3.0)
            .named("name");
        assert_eq!(key.weight_value(), 3.0);
        assert_eq!(key.name(), "name");
        assert_eq!(key.extract(&sample_place()), vec!["Kyoto"]);
    }

    #[test]
    fn get_item_values_delegates_to_extract() {
        let key = Key::<Place>::from_fn(|p| p.country.as_str());
        assert_eq!(get_item_values(&sample_place(), &key), vec!["Japan"]);
    }

    #[test]
    fn validate_accepts_positive_weight() {
        let key = Key::<Place>::from_fn(|p| p.name.as_str()).weight(0.5);
        assert!(key.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_weights() {
        for weight in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let key = Key::<Place>::from_fn(|p| p.name.as_str())
                .named("name")
                .weight(weight);
            match key.validate() {
                Err(IndexError::InvalidWeight { key, .. }) => assert_eq!(key, "name"),
                other => panic!("weight {weight} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn debug_shows_name_and_weight() {
        let key = Key::<Place>::from_fn(|p| p.name.as_str()).named("name").weight(2.0);
        let debug = format!("{key:?}");
        assert!(debug.contains("name"));
        assert!(debug.contains("2.0"));
    }
}
