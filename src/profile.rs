//! Destination key profiles.
//!
//! The suggestion dropdown and the listing page index the same catalog with
//! slightly different keys: only the listing page matches on travel types.

use crate::catalog::{Catalog, DestinationRecord};
use crate::error::IndexError;
use crate::index::FuzzyIndex;
use crate::key::Key;
use crate::options::{FieldWeights, SearchOptions};

/// A fuzzy index over destination records.
pub type DestinationIndex = FuzzyIndex<DestinationRecord>;

/// Which set of destination fields an index covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyProfile {
    /// Name, country, attractions, description, and category.
    #[default]
    Suggestions,
    /// Everything in [`KeyProfile::Suggestions`] plus travel types.
    Listing,
}

/// Build the weighted keys for a profile.
pub fn destination_keys(profile: KeyProfile, weights: &FieldWeights) -> Vec<Key<DestinationRecord>> {
    let mut keys = vec![
        Key::<DestinationRecord>::from_fn(|d| d.name.as_str())
            .named("name")
            .weight(weights.name),
        Key::<DestinationRecord>::from_fn(|d| d.country.as_str())
            .named("country")
            .weight(weights.country),
        Key::<DestinationRecord>::from_fn_multi(|d| {
            d.top_attractions.iter().map(String::as_str).collect()
        })
        .named("topAttractions")
        .weight(weights.top_attractions),
        Key::<DestinationRecord>::from_fn(|d| d.description.as_str())
            .named("description")
            .weight(weights.description),
        Key::<DestinationRecord>::from_fn(|d| d.category.as_str())
            .named("category")
            .weight(weights.category),
    ];
    if profile == KeyProfile::Listing {
        keys.push(
            Key::<DestinationRecord>::from_fn_multi(|d| d.travel_type.iter().map(String::as_str).collect())
                .named("travelType")
                .weight(weights.travel_type),
        );
    }
    keys
}

/// Build a destination index over the whole catalog.
///
/// # Errors
///
/// Fails when `options` or `weights` are invalid; see [`FuzzyIndex::new`].
pub fn destination_index(
    catalog: &Catalog,
    options: SearchOptions,
    weights: &FieldWeights,
    profile: KeyProfile,
) -> Result<DestinationIndex, IndexError> {
    FuzzyIndex::new(catalog.shared(), destination_keys(profile, weights), options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_profile_skips_travel_type() {
        let names: Vec<String> = destination_keys(KeyProfile::Suggestions, &FieldWeights::default())
            .iter()
            .map(|k| k.name().to_owned())
            .collect();
        assert_eq!(names, ["name", "country", "topAttractions", "description", "category"]);
    }

    #[test]
    fn listing_profile_adds_travel_type() {
        let keys = destination_keys(KeyProfile::Listing, &FieldWeights::default());
        let last = keys.last().unwrap();
        assert_eq!(last.name(), "travelType");
        assert_eq!(last.weight_value(), 1.2);
    }

    #[test]
    fn bad_weight_fails_index_build() {
        let catalog = Catalog::from_records(Vec::new()).unwrap();
        let weights = FieldWeights {
            country: 0.0,
            ..Default::default()
        };
        let err = destination_index(&catalog, SearchOptions::default(), &weights, KeyProfile::Suggestions)
            .unwrap_err();
        assert!(matches!(err, IndexError::InvalidWeight { ref key, .. } if key == "country"));
    }
}
