#![warn(missing_docs)]

//! Fuzzy destination search.
//!
//! `wandersearch` ranks an in-memory catalog of travel destinations against
//! free-text queries. It provides the pieces a destination browser needs on
//! top of that ranking: a live autocomplete controller for a search box and a
//! filter, sort, and paginate pipeline for the listing page.
//!
//! ```
//! use wandersearch::{Catalog, FieldWeights, KeyProfile, SearchOptions, destination_index};
//!
//! let catalog = Catalog::from_json_str(r#"[{
//!     "id": 1, "name": "Lisbon", "country": "Portugal", "continent": "Europe",
//!     "description": "Trams, tiles and custard tarts", "category": "Cultural",
//!     "travelType": ["Cultural", "Food"], "topAttractions": ["Belém Tower"],
//!     "budgetLevel": "Medium", "bestSeason": "Mar - May", "duration": "1 Week",
//!     "rating": 4.6, "price": "From $95/night"
//! }]"#).unwrap();
//!
//! let index = destination_index(
//!     &catalog, SearchOptions::default(), &FieldWeights::default(), KeyProfile::Suggestions,
//! ).unwrap();
//! let hits = index.search("lisbn");
//! assert_eq!(hits[0].item.name, "Lisbon");
//! ```

/// Ranking of a single candidate string against a query.
pub mod ranking;

/// Weighted keys for pulling matchable strings out of records.
pub mod key;

/// Tunable matching parameters and field weights.
pub mod options;

/// The searchable index and its aggregate scoring.
pub mod index;

/// Ordering of match results.
pub mod sort;

/// Destination records and the validated catalog.
pub mod catalog;

/// Destination key sets for the suggestion and listing indexes.
pub mod profile;

/// TOML configuration.
pub mod config;

/// Live suggestions for a search box.
pub mod autocomplete;

/// Filter, sort, and paginate pipeline for the browse view.
pub mod listing;

/// Injected user preferences with change notification.
pub mod preferences;

/// Image enrichment through an external collaborator.
pub mod images;

mod error;

pub use autocomplete::{AutocompleteController, AutocompleteState, CommitHandlers, KeyPress, Phase};
pub use catalog::{BudgetLevel, Catalog, Category, DestinationRecord, LocationType, extract_price};
pub use config::AppConfig;
pub use error::{
    CatalogError, CollaboratorError, ConfigError, Error, IndexError, ParseSortModeError, Result,
};
pub use index::{FuzzyIndex, MatchResult};
pub use key::Key;
pub use listing::{ListingFilters, ListingView, Page, SortMode, run_pipeline};
pub use options::{FieldWeights, SearchOptions};
pub use preferences::{PreferenceChange, PreferenceStore, Preferences};
pub use profile::{DestinationIndex, KeyProfile, destination_index};
pub use ranking::{Ranking, get_match_ranking};
pub use sort::{compare_matches, sort_matches};
