//! Loading the catalog and configuration from disk, and wiring them into
//! the controller and the listing view.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use wandersearch::autocomplete::Phase;
use wandersearch::{
    AppConfig, AutocompleteController, Catalog, CatalogError, CommitHandlers, ListingView, KeyProfile,
    destination_index,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn catalog_loads_from_file() {
    let catalog = Catalog::load(fixture("destinations.json")).unwrap();
    assert_eq!(catalog.len(), 26);
    assert_eq!(catalog.get(14).map(|d| d.name.as_str()), Some("Zürich"));
    assert_eq!(
        catalog.continents(),
        ["Asia", "Europe", "North America", "South America", "Africa", "Oceania"]
    );
}

#[test]
fn missing_catalog_is_io_error() {
    let err = Catalog::load(fixture("missing.json")).unwrap_err();
    assert!(matches!(err, CatalogError::Io(_)));
}

#[test]
fn config_loads_from_file() {
    let config = AppConfig::load(fixture("wandersearch.toml")).unwrap();
    assert_eq!(config.search.options.threshold, 0.25);
    assert_eq!(config.search.options.min_match_len, 2);
    assert_eq!(config.search.weights.name, 4.0);
    assert_eq!(config.search.weights.country, 2.0);
    assert_eq!(config.autocomplete.max_suggestions, 5);
    assert_eq!(config.listing.page_size, 9);
}

#[test]
fn configured_components_work_together() {
    let config = AppConfig::load(fixture("wandersearch.toml")).unwrap();
    let catalog = Catalog::load(fixture("destinations.json")).unwrap();

    let suggestions = destination_index(
        &catalog,
        config.search.options.clone(),
        &config.search.weights,
        KeyProfile::Suggestions,
    )
    .unwrap();
    let mut controller = AutocompleteController::with_config(Arc::new(suggestions), &config.autocomplete)
        .with_handlers(CommitHandlers::default().without_navigation());

    let start = Instant::now();
    controller.input_at("beach", start);
    assert_eq!(controller.state().phase, Phase::Typing);
    assert!(controller.poll(start + Duration::from_millis(150)));
    assert!(controller.state().suggestions.len() <= 5);
    assert!(!controller.state().suggestions.is_empty());

    let listing = destination_index(
        &catalog,
        config.search.options.clone(),
        &config.search.weights,
        KeyProfile::Listing,
    )
    .unwrap();
    let mut view = ListingView::with_page_size(Arc::new(listing), config.listing.page_size);
    assert_eq!(view.total_pages(), 3);
    view.set_page(3);
    assert_eq!(view.current_page().records.len(), 26 - 2 * 9);
}
