//! The browse view's filter, sort, and paginate pipeline.
//!
//! The free functions are pure: each takes a sequence of record references
//! and returns a new one. [`ListingView`] layers the page-reset rules of the
//! browse view on top of them.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{DestinationRecord, price_amount};
use crate::error::ParseSortModeError;
use crate::profile::DestinationIndex;
use crate::ranking::prepare_value_for_comparison;

/// Records per page.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Continent filter options.
pub const CONTINENTS: &[&str] = &[
    "All Continents",
    "Asia",
    "Europe",
    "North America",
    "South America",
    "Africa",
    "Oceania",
];

/// Travel-type filter options.
pub const TRAVEL_TYPES: &[&str] = &[
    "All Types",
    "Beach",
    "Cultural",
    "Urban",
    "Adventure",
    "Nature",
    "Luxury",
    "History",
    "Food",
    "Spiritual",
    "Pilgrimage",
];

/// Budget filter options.
pub const BUDGET_LEVELS: &[&str] = &["All Budgets", "Low", "Medium", "High"];

/// Best-season filter options.
pub const SEASONS: &[&str] = &["All Seasons", "Dec - Feb", "Mar - May", "Jun - Aug", "Sep - Nov"];

/// Trip-length filter options.
pub const DURATIONS: &[&str] = &["All Durations", "Weekend", "1 Week", "2+ Weeks"];

/// Location-type filter options.
pub const LOCATION_TYPES: &[&str] = &[
    "All Types",
    "Country",
    "City",
    "Region",
    "Neighborhood",
    "Temple",
    "Monument",
    "Natural Wonder",
    "Attraction",
];

/// `None` for an "All ..." sentinel or a blank label.
fn constraint(label: &str) -> Option<String> {
    let label = label.trim();
    if label.is_empty() || label.starts_with("All ") {
        None
    } else {
        Some(label.to_owned())
    }
}

/// Categorical filters of the browse view. `None` means no constraint.
///
/// The builder methods accept the labels shown in the filter menus, so
/// passing an "All ..." sentinel clears the filter.
///
/// # Examples
///
/// ```
/// use wandersearch::ListingFilters;
///
/// let filters = ListingFilters::default().continent("Asia").budget("All Budgets");
/// assert_eq!(filters.continent.as_deref(), Some("Asia"));
/// assert_eq!(filters.budget, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingFilters {
    /// Exact continent.
    pub continent: Option<String>,
    /// Contained in `travel_type`.
    pub travel_type: Option<String>,
    /// Budget level label.
    pub budget: Option<String>,
    /// Exact season label.
    pub season: Option<String>,
    /// Substring of the duration label.
    pub duration: Option<String>,
    /// Location type label.
    pub location_type: Option<String>,
}

impl ListingFilters {
    /// Set or clear the continent filter.
    #[must_use]
    pub fn continent(mut self, label: &str) -> Self {
        self.continent = constraint(label);
        self
    }

    /// Set or clear the travel-type filter.
    #[must_use]
    pub fn travel_type(mut self, label: &str) -> Self {
        self.travel_type = constraint(label);
        self
    }

    /// Set or clear the budget filter.
    #[must_use]
    pub fn budget(mut self, label: &str) -> Self {
        self.budget = constraint(label);
        self
    }

    /// Set or clear the season filter.
    #[must_use]
    pub fn season(mut self, label: &str) -> Self {
        self.season = constraint(label);
        self
    }

    /// Set or clear the duration filter.
    #[must_use]
    pub fn duration(mut self, label: &str) -> Self {
        self.duration = constraint(label);
        self
    }

    /// Set or clear the location-type filter.
    #[must_use]
    pub fn location_type(mut self, label: &str) -> Self {
        self.location_type = constraint(label);
        self
    }

    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether a record passes every active filter.
    pub fn matches(&self, record: &DestinationRecord) -> bool {
        if let Some(continent) = &self.continent {
            if record.continent != *continent {
                return false;
            }
        }
        if let Some(travel_type) = &self.travel_type {
            if !record.travel_type.iter().any(|t| t == travel_type) {
                return false;
            }
        }
        if let Some(budget) = &self.budget {
            if record.budget_level.as_str() != budget {
                return false;
            }
        }
        if let Some(season) = &self.season {
            // "Dec - Feb" matches on its first month.
            let first = season.split(" - ").next().unwrap_or(season);
            if !record.best_season.contains(first) {
                return false;
            }
        }
        if let Some(duration) = &self.duration {
            if !record.duration.contains(duration.as_str()) {
                return false;
            }
        }
        if let Some(location_type) = &self.location_type {
            let matches = record
                .location_type
                .is_some_and(|lt| lt.as_str().eq_ignore_ascii_case(location_type));
            if !matches {
                return false;
            }
        }
        true
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Rating, highest first.
    #[default]
    Popularity,
    /// Rating, highest first.
    Rating,
    /// Cheapest first; unpriced records last.
    PriceLow,
    /// Most expensive first; unpriced records last.
    PriceHigh,
    /// Alphabetical, ignoring case and accents.
    Name,
}

impl SortMode {
    /// Every mode, in menu order.
    pub const ALL: [SortMode; 5] = [
        SortMode::Popularity,
        SortMode::Rating,
        SortMode::PriceLow,
        SortMode::PriceHigh,
        SortMode::Name,
    ];

    /// The kebab-case name, e.g. "price-low".
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Popularity => "popularity",
            SortMode::Rating => "rating",
            SortMode::PriceLow => "price-low",
            SortMode::PriceHigh => "price-high",
            SortMode::Name => "name",
        }
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Popularity => "Popularity",
            SortMode::Rating => "Rating",
            SortMode::PriceLow => "Price (Low)",
            SortMode::PriceHigh => "Price (High)",
            SortMode::Name => "Name",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = ParseSortModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ParseSortModeError(s.to_owned()))
    }
}

/// The records a listing starts from.
///
/// A blank query selects the whole catalog without fuzzy matching; any
/// other query selects the index's matches in rank order.
pub fn candidates<'a>(index: &'a DestinationIndex, query: &str) -> Vec<&'a DestinationRecord> {
    if query.trim().is_empty() {
        index.items().iter().collect()
    } else {
        index.search(query).into_iter().map(|m| m.item).collect()
    }
}

/// Keep the records that pass every filter, preserving order.
pub fn apply_filters<'a>(
    records: Vec<&'a DestinationRecord>,
    filters: &ListingFilters,
) -> Vec<&'a DestinationRecord> {
    if filters.is_empty() {
        return records;
    }
    records.into_iter().filter(|record| filters.matches(record)).collect()
}

/// Sort records in place. The sort is stable.
///
/// Records whose price carries no dollar amount read as `0`, but sort after
/// every priced record in both price modes.
pub fn sort_records(records: &mut [&DestinationRecord], mode: SortMode) {
    match mode {
        SortMode::Popularity | SortMode::Rating => {
            records.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        }
        SortMode::PriceLow => {
            records.sort_by_cached_key(|r| match price_amount(&r.price) {
                Some(amount) => (false, amount),
                None => (true, 0),
            });
        }
        SortMode::PriceHigh => {
            records.sort_by_cached_key(|r| match price_amount(&r.price) {
                Some(amount) => (false, u64::MAX - amount),
                None => (true, 0),
            });
        }
        SortMode::Name => {
            records.sort_by_cached_key(|r| name_key(&r.name));
        }
    }
}

/// Case- and accent-insensitive collation key, with the raw name as a
/// tie-breaker.
fn name_key(name: &str) -> (String, String) {
    (prepare_value_for_comparison(name, false).to_lowercase(), name.to_owned())
}

/// Compare two names the way [`SortMode::Name`] orders them.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    name_key(a).cmp(&name_key(b))
}

/// Number of pages needed for `count` records. Zero for no records.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// The 1-indexed `page` of `records`; empty when out of range.
pub fn paginate<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let Some(start) = page.checked_sub(1).and_then(|p| p.checked_mul(page_size)) else {
        return &[];
    };
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

/// One rendered page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    /// Records on this page, in listing order.
    pub records: Vec<&'a DestinationRecord>,
    /// 1-indexed page number.
    pub number: usize,
    /// Zero when nothing matched.
    pub total_pages: usize,
    /// Records across all pages.
    pub total_results: usize,
}

impl Page<'_> {
    /// Whether the page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Filtered and sorted records, before pagination.
pub fn filtered_sorted<'a>(
    index: &'a DestinationIndex,
    query: &str,
    filters: &ListingFilters,
    sort: SortMode,
) -> Vec<&'a DestinationRecord> {
    let mut records = apply_filters(candidates(index, query), filters);
    sort_records(&mut records, sort);
    records
}

/// Run candidates, filters, sort, and pagination in one pass.
///
/// Out-of-range pages come back empty; clamping is up to the caller.
pub fn run_pipeline<'a>(
    index: &'a DestinationIndex,
    query: &str,
    filters: &ListingFilters,
    sort: SortMode,
    page: usize,
    page_size: usize,
) -> Page<'a> {
    let records = filtered_sorted(index, query, filters, sort);
    let total_results = records.len();
    let page_records = paginate(&records, page, page_size).to_vec();
    debug!(
        query,
        sort = sort.as_str(),
        total = total_results,
        page,
        "listing pipeline"
    );
    Page {
        records: page_records,
        number: page,
        total_pages: total_pages(total_results, page_size),
        total_results,
    }
}

/// Stateful browse view over a listing index.
///
/// Changing the query, a filter, or the sort order returns to page 1.
#[derive(Debug, Clone)]
pub struct ListingView {
    index: Arc<DestinationIndex>,
    query: String,
    filters: ListingFilters,
    sort: SortMode,
    page: usize,
    page_size: usize,
}

impl ListingView {
    /// A view on page 1 with twelve records per page.
    pub fn new(index: Arc<DestinationIndex>) -> Self {
        Self::with_page_size(index, DEFAULT_PAGE_SIZE)
    }

    /// A view with a custom page size; zero is treated as one.
    pub fn with_page_size(index: Arc<DestinationIndex>, page_size: usize) -> Self {
        Self {
            index,
            query: String::new(),
            filters: ListingFilters::default(),
            sort: SortMode::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Current raw query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current filters.
    pub fn filters(&self) -> &ListingFilters {
        &self.filters
    }

    /// Current sort order.
    pub fn sort(&self) -> SortMode {
        self.sort
    }

    /// Current 1-indexed page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Replace the query.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_owned();
        self.page = 1;
    }

    /// Replace all filters at once.
    pub fn set_filters(&mut self, filters: ListingFilters) {
        self.filters = filters;
        self.page = 1;
    }

    /// Apply a change to the current filters.
    pub fn update_filters(&mut self, update: impl FnOnce(ListingFilters) -> ListingFilters) {
        let filters = std::mem::take(&mut self.filters);
        self.set_filters(update(filters));
    }

    /// Change the sort order.
    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
        self.page = 1;
    }

    /// Move to `page`, clamped to `[1, total_pages]`.
    pub fn set_page(&mut self, page: usize) {
        let pages = self.total_pages();
        self.page = page.clamp(1, pages.max(1));
    }

    /// Advance one page, stopping at the last.
    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    /// Go back one page, stopping at the first.
    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    /// Page count for the current results.
    pub fn total_pages(&self) -> usize {
        total_pages(self.results().len(), self.page_size)
    }

    /// Whether a filter or a query narrows the listing.
    pub fn has_active_filters(&self) -> bool {
        !self.filters.is_empty() || !self.query.is_empty()
    }

    /// Clear the query and every filter. The sort order is kept.
    pub fn reset(&mut self) {
        self.query.clear();
        self.filters = ListingFilters::default();
        self.page = 1;
    }

    /// All filtered and sorted records.
    pub fn results(&self) -> Vec<&DestinationRecord> {
        filtered_sorted(&self.index, &self.query, &self.filters, self.sort)
    }

    /// The page currently shown.
    pub fn current_page(&self) -> Page<'_> {
        run_pipeline(
            &self.index,
            &self.query,
            &self.filters,
            self.sort,
            self.page,
            self.page_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BudgetLevel, Catalog, LocationType, test_record};
    use crate::options::{FieldWeights, SearchOptions};
    use crate::profile::{KeyProfile, destination_index};

    fn catalog() -> Catalog {
        let mut kyoto = test_record(1, "Kyoto", "Japan", "Asia");
        kyoto.travel_type = vec!["Cultural".into(), "History".into()];
        kyoto.budget_level = BudgetLevel::Medium;
        kyoto.best_season = "Mar - May".into();
        kyoto.location_type = Some(LocationType::City);
        kyoto.rating = 4.8;
        kyoto.price = "From $120/night".into();

        let mut bali = test_record(2, "Bali", "Indonesia", "Asia");
        bali.travel_type = vec!["Beach".into()];
        bali.budget_level = BudgetLevel::Low;
        bali.best_season = "Apr - Oct".into();
        bali.duration = "2+ Weeks".into();
        bali.location_type = Some(LocationType::Region);
        bali.rating = 4.6;
        bali.price = "From $50/night".into();

        let mut paris = test_record(3, "Paris", "France", "Europe");
        paris.travel_type = vec!["Cultural".into(), "Food".into()];
        paris.budget_level = BudgetLevel::High;
        paris.best_season = "Jun - Aug".into();
        paris.location_type = Some(LocationType::City);
        paris.rating = 4.7;
        paris.price = "Price on request".into();

        let mut angkor = test_record(4, "Angkor Wat", "Cambodia", "Asia");
        angkor.travel_type = vec!["History".into(), "Spiritual".into()];
        angkor.budget_level = BudgetLevel::Low;
        angkor.best_season = "Dec - Feb".into();
        angkor.duration = "Weekend".into();
        angkor.location_type = Some(LocationType::Temple);
        angkor.rating = 4.9;
        angkor.price = "From $200/night".into();

        Catalog::from_records(vec![kyoto, bali, paris, angkor]).unwrap()
    }

    fn index() -> DestinationIndex {
        destination_index(
            &catalog(),
            SearchOptions::default(),
            &FieldWeights::default(),
            KeyProfile::Listing,
        )
        .unwrap()
    }

    fn ids(records: &[&DestinationRecord]) -> Vec<u32> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn blank_query_selects_whole_catalog() {
        let index = index();
        assert_eq!(ids(&candidates(&index, "   ")), vec![1, 2, 3, 4]);
    }

    #[test]
    fn query_selects_matches_in_rank_order() {
        let index = index();
        assert_eq!(ids(&candidates(&index, "paris")), vec![3]);
    }

    #[test]
    fn sentinel_labels_clear_filters() {
        let filters = ListingFilters::default()
            .continent("All Continents")
            .travel_type("All Types")
            .budget("All Budgets")
            .season("All Seasons")
            .duration("All Durations")
            .location_type("All Types");
        assert!(filters.is_empty());
    }

    #[test]
    fn filters_combine_with_and() {
        let index = index();
        let filters = ListingFilters::default().continent("Asia").budget("Low");
        assert_eq!(ids(&apply_filters(candidates(&index, ""), &filters)), vec![2, 4]);
    }

    #[test]
    fn travel_type_is_membership() {
        let index = index();
        let filters = ListingFilters::default().travel_type("Cultural");
        assert_eq!(ids(&apply_filters(candidates(&index, ""), &filters)), vec![1, 3]);
    }

    #[test]
    fn season_matches_first_month() {
        let index = index();
        let filters = ListingFilters::default().season("Mar - May");
        assert_eq!(ids(&apply_filters(candidates(&index, ""), &filters)), vec![1]);
        let filters = ListingFilters::default().season("Dec - Feb");
        assert_eq!(ids(&apply_filters(candidates(&index, ""), &filters)), vec![4]);
    }

    #[test]
    fn duration_is_substring() {
        let index = index();
        let filters = ListingFilters::default().duration("1 Week");
        assert_eq!(ids(&apply_filters(candidates(&index, ""), &filters)), vec![1, 3]);
        let filters = ListingFilters::default().duration("Week");
        assert_eq!(ids(&apply_filters(candidates(&index, ""), &filters)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn location_type_ignores_case() {
        let index = index();
        let filters = ListingFilters::default().location_type("city");
        assert_eq!(ids(&apply_filters(candidates(&index, ""), &filters)), vec![1, 3]);
    }

    #[test]
    fn sort_by_rating_descending() {
        let index = index();
        let mut records = candidates(&index, "");
        sort_records(&mut records, SortMode::Rating);
        assert_eq!(ids(&records), vec![4, 1, 3, 2]);
    }

    #[test]
    fn popularity_matches_rating() {
        let index = index();
        let mut by_popularity = candidates(&index, "");
        let mut by_rating = by_popularity.clone();
        sort_records(&mut by_popularity, SortMode::Popularity);
        sort_records(&mut by_rating, SortMode::Rating);
        assert_eq!(by_popularity, by_rating);
    }

    #[test]
    fn price_low_puts_unpriced_last() {
        let index = index();
        let mut records = candidates(&index, "");
        sort_records(&mut records, SortMode::PriceLow);
        assert_eq!(ids(&records), vec![2, 1, 4, 3]);
    }

    #[test]
    fn price_high_descending() {
        let index = index();
        let mut records = candidates(&index, "");
        sort_records(&mut records, SortMode::PriceHigh);
        assert_eq!(ids(&records), vec![4, 1, 2, 3]);
    }

    #[test]
    fn sort_by_name() {
        let index = index();
        let mut records = candidates(&index, "");
        sort_records(&mut records, SortMode::Name);
        assert_eq!(ids(&records), vec![4, 2, 1, 3]);
    }

    #[test]
    fn name_order_ignores_case_and_accents() {
        assert_eq!(compare_names("éclair", "Eiffel"), Ordering::Less);
        assert_eq!(compare_names("bali", "Bangkok"), Ordering::Less);
    }

    #[test]
    fn sort_mode_names_round_trip() {
        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>().unwrap(), mode);
        }
        assert_eq!(
            "cheapest".parse::<SortMode>(),
            Err(ParseSortModeError("cheapest".to_owned()))
        );
    }

    #[test]
    fn paginate_slices_pages() {
        let items: Vec<u32> = (0..30).collect();
        assert_eq!(paginate(&items, 1, 12), &items[0..12]);
        assert_eq!(paginate(&items, 3, 12), &items[24..30]);
        assert!(paginate(&items, 4, 12).is_empty());
        assert!(paginate(&items, 0, 12).is_empty());
        assert!(paginate(&items, usize::MAX, 12).is_empty());
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
    }

    #[test]
    fn pipeline_reports_totals() {
        let index = index();
        let page = run_pipeline(&index, "", &ListingFilters::default(), SortMode::Name, 1, 3);
        assert_eq!(ids(&page.records), vec![4, 2, 1]);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_results, 4);
    }

    #[test]
    fn view_setters_reset_page() {
        let mut view = ListingView::with_page_size(Arc::new(index()), 1);
        view.set_page(3);
        assert_eq!(view.page(), 3);
        view.set_sort(SortMode::Name);
        assert_eq!(view.page(), 1);

        view.set_page(2);
        view.update_filters(|f| f.continent("Asia"));
        assert_eq!(view.page(), 1);

        view.set_page(2);
        view.set_query("kyoto");
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn view_clamps_page() {
        let mut view = ListingView::with_page_size(Arc::new(index()), 3);
        view.set_page(10);
        assert_eq!(view.page(), 2);
        view.set_page(0);
        assert_eq!(view.page(), 1);
        view.set_query("zzzzzz");
        view.set_page(5);
        assert_eq!(view.page(), 1);
        assert!(view.current_page().is_empty());
    }

    #[test]
    fn view_active_filters_and_reset() {
        let mut view = ListingView::new(Arc::new(index()));
        assert!(!view.has_active_filters());
        view.set_sort(SortMode::PriceLow);
        assert!(!view.has_active_filters());
        view.set_query("asia");
        assert!(view.has_active_filters());
        view.reset();
        assert!(!view.has_active_filters());
        assert_eq!(view.sort(), SortMode::PriceLow);
    }
}
