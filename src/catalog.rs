//! The destination catalog.
//!
//! A [`Catalog`] is loaded once, validated, and then only ever read. All
//! searches, filters, and sorts produce new sequences of references into it.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CatalogError;

/// Primary category tag of a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Coastline and islands.
    Beach,
    /// Arts and traditions.
    Cultural,
    /// Large cities.
    Urban,
    /// Outdoor activity.
    Adventure,
    /// Landscapes and wildlife.
    Nature,
    /// High-end resorts.
    Luxury,
    /// Ruins and historic sites.
    History,
    /// Culinary travel.
    Food,
    /// Retreats and sacred places.
    Spiritual,
    /// Religious journeys.
    Pilgrimage,
}

impl Category {
    /// The wire and display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Beach => "Beach",
            Category::Cultural => "Cultural",
            Category::Urban => "Urban",
            Category::Adventure => "Adventure",
            Category::Nature => "Nature",
            Category::Luxury => "Luxury",
            Category::History => "History",
            Category::Food => "Food",
            Category::Spiritual => "Spiritual",
            Category::Pilgrimage => "Pilgrimage",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative cost of a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BudgetLevel {
    /// Budget travel.
    Low,
    /// Mid-range.
    Medium,
    /// Expensive.
    High,
}

impl BudgetLevel {
    /// The wire and display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Low => "Low",
            BudgetLevel::Medium => "Medium",
            BudgetLevel::High => "High",
        }
    }

    /// Parse a budget label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        [BudgetLevel::Low, BudgetLevel::Medium, BudgetLevel::High]
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of place a destination is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    /// A whole country.
    Country,
    /// A city.
    City,
    /// A region or province.
    Region,
    /// A district within a city.
    Neighborhood,
    /// A temple or shrine.
    Temple,
    /// A monument or landmark building.
    Monument,
    /// A natural landmark.
    #[serde(rename = "Natural Wonder")]
    NaturalWonder,
    /// Any other single sight.
    Attraction,
}

impl LocationType {
    /// The wire and display label, e.g. "Natural Wonder".
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Country => "Country",
            LocationType::City => "City",
            LocationType::Region => "Region",
            LocationType::Neighborhood => "Neighborhood",
            LocationType::Temple => "Temple",
            LocationType::Monument => "Monument",
            LocationType::NaturalWonder => "Natural Wonder",
            LocationType::Attraction => "Attraction",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry. Field names follow the camelCase wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationRecord {
    /// Unique within a catalog.
    pub id: u32,
    /// Display name, unpadded.
    pub name: String,
    /// Country name, unpadded.
    pub country: String,
    /// Continent label as used by the listing filter, unpadded.
    pub continent: String,
    /// Free-text description.
    pub description: String,
    /// Primary category.
    pub category: Category,
    /// Secondary travel-type tags, e.g. "Spiritual".
    pub travel_type: Vec<String>,
    /// Named sights.
    pub top_attractions: Vec<String>,
    /// Relative cost.
    pub budget_level: BudgetLevel,
    /// Date-range label such as "Dec - Feb".
    pub best_season: String,
    /// Trip length label such as "Weekend" or "1 Week".
    pub duration: String,
    /// Absent on older records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<LocationType>,
    /// 0.0 to 5.0.
    pub rating: f64,
    /// Display price with an embedded dollar amount, e.g. "From $89/night".
    pub price: String,
    /// Off-the-beaten-path flag.
    #[serde(default)]
    pub is_hidden_gem: bool,
    /// Editorially verified.
    #[serde(default)]
    pub is_verified: bool,
}

impl DestinationRecord {
    /// Numeric price used for sorting. See [`extract_price`].
    pub fn price_value(&self) -> u64 {
        extract_price(&self.price)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let required = [
            ("name", &self.name),
            ("country", &self.country),
            ("continent", &self.continent),
        ];
        for (field, value) in required {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(CatalogError::EmptyField { id: self.id, field });
            }
            // A padded name could never rank as an exact match.
            if trimmed.len() != value.len() {
                return Err(CatalogError::PaddedField { id: self.id, field });
            }
        }
        if !self.rating.is_finite() || !(0.0..=5.0).contains(&self.rating) {
            return Err(CatalogError::RatingOutOfRange {
                id: self.id,
                rating: self.rating,
            });
        }
        Ok(())
    }
}

/// Extract the first dollar amount from a price label.
///
/// Returns the run of ASCII digits immediately following the first `$` that
/// has one, or `0` if there is none. Amounts too large for `u64` saturate.
///
/// # Examples
///
/// ```
/// use wandersearch::extract_price;
///
/// assert_eq!(extract_price("From $89/night"), 89);
/// assert_eq!(extract_price("$ 40 or $120 per day"), 120);
/// assert_eq!(extract_price("Contact for pricing"), 0);
/// ```
pub fn extract_price(price: &str) -> u64 {
    price_amount(price).unwrap_or(0)
}

/// Like [`extract_price`], but `None` when the label carries no amount.
pub fn price_amount(price: &str) -> Option<u64> {
    let bytes = price.as_bytes();
    memchr::memchr_iter(b'$', bytes).find_map(|dollar| {
        bytes[dollar + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .fold(None, |acc: Option<u64>, &b| {
                let digit = u64::from(b - b'0');
                Some(acc.unwrap_or(0).saturating_mul(10).saturating_add(digit))
            })
    })
}

/// The validated, read-only collection of destinations.
///
/// Records are held in an `Arc<[DestinationRecord]>` so the index and any
/// number of views can share them without copying.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Arc<[DestinationRecord]>,
    by_id: HashMap<u32, usize>,
}

impl Catalog {
    /// Validate and wrap a list of records.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate id, an empty name, country or continent, or a
    /// rating outside `0.0..=5.0`.
    pub fn from_records(records: Vec<DestinationRecord>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            record.validate()?;
            if by_id.insert(record.id, position).is_some() {
                return Err(CatalogError::DuplicateId(record.id));
            }
        }
        info!(destinations = records.len(), "loaded destination catalog");
        Ok(Self {
            records: records.into(),
            by_id,
        })
    }

    /// Parse a JSON array of records, then validate it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON or missing required
    /// fields, plus every error of [`Catalog::from_records`].
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<DestinationRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Read and parse a JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// All records, in catalog order.
    pub fn records(&self) -> &[DestinationRecord] {
        &self.records
    }

    /// A shared handle to the records, for building indexes.
    pub fn shared(&self) -> Arc<[DestinationRecord]> {
        Arc::clone(&self.records)
    }

    /// Look up a record by id.
    pub fn get(&self, id: u32) -> Option<&DestinationRecord> {
        self.by_id.get(&id).map(|&position| &self.records[position])
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct continents, in order of first appearance.
    pub fn continents(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in self.records.iter() {
            if !seen.contains(&record.continent.as_str()) {
                seen.push(&record.continent);
            }
        }
        seen
    }
}

/// A minimal valid record for unit tests in other modules.
#[cfg(test)]
pub(crate) fn test_record(id: u32, name: &str, country: &str, continent: &str) -> DestinationRecord {
    DestinationRecord {
        id,
        name: name.to_owned(),
        country: country.to_owned(),
        continent: continent.to_owned(),
        description: String::new(),
        category: Category::Cultural,
        travel_type: Vec::new(),
        top_attractions: Vec::new(),
        budget_level: BudgetLevel::Medium,
        best_season: "Mar - May".to_owned(),
        duration: "1 Week".to_owned(),
        location_type: None,
        rating: 4.0,
        price: "From $100/night".to_owned(),
        is_hidden_gem: false,
        is_verified: false,
    }
}
