//! TOML configuration for the search core.
//!
//! Every field is optional; a missing section or key falls back to its
//! default, so an empty file is a valid configuration.
//!
//! ```toml
//! [search]
//! threshold = 0.3
//! min_match_len = 2
//!
//! [search.weights]
//! name = 3.0
//! country = 2.0
//!
//! [autocomplete]
//! max_suggestions = 8
//! debounce_ms = 150
//!
//! [listing]
//! page_size = 12
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, IndexError};
use crate::options::{FieldWeights, SearchOptions};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `[search]` section.
    pub search: SearchConfig,
    /// `[autocomplete]` section.
    pub autocomplete: AutocompleteConfig,
    /// `[listing]` section.
    pub listing: ListingConfig,
}

/// Matching options and field weights shared by both indexes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Keys read directly from `[search]`.
    #[serde(flatten)]
    pub options: SearchOptions,
    /// `[search.weights]` table.
    pub weights: FieldWeights,
}

/// Search box behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    /// Length cap of the suggestion list. Default 8.
    pub max_suggestions: usize,
    /// Zero recomputes suggestions on every keystroke.
    pub debounce_ms: u64,
}

impl AutocompleteConfig {
    /// `debounce_ms` as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 8,
            debounce_ms: 0,
        }
    }
}

/// Listing page behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Records per page. Default 12.
    pub page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { page_size: 12 }
    }
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded search config");
        Ok(config)
    }

    /// Check every value the index and pipeline depend on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.options.validate()?;
        let weights = &self.search.weights;
        let named = [
            ("name", weights.name),
            ("country", weights.country),
            ("topAttractions", weights.top_attractions),
            ("travelType", weights.travel_type),
            ("description", weights.description),
            ("category", weights.category),
        ];
        for (key, weight) in named {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(IndexError::InvalidWeight {
                    key: key.to_owned(),
                    weight,
                }
                .into());
            }
        }
        if self.autocomplete.max_suggestions == 0 {
            return Err(ConfigError::Zero("autocomplete.max_suggestions"));
        }
        if self.listing.page_size == 0 {
            return Err(ConfigError::Zero("listing.page_size"));
        }
        Ok(())
    }
}
