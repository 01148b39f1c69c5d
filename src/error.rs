use thiserror::Error;

/// Errors raised while building a fuzzy index.
///
/// These are configuration mistakes and surface at build time, never from
/// [`FuzzyIndex::search`](crate::FuzzyIndex::search).
#[derive(Debug, Error, PartialEq)]
pub enum IndexError {
    /// No keys were supplied.
    #[error("index needs at least one key")]
    NoKeys,

    /// A key weight is zero, negative, or not finite.
    #[error("key `{key}` has invalid weight {weight}; weights must be finite and positive")]
    InvalidWeight {
        /// Name of the offending key.
        key: String,
        /// The rejected weight.
        weight: f64,
    },

    /// The match threshold is outside the unit interval.
    #[error("threshold {0} is outside [0.0, 1.0]")]
    InvalidThreshold(f64),

    /// The proximity distance is zero.
    #[error("proximity distance must be non-zero")]
    ZeroDistance,
}

/// Data-integrity errors raised while loading the destination catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog JSON is malformed or has unknown tags.
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two records share an id.
    #[error("duplicate destination id {0}")]
    DuplicateId(u32),

    /// A required text field is blank.
    #[error("destination {id} has an empty `{field}`")]
    EmptyField {
        /// Record id.
        id: u32,
        /// Field name.
        field: &'static str,
    },

    /// A required text field has leading or trailing whitespace.
    #[error("destination {id} has a padded `{field}`")]
    PaddedField {
        /// Record id.
        id: u32,
        /// Field name.
        field: &'static str,
    },

    /// A rating is outside 0.0 to 5.0.
    #[error("destination {id} has rating {rating}; expected 0.0 to 5.0")]
    RatingOutOfRange {
        /// Record id.
        id: u32,
        /// The rejected rating.
        rating: f64,
    },
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML is malformed.
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Search options or weights are invalid.
    #[error("invalid search settings: {0}")]
    Search(#[from] IndexError),

    /// A count that must be positive is zero.
    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),
}

/// An unrecognized listing sort mode name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown sort mode `{0}`; expected popularity, rating, price-low, price-high or name")]
pub struct ParseSortModeError(pub String);

/// Failures reported by network-backed collaborators (image search and
/// the like). Consumers turn these into a local "no data" state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The service could not be reached.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something unusable.
    #[error("collaborator returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Top-level error for the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// See [`IndexError`].
    #[error(transparent)]
    Index(#[from] IndexError),

    /// See [`CatalogError`].
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// See [`CollaboratorError`].
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;
