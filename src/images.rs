//! Image enrichment for destination cards and detail views.
//!
//! Images come from an external [`ImageSearch`] collaborator that may fail at
//! any time. An [`ImageSlot`] ties one lookup to the lifetime of the view that
//! asked for it: results that arrive after the view is gone, or after a newer
//! lookup started, are ignored, and failures turn into a placeholder.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CollaboratorError;

/// One photo of a place, with attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceImage {
    /// Image location.
    pub url: String,
    /// Alt text.
    pub alt: String,
    /// Credit line.
    pub photographer: String,
    /// Link for the credit line.
    pub photographer_url: String,
}

/// Text-to-images lookup, best match first.
pub trait ImageSearch {
    /// Images for `query`; an empty list when nothing matched.
    fn search_images(&self, query: &str) -> Result<Vec<PlaceImage>, CollaboratorError>;
}

impl<F> ImageSearch for F
where
    F: Fn(&str) -> Result<Vec<PlaceImage>, CollaboratorError>,
{
    fn search_images(&self, query: &str) -> Result<Vec<PlaceImage>, CollaboratorError> {
        self(query)
    }
}

/// What an [`ImageSlot`] currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageState {
    /// No lookup started yet.
    #[default]
    Empty,
    /// A lookup is in flight.
    Loading,
    /// At least one image arrived.
    Loaded(Vec<PlaceImage>),
    /// Nothing to show: no results, or the lookup failed.
    Placeholder,
}

/// Claim on the lookup a slot was running when it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTicket(u64);

/// The image state of one mounted view.
#[derive(Debug, Clone, Default)]
pub struct ImageSlot {
    state: ImageState,
    generation: u64,
    unmounted: bool,
}

impl ImageSlot {
    /// An empty, mounted slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current display state.
    pub fn state(&self) -> &ImageState {
        &self.state
    }

    /// `false` once [`unmount`](Self::unmount) was called.
    pub fn is_mounted(&self) -> bool {
        !self.unmounted
    }

    /// Start a lookup, superseding any still in flight.
    pub fn begin(&mut self, query: &str) -> ImageTicket {
        self.generation += 1;
        if !self.unmounted {
            self.state = ImageState::Loading;
        }
        debug!(query, generation = self.generation, "image lookup started");
        ImageTicket(self.generation)
    }

    /// Apply a lookup result. Returns `false` if the ticket is stale or the
    /// view is gone.
    pub fn resolve(&mut self, ticket: ImageTicket, result: Result<Vec<PlaceImage>, CollaboratorError>) -> bool {
        if self.unmounted || ticket.0 != self.generation {
            debug!(ticket = ticket.0, current = self.generation, "ignoring image result");
            return false;
        }
        self.state = match result {
            Ok(images) if images.is_empty() => ImageState::Placeholder,
            Ok(images) => ImageState::Loaded(images),
            Err(err) => {
                warn!(error = %err, "image lookup failed");
                ImageState::Placeholder
            }
        };
        true
    }

    /// Run a lookup to completion.
    pub fn fetch_with(&mut self, search: &dyn ImageSearch, query: &str) -> &ImageState {
        let ticket = self.begin(query);
        let result = search.search_images(query);
        self.resolve(ticket, result);
        &self.state
    }

    /// The view is gone; outstanding tickets are dropped.
    pub fn unmount(&mut self) {
        self.unmounted = true;
        self.generation += 1;
    }
}
