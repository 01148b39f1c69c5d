//! User preferences shared by many views.
//!
//! A [`PreferenceStore`] is created once and handed to whatever needs it.
//! All writes go through its setters, which notify subscribers with the
//! change that happened.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-user display settings and wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Language code, "en" by default.
    pub language: String,
    /// ISO currency code, "USD" by default.
    pub currency: String,
    /// Destination ids.
    pub wishlist: BTreeSet<u32>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: "en".to_owned(),
            currency: "USD".to_owned(),
            wishlist: BTreeSet::new(),
        }
    }
}

/// A change applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceChange {
    /// New language code.
    Language(String),
    /// New currency code.
    Currency(String),
    /// Destination id added to the wishlist.
    WishlistAdded(u32),
    /// Destination id removed from the wishlist.
    WishlistRemoved(u32),
}

type Listener = Box<dyn FnMut(&PreferenceChange, &Preferences)>;

/// Handle returned by [`PreferenceStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Owner of the [`Preferences`], notifying listeners on every change.
#[derive(Default)]
pub struct PreferenceStore {
    preferences: Preferences,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl PreferenceStore {
    /// A store seeded with `preferences` and no listeners.
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Current preferences.
    pub fn get(&self) -> &Preferences {
        &self.preferences
    }

    /// Current language code.
    pub fn language(&self) -> &str {
        &self.preferences.language
    }

    /// Current currency code.
    pub fn currency(&self) -> &str {
        &self.preferences.currency
    }

    /// Setting the current value again notifies no one.
    pub fn set_language(&mut self, language: &str) {
        if self.preferences.language != language {
            self.preferences.language = language.to_owned();
            self.emit(PreferenceChange::Language(language.to_owned()));
        }
    }

    /// Like [`set_language`](Self::set_language), for the currency.
    pub fn set_currency(&mut self, currency: &str) {
        if self.preferences.currency != currency {
            self.preferences.currency = currency.to_owned();
            self.emit(PreferenceChange::Currency(currency.to_owned()));
        }
    }

    /// Add or remove a destination. Returns `true` if it is now wishlisted.
    pub fn toggle_wishlist(&mut self, id: u32) -> bool {
        if self.preferences.wishlist.remove(&id) {
            self.emit(PreferenceChange::WishlistRemoved(id));
            false
        } else {
            self.preferences.wishlist.insert(id);
            self.emit(PreferenceChange::WishlistAdded(id));
            true
        }
    }

    /// Whether `id` is on the wishlist.
    pub fn is_wishlisted(&self, id: u32) -> bool {
        self.preferences.wishlist.contains(&id)
    }

    /// Number of wishlisted destinations.
    pub fn wishlist_count(&self) -> usize {
        self.preferences.wishlist.len()
    }

    /// Register a listener called with each change and the new preferences.
    pub fn subscribe(&mut self, listener: impl FnMut(&PreferenceChange, &Preferences) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, change: PreferenceChange) {
        debug!(?change, listeners = self.listeners.len(), "preference changed");
        for (_, listener) in &mut self.listeners {
            listener(&change, &self.preferences);
        }
    }
}

impl fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("preferences", &self.preferences)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
