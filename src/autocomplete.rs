//! Live suggestions for a single search box.
//!
//! [`AutocompleteController`] turns keystrokes into a navigable list of up to
//! eight destinations. It owns its [`AutocompleteState`], queries a shared
//! [`DestinationIndex`], and reports every state change to its subscribers.
//!
//! # Stale results
//!
//! Every input, clear, and dismissal bumps a sequence number. Suggestions are
//! applied through a [`QueryTicket`] taken at query time, and a ticket whose
//! sequence number is no longer current is rejected. With a debounce
//! configured, [`AutocompleteController::poll`] always evaluates the latest
//! pending query once its deadline passes, so the final keystroke is never
//! dropped.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::catalog::DestinationRecord;
use crate::config::AutocompleteConfig;
use crate::profile::DestinationIndex;

/// Default cap on the suggestion list.
pub const MAX_SUGGESTIONS: usize = 8;

/// Where the controller is in its interaction cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Panel hidden.
    #[default]
    Idle,
    /// A searchable query is waiting for its suggestions.
    Typing,
    /// Panel open with at least one suggestion.
    ShowingSuggestions,
    /// Panel open with a "no results" message.
    NoResults,
}

/// Observable state of one search box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutocompleteState {
    /// Raw input text.
    pub query: String,
    /// Most relevant first.
    pub suggestions: Vec<DestinationRecord>,
    /// `None` when nothing is highlighted.
    pub highlighted: Option<usize>,
    /// Whether the panel is open.
    pub visible: bool,
    /// Interaction phase.
    pub phase: Phase,
}

impl AutocompleteState {
    /// The suggestion under the highlight, if any.
    pub fn highlighted_record(&self) -> Option<&DestinationRecord> {
        self.highlighted.and_then(|i| self.suggestions.get(i))
    }
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    /// Move the highlight down one row.
    ArrowDown,
    /// Move the highlight up; from the first row, clear it.
    ArrowUp,
    /// Commit the highlighted row, or submit the query.
    Enter,
    /// Close the panel.
    Escape,
}

/// What a commit did.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// A suggestion was accepted.
    Selected(DestinationRecord),
    /// The trimmed query was submitted as a free-form search.
    Submitted(String),
}

/// Path of the search results view for a free-form query.
///
/// # Examples
///
/// ```
/// use wandersearch::autocomplete::search_path;
///
/// assert_eq!(search_path("São Paulo"), "/search?q=S%C3%A3o%20Paulo");
/// ```
pub fn search_path(query: &str) -> String {
    format!("/search?q={}", urlencoding::encode(query))
}

/// Path of a destination's detail view.
pub fn detail_path(id: u32) -> String {
    format!("/destinations/{id}")
}

/// Receives default navigations when no commit callback is supplied.
pub trait Navigator {
    /// Go to `path`.
    fn navigate(&mut self, path: &str);
}

impl<F: FnMut(&str)> Navigator for F {
    fn navigate(&mut self, path: &str) {
        self(path)
    }
}

/// Navigator that only logs the target path.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&mut self, path: &str) {
        info!(path, "navigate");
    }
}

type SearchCallback = Box<dyn FnMut(&str)>;
type SelectCallback = Box<dyn FnMut(&DestinationRecord)>;

/// Side effects of committing a query or a suggestion.
///
/// A callback, when present, replaces the default navigation for its kind of
/// commit.
pub struct CommitHandlers {
    on_search: Option<SearchCallback>,
    on_select: Option<SelectCallback>,
    navigator: Option<Box<dyn Navigator>>,
}

impl Default for CommitHandlers {
    fn default() -> Self {
        Self {
            on_search: None,
            on_select: None,
            navigator: Some(Box::new(LogNavigator)),
        }
    }
}

impl CommitHandlers {
    /// Called with the trimmed query on a free-form submit.
    #[must_use]
    pub fn on_search(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_search = Some(Box::new(callback));
        self
    }

    /// Called with the accepted record.
    #[must_use]
    pub fn on_select(mut self, callback: impl FnMut(&DestinationRecord) + 'static) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    /// Route default navigations through `navigator`.
    #[must_use]
    pub fn navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Some(Box::new(navigator));
        self
    }

    /// Disable default navigation; commits without a callback only update state.
    #[must_use]
    pub fn without_navigation(mut self) -> Self {
        self.navigator = None;
        self
    }

    fn search(&mut self, query: &str) {
        if let Some(callback) = self.on_search.as_mut() {
            callback(query);
        } else if let Some(navigator) = self.navigator.as_mut() {
            navigator.navigate(&search_path(query));
        }
    }

    fn select(&mut self, record: &DestinationRecord) {
        if let Some(callback) = self.on_select.as_mut() {
            callback(record);
        } else if let Some(navigator) = self.navigator.as_mut() {
            navigator.navigate(&detail_path(record.id));
        }
    }
}

impl fmt::Debug for CommitHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitHandlers")
            .field("on_search", &self.on_search.is_some())
            .field("on_select", &self.on_select.is_some())
            .field("navigator", &self.navigator.is_some())
            .finish()
    }
}

/// A claim on the query current at the time it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    seq: u64,
    query: String,
}

impl QueryTicket {
    /// The query this ticket was issued for.
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Handle returned by [`AutocompleteController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&AutocompleteState)>;

/// Interactive suggestion state for one search box.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use wandersearch::autocomplete::{AutocompleteController, CommitHandlers, KeyPress, Phase};
/// use wandersearch::{Catalog, FieldWeights, KeyProfile, SearchOptions, destination_index};
///
/// let catalog = Catalog::from_json_str(r#"[{
///     "id": 7, "name": "Tokyo", "country": "Japan", "continent": "Asia",
///     "description": "Neon and sushi", "category": "Urban",
///     "travelType": ["Urban"], "topAttractions": ["Shibuya Crossing"],
///     "budgetLevel": "High", "bestSeason": "Mar - May", "duration": "1 Week",
///     "rating": 4.7, "price": "From $150/night"
/// }]"#).unwrap();
/// let index = destination_index(
///     &catalog, SearchOptions::default(), &FieldWeights::default(), KeyProfile::Suggestions,
/// ).unwrap();
///
/// let mut controller = AutocompleteController::new(Arc::new(index))
///     .with_handlers(CommitHandlers::default().without_navigation());
/// controller.input("tok");
/// assert_eq!(controller.state().phase, Phase::ShowingSuggestions);
///
/// controller.key(KeyPress::ArrowDown);
/// controller.key(KeyPress::Enter);
/// assert_eq!(controller.state().query, "Tokyo");
/// assert_eq!(controller.selection().map(|d| d.id), Some(7));
/// ```
pub struct AutocompleteController {
    index: Arc<DestinationIndex>,
    handlers: CommitHandlers,
    max_suggestions: usize,
    debounce: Duration,
    state: AutocompleteState,
    selection: Option<DestinationRecord>,
    seq: u64,
    pending: Option<Instant>,
    computed_for: Option<String>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl AutocompleteController {
    /// A controller with eight suggestions, no debounce, and default
    /// navigation.
    pub fn new(index: Arc<DestinationIndex>) -> Self {
        Self {
            index,
            handlers: CommitHandlers::default(),
            max_suggestions: MAX_SUGGESTIONS,
            debounce: Duration::ZERO,
            state: AutocompleteState::default(),
            selection: None,
            seq: 0,
            pending: None,
            computed_for: None,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// A controller sized and debounced from configuration.
    pub fn with_config(index: Arc<DestinationIndex>, config: &AutocompleteConfig) -> Self {
        let mut controller = Self::new(index);
        controller.max_suggestions = config.max_suggestions;
        controller.debounce = config.debounce();
        controller
    }

    /// Replace the commit handlers.
    #[must_use]
    pub fn with_handlers(mut self, handlers: CommitHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    /// Wait `debounce` after the last keystroke before querying.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Current observable state.
    pub fn state(&self) -> &AutocompleteState {
        &self.state
    }

    /// The last accepted suggestion.
    pub fn selection(&self) -> Option<&DestinationRecord> {
        self.selection.as_ref()
    }

    /// The index suggestions are drawn from.
    pub fn index(&self) -> &Arc<DestinationIndex> {
        &self.index
    }

    /// Deadline of the debounced query still waiting to run.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// Replace the input text.
    pub fn input(&mut self, text: &str) {
        self.input_at(text, Instant::now());
    }

    /// Replace the input text at a given instant.
    ///
    /// A query too short to search hides the panel at once. Otherwise the
    /// suggestions are computed immediately, or at `now + debounce` when a
    /// debounce is configured; the panel stays hidden until then.
    pub fn input_at(&mut self, text: &str, now: Instant) {
        self.seq += 1;
        self.state.query = text.to_owned();
        self.state.highlighted = None;

        if !self.is_searchable(text) {
            self.pending = None;
            self.computed_for = None;
            self.state.suggestions.clear();
            self.state.phase = Phase::Idle;
            self.state.visible = false;
            self.notify();
            return;
        }

        self.state.phase = Phase::Typing;
        if self.debounce.is_zero() {
            self.evaluate();
        } else {
            // Rows from the previous query are inert until the deadline.
            self.state.visible = false;
            self.pending = Some(now + self.debounce);
            self.notify();
        }
    }

    /// Run the pending query if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(deadline) if now >= deadline => {
                self.evaluate();
                true
            }
            _ => false,
        }
    }

    /// Run the pending query now, ignoring its deadline.
    pub fn flush(&mut self) -> bool {
        if self.pending.is_some() {
            self.evaluate();
            true
        } else {
            false
        }
    }

    /// Claim the current query for an out-of-band computation.
    pub fn begin_query(&self) -> QueryTicket {
        QueryTicket {
            seq: self.seq,
            query: self.state.query.clone(),
        }
    }

    /// Top suggestions for a query, without touching the state.
    pub fn suggest(&self, query: &str) -> Vec<DestinationRecord> {
        self.index
            .search_limit(query, self.max_suggestions)
            .into_iter()
            .map(|m| m.item.clone())
            .collect()
    }

    /// Apply suggestions computed for `ticket`.
    ///
    /// Returns `false`, leaving the state untouched, when the query has
    /// changed since the ticket was issued.
    pub fn deliver(&mut self, ticket: QueryTicket, mut suggestions: Vec<DestinationRecord>) -> bool {
        if ticket.seq != self.seq {
            warn!(
                stale = ticket.query.as_str(),
                current = self.state.query.as_str(),
                "discarding stale suggestions"
            );
            return false;
        }
        suggestions.truncate(self.max_suggestions);

        self.pending = None;
        self.state.phase = if suggestions.is_empty() {
            Phase::NoResults
        } else {
            Phase::ShowingSuggestions
        };
        self.state.suggestions = suggestions;
        self.state.highlighted = None;
        self.state.visible = true;
        self.computed_for = Some(ticket.query);

        debug!(
            query = self.state.query.as_str(),
            suggestions = self.state.suggestions.len(),
            "suggestions updated"
        );
        self.notify();
        true
    }

    /// Handle a key press. Returns the commit it caused, if any.
    pub fn key(&mut self, key: KeyPress) -> Option<Commit> {
        let navigable = self.state.phase == Phase::ShowingSuggestions;
        match key {
            KeyPress::ArrowDown if navigable => {
                let last = self.state.suggestions.len() - 1;
                let next = self.state.highlighted.map_or(0, |i| (i + 1).min(last));
                self.set_highlight(Some(next));
                None
            }
            KeyPress::ArrowUp if navigable => {
                let next = match self.state.highlighted {
                    None | Some(0) => None,
                    Some(i) => Some(i - 1),
                };
                self.set_highlight(next);
                None
            }
            KeyPress::Enter => match self.state.highlighted {
                Some(i) if navigable => self.commit_suggestion(i),
                _ => self.submit(),
            },
            KeyPress::Escape => {
                self.dismiss();
                None
            }
            KeyPress::ArrowDown | KeyPress::ArrowUp => None,
        }
    }

    /// Commit the suggestion row at `row`, as a pointer click would.
    pub fn click_suggestion(&mut self, row: usize) -> Option<Commit> {
        if self.state.phase != Phase::ShowingSuggestions {
            return None;
        }
        self.commit_suggestion(row)
    }

    /// Submit the trimmed query as a free-form search.
    ///
    /// Does nothing for a blank query.
    pub fn submit(&mut self) -> Option<Commit> {
        let query = self.state.query.trim().to_owned();
        if query.is_empty() {
            return None;
        }
        self.hide();
        self.notify();
        info!(query = query.as_str(), "search submitted");
        self.handlers.search(&query);
        Some(Commit::Submitted(query))
    }

    /// Pointer pressed outside the component.
    pub fn click_outside(&mut self) {
        self.dismiss();
    }

    /// Input regained focus.
    ///
    /// Reopens the panel with the last computed suggestions if they still
    /// belong to the current query, or queries afresh if they do not.
    pub fn focus(&mut self) {
        if self.state.visible || !self.is_searchable(&self.state.query) {
            return;
        }
        if self.computed_for.as_deref() == Some(self.state.query.as_str()) {
            self.state.phase = if self.state.suggestions.is_empty() {
                Phase::NoResults
            } else {
                Phase::ShowingSuggestions
            };
            self.state.highlighted = None;
            self.state.visible = true;
            self.notify();
        } else {
            self.state.phase = Phase::Typing;
            self.evaluate();
        }
    }

    /// Empty the input and the suggestion list.
    pub fn clear(&mut self) {
        self.seq += 1;
        self.pending = None;
        self.computed_for = None;
        self.selection = None;
        self.state = AutocompleteState::default();
        self.notify();
    }

    /// Register an observer called after every state change.
    pub fn subscribe(&mut self, observer: impl FnMut(&AutocompleteState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn is_searchable(&self, text: &str) -> bool {
        text.trim().chars().count() >= self.index.options().min_match_len.max(1)
    }

    fn evaluate(&mut self) {
        let ticket = self.begin_query();
        let suggestions = self.suggest(ticket.query());
        self.deliver(ticket, suggestions);
    }

    fn set_highlight(&mut self, highlighted: Option<usize>) {
        if self.state.highlighted != highlighted {
            self.state.highlighted = highlighted;
            self.notify();
        }
    }

    fn commit_suggestion(&mut self, row: usize) -> Option<Commit> {
        let record = self.state.suggestions.get(row)?.clone();
        self.hide();
        self.state.query = record.name.clone();
        self.selection = Some(record.clone());
        self.notify();
        info!(id = record.id, name = record.name.as_str(), "suggestion selected");
        self.handlers.select(&record);
        Some(Commit::Selected(record))
    }

    /// Close the panel, keeping the typed text and the last suggestions.
    fn dismiss(&mut self) {
        if self.state.phase == Phase::Idle && !self.state.visible {
            return;
        }
        self.hide();
        self.notify();
    }

    fn hide(&mut self) {
        self.seq += 1;
        self.pending = None;
        self.state.phase = Phase::Idle;
        self.state.visible = false;
        self.state.highlighted = None;
    }

    fn notify(&mut self) {
        for (_, observer) in &mut self.observers {
            observer(&self.state);
        }
    }
}

impl fmt::Debug for AutocompleteController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutocompleteController")
            .field("state", &self.state)
            .field("max_suggestions", &self.max_suggestions)
            .field("debounce", &self.debounce)
            .field("seq", &self.seq)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::catalog::{Catalog, test_record};
    use crate::options::{FieldWeights, SearchOptions};
    use crate::profile::{KeyProfile, destination_index};

    fn index() -> Arc<DestinationIndex> {
        let catalog = Catalog::from_records(vec![
            test_record(1, "Tokyo", "Japan", "Asia"),
            test_record(2, "Kyoto", "Japan", "Asia"),
            test_record(3, "Osaka", "Japan", "Asia"),
            test_record(4, "Lisbon", "Portugal", "Europe"),
            test_record(5, "Porto", "Portugal", "Europe"),
        ])
        .unwrap();
        Arc::new(
            destination_index(
                &catalog,
                SearchOptions::default(),
                &FieldWeights::default(),
                KeyProfile::Suggestions,
            )
            .unwrap(),
        )
    }

    fn controller() -> AutocompleteController {
        AutocompleteController::new(index()).with_handlers(CommitHandlers::default().without_navigation())
    }

    fn names(state: &AutocompleteState) -> Vec<&str> {
        state.suggestions.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn short_query_stays_idle() {
        let mut c = controller();
        c.input("t");
        assert_eq!(c.state().phase, Phase::Idle);
        assert!(!c.state().visible);
        assert!(c.state().suggestions.is_empty());
    }

    #[test]
    fn searchable_query_shows_suggestions() {
        let mut c = controller();
        c.input("japan");
        assert_eq!(c.state().phase, Phase::ShowingSuggestions);
        assert!(c.state().visible);
        assert_eq!(c.state().highlighted, None);
        assert_eq!(names(c.state()), vec!["Tokyo", "Kyoto", "Osaka"]);
    }

    #[test]
    fn unmatched_query_shows_no_results() {
        let mut c = controller();
        c.input("zzzzqq");
        assert_eq!(c.state().phase, Phase::NoResults);
        assert!(c.state().visible);
    }

    #[test]
    fn shrinking_query_clears_suggestions() {
        let mut c = controller();
        c.input("japan");
        c.input("j");
        assert_eq!(c.state().phase, Phase::Idle);
        assert!(c.state().suggestions.is_empty());
    }

    #[test]
    fn arrow_down_clamps_at_last_row() {
        let mut c = controller();
        c.input("japan");
        for _ in 0..5 {
            c.key(KeyPress::ArrowDown);
        }
        assert_eq!(c.state().highlighted, Some(2));
    }

    #[test]
    fn arrow_up_from_nothing_stays_nothing() {
        let mut c = controller();
        c.input("japan");
        c.key(KeyPress::ArrowUp);
        assert_eq!(c.state().highlighted, None);
        c.key(KeyPress::ArrowDown);
        c.key(KeyPress::ArrowUp);
        assert_eq!(c.state().highlighted, None);
    }

    #[test]
    fn arrows_ignored_when_panel_closed() {
        let mut c = controller();
        c.input("japan");
        c.key(KeyPress::Escape);
        c.key(KeyPress::ArrowDown);
        assert_eq!(c.state().highlighted, None);
    }

    #[test]
    fn enter_with_highlight_selects() {
        let mut c = controller();
        c.input("japan");
        c.key(KeyPress::ArrowDown);
        c.key(KeyPress::ArrowDown);
        let commit = c.key(KeyPress::Enter);
        assert!(matches!(commit, Some(Commit::Selected(ref d)) if d.name == "Kyoto"));
        assert_eq!(c.state().query, "Kyoto");
        assert_eq!(c.state().phase, Phase::Idle);
        assert!(!c.state().visible);
        assert_eq!(c.selection().map(|d| d.id), Some(2));
    }

    #[test]
    fn enter_without_highlight_submits_trimmed_query() {
        let mut c = controller();
        c.input("  japan ");
        assert_eq!(c.key(KeyPress::Enter), Some(Commit::Submitted("japan".to_owned())));
        assert!(!c.state().visible);
        assert_eq!(c.state().query, "  japan ");
    }

    #[test]
    fn blank_submit_is_noop() {
        let mut c = controller();
        c.input("   ");
        assert_eq!(c.key(KeyPress::Enter), None);
    }

    #[test]
    fn escape_keeps_text() {
        let mut c = controller();
        c.input("lisb");
        c.key(KeyPress::Escape);
        assert_eq!(c.state().phase, Phase::Idle);
        assert_eq!(c.state().query, "lisb");
    }

    #[test]
    fn escape_closes_no_results_panel() {
        let mut c = controller();
        c.input("zzzzqq");
        assert_eq!(c.state().phase, Phase::NoResults);
        c.key(KeyPress::Escape);
        assert_eq!(c.state().phase, Phase::Idle);
        assert!(!c.state().visible);
        assert_eq!(c.state().query, "zzzzqq");
    }

    #[test]
    fn click_outside_closes_no_results_panel() {
        let mut c = controller();
        c.input("zzzzqq");
        c.click_outside();
        assert_eq!(c.state().phase, Phase::Idle);
        assert!(!c.state().visible);
    }

    #[test]
    fn focus_reuses_last_suggestions() {
        let mut c = controller();
        c.input("portugal");
        c.click_outside();
        assert!(!c.state().visible);
        c.focus();
        assert_eq!(c.state().phase, Phase::ShowingSuggestions);
        assert_eq!(names(c.state()), vec!["Lisbon", "Porto"]);
    }

    #[test]
    fn focus_with_short_query_does_nothing() {
        let mut c = controller();
        c.input("p");
        c.focus();
        assert_eq!(c.state().phase, Phase::Idle);
    }

    #[test]
    fn clear_resets_everything() {
        let mut c = controller();
        c.input("japan");
        c.clear();
        assert_eq!(c.state(), &AutocompleteState::default());
    }

    #[test]
    fn click_suggestion_out_of_range_is_none() {
        let mut c = controller();
        c.input("japan");
        assert_eq!(c.click_suggestion(9), None);
        assert!(c.state().visible);
    }

    #[test]
    fn stale_ticket_rejected() {
        let mut c = controller();
        c.input("to");
        let stale = c.begin_query();
        c.input("toky");
        assert!(!c.deliver(stale, Vec::new()));
        assert_eq!(names(c.state())[0], "Tokyo");
    }

    #[test]
    fn debounced_input_waits_for_deadline() {
        let start = Instant::now();
        let mut c = controller().with_debounce(Duration::from_millis(150));
        c.input_at("to", start);
        c.input_at("tok", start + Duration::from_millis(50));
        c.input_at("toky", start + Duration::from_millis(100));
        assert_eq!(c.state().phase, Phase::Typing);

        assert!(!c.poll(start + Duration::from_millis(200)));
        assert!(c.poll(start + Duration::from_millis(250)));
        assert_eq!(c.state().phase, Phase::ShowingSuggestions);
        assert_eq!(names(c.state())[0], "Tokyo");
        assert_eq!(c.pending_deadline(), None);
    }

    #[test]
    fn debounced_input_hides_previous_rows() {
        let start = Instant::now();
        let mut c = controller().with_debounce(Duration::from_millis(150));
        c.input_at("japan", start);
        assert!(c.poll(start + Duration::from_millis(150)));
        assert!(c.state().visible);

        c.input_at("portugal", start + Duration::from_millis(200));
        assert_eq!(c.state().phase, Phase::Typing);
        assert!(!c.state().visible);
        assert_eq!(c.click_suggestion(0), None);
        c.key(KeyPress::ArrowDown);
        assert_eq!(c.state().highlighted, None);

        assert!(c.poll(start + Duration::from_millis(350)));
        assert!(c.state().visible);
        assert_eq!(names(c.state()), vec!["Lisbon", "Porto"]);
    }

    #[test]
    fn flush_runs_pending_query() {
        let mut c = controller().with_debounce(Duration::from_secs(1));
        c.input("lisbon");
        assert!(c.flush());
        assert!(!c.flush());
        assert_eq!(names(c.state()), vec!["Lisbon"]);
    }

    #[test]
    fn observers_see_changes_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut c = controller();
        let sink = Rc::clone(&seen);
        let id = c.subscribe(move |state| sink.borrow_mut().push(state.phase));

        c.input("japan");
        c.key(KeyPress::Escape);
        assert!(c.unsubscribe(id));
        c.input("lisbon");

        assert_eq!(*seen.borrow(), vec![Phase::ShowingSuggestions, Phase::Idle]);
        assert!(!c.unsubscribe(id));
    }

    #[test]
    fn callbacks_replace_navigation() {
        let searched = Rc::new(RefCell::new(Vec::<String>::new()));
        let visited = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = Rc::clone(&searched);
        let nav = Rc::clone(&visited);
        let handlers = CommitHandlers::default()
            .on_search(move |q| sink.borrow_mut().push(q.to_owned()))
            .navigator(move |path: &str| nav.borrow_mut().push(path.to_owned()));
        let mut c = AutocompleteController::new(index()).with_handlers(handlers);

        c.input("lisbon");
        c.key(KeyPress::Enter);
        c.input("lisbon");
        c.click_suggestion(0);

        assert_eq!(*searched.borrow(), vec!["lisbon"]);
        assert_eq!(*visited.borrow(), vec!["/destinations/4"]);
    }

    #[test]
    fn select_callback_receives_record() {
        let selected = Rc::new(RefCell::new(Vec::<(u32, String)>::new()));
        let visited = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = Rc::clone(&selected);
        let nav = Rc::clone(&visited);
        let handlers = CommitHandlers::default()
            .on_select(move |d| sink.borrow_mut().push((d.id, d.name.clone())))
            .navigator(move |path: &str| nav.borrow_mut().push(path.to_owned()));
        let mut c = AutocompleteController::new(index()).with_handlers(handlers);

        c.input("japan");
        c.key(KeyPress::ArrowDown);
        c.key(KeyPress::Enter);
        c.input("portugal");
        c.click_suggestion(1);

        assert_eq!(
            *selected.borrow(),
            vec![(1, "Tokyo".to_owned()), (5, "Porto".to_owned())]
        );
        assert!(visited.borrow().is_empty());
    }

    #[test]
    fn default_navigation_encodes_query() {
        let visited = Rc::new(RefCell::new(Vec::<String>::new()));
        let nav = Rc::clone(&visited);
        let handlers = CommitHandlers::default().navigator(move |path: &str| nav.borrow_mut().push(path.to_owned()));
        let mut c = AutocompleteController::new(index()).with_handlers(handlers);
        c.input("rome & paris");
        c.submit();
        assert_eq!(*visited.borrow(), vec!["/search?q=rome%20%26%20paris"]);
    }

    #[test]
    fn config_caps_suggestions() {
        let config = AutocompleteConfig {
            max_suggestions: 2,
            debounce_ms: 0,
        };
        let mut c = AutocompleteController::with_config(index(), &config);
        c.input("japan");
        assert_eq!(c.state().suggestions.len(), 2);
    }
}
