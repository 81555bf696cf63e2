//! Selection engine
//!
//! [`SelectionEngine`] owns the option cache, the search buffer, the mode
//! controller and the pagination driver, and derives the visible option list
//! from them and the externally owned selection.
//!
//! The engine never performs I/O. Every event method mutates state and returns
//! the [`EngineCommand`]s the host must execute: fetch a page, run a search,
//! (re)schedule the debounce timer, attach or detach listeners. Completions are
//! fed back through [`SelectionEngine::apply_page`],
//! [`SelectionEngine::apply_search`] and
//! [`SelectionEngine::debounce_elapsed`]; each carries the ticket it was issued
//! with, so late or superseded completions are recognised and dropped.

use std::sync::Arc;
use std::time::Duration;

use smallvec::SmallVec;

use crate::cache::OptionCache;
use crate::callbacks::SelectCallbacks;
use crate::config::{SelectConfig, FOCUS_DELAY_MS};
use crate::error::{ConfigResult, SelectError};
use crate::identity::{Accessors, Identity, OptionKey};
use crate::listbox::{EmptyState, ListStatus, Listbox};
use crate::mode::{DebounceTicket, Mode, ModeController, SearchTicket};
use crate::pagination::{
    LoadPageParams, PaginationDriver, PaginationState, ScrollEvent, ScrollMetrics,
};
use crate::response::{parse_search_terms, LoadResponse};
use crate::selection::{
    resolve_visible, select_all_state, toggle_select_all, SelectAllState, SelectedOptions,
    Selection, VisibleOptions,
};
use crate::source::SourceResult;

/// Identifies one issued page request
///
/// The generation changes on [`SelectionEngine::reset`], which invalidates any
/// request issued before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PageTicket {
    pub page: u32,
    generation: u64,
}

/// Side effect requested by the engine
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCommand {
    /// Call the page loader and report back through `apply_page`
    LoadPage {
        ticket: PageTicket,
        params: LoadPageParams,
    },
    /// Call the search provider and report back through `apply_search`
    Search {
        ticket: SearchTicket,
        terms: Vec<String>,
    },
    /// Start a timer that calls `debounce_elapsed(ticket)` after `delay`
    ScheduleSearch {
        ticket: DebounceTicket,
        delay: Duration,
    },
    /// Abort the timer with this ticket
    CancelScheduledSearch(DebounceTicket),
    /// Subscribe to pointer-down-outside and list scroll events
    AcquireListeners,
    /// Drop the subscriptions taken by `AcquireListeners`
    ReleaseListeners,
    /// Give focus back to the input after `delay`
    RestoreFocus { delay: Duration },
}

/// Commands produced by one event
pub type Commands = SmallVec<[EngineCommand; 2]>;

/// Result of an event that may propose a new selection
#[derive(Clone, Debug, PartialEq)]
pub struct Update<K> {
    /// Value reported through `on_change`; the host decides whether to adopt it
    pub proposed: Option<Selection<K>>,
    pub commands: Commands,
}

impl<K> Default for Update<K> {
    fn default() -> Self {
        Self {
            proposed: None,
            commands: Commands::new(),
        }
    }
}

/// Paginated, searchable select state machine
pub struct SelectionEngine<O, K = OptionKey> {
    config: SelectConfig,
    accessors: Accessors<O, K>,
    callbacks: SelectCallbacks<O, K>,
    cache: OptionCache<O, K>,
    /// Selected options known only from search results
    pinned: OptionCache<O, K>,
    search_buffer: Vec<O>,
    mode: ModeController,
    pagination: PaginationDriver,
    selection: Selection<K>,
    visible: VisibleOptions<O, K>,
    input: String,
    open: bool,
    loader_attached: bool,
    search_attached: bool,
    in_flight: Option<PageTicket>,
    generation: u64,
    last_seed: Option<Arc<LoadResponse<O>>>,
    preserve_focus: bool,
    last_error: Option<SelectError>,
}

impl<O, K> std::fmt::Debug for SelectionEngine<O, K>
where
    K: Identity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("mode", &self.mode.mode())
            .field("open", &self.open)
            .field("input", &self.input)
            .field("cached", &self.cache.len())
            .field("visible", &self.visible.len())
            .field("pagination", self.pagination.state())
            .field("selection", &self.selection)
            .finish()
    }
}

impl<O, K> SelectionEngine<O, K> {
    /// Drop timers and listeners without firing callbacks
    pub fn teardown(&mut self) -> Commands {
        let mut commands = Commands::new();
        if let Some(ticket) = self.mode.cancel_pending() {
            commands.push(EngineCommand::CancelScheduledSearch(ticket));
        }
        if self.open {
            self.open = false;
            commands.push(EngineCommand::ReleaseListeners);
        }
        commands
    }
}

impl<O, K> SelectionEngine<O, K>
where
    O: Clone,
    K: Identity,
{
    /// Create an engine; fails if the configuration does not validate
    pub fn new(config: SelectConfig, accessors: Accessors<O, K>) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            mode: ModeController::new(config.search_debounce()),
            pagination: PaginationDriver::new(
                config.default_page_size,
                config.row_height,
                config.max_visible_items,
            ),
            selection: Selection::empty(config.multiple),
            config,
            accessors,
            callbacks: SelectCallbacks::default(),
            cache: OptionCache::new(),
            pinned: OptionCache::new(),
            search_buffer: Vec::new(),
            visible: VisibleOptions::default(),
            input: String::new(),
            open: false,
            loader_attached: true,
            search_attached: false,
            in_flight: None,
            generation: 0,
            last_seed: None,
            preserve_focus: false,
            last_error: None,
        })
    }

    pub fn with_callbacks(mut self, callbacks: SelectCallbacks<O, K>) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Whether a page loader is available (default: yes)
    pub fn with_loader(mut self, attached: bool) -> Self {
        self.loader_attached = attached;
        self
    }

    /// Whether a search provider is available (default: no)
    pub fn with_search(mut self, attached: bool) -> Self {
        self.set_search_attached(attached);
        self
    }

    /// Attach or detach the search provider after construction
    pub fn set_search_attached(&mut self, attached: bool) {
        self.search_attached = attached;
        if !attached {
            self.mode.cancel_pending();
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    pub fn accessors(&self) -> &Accessors<O, K> {
        &self.accessors
    }

    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn input_text(&self) -> &str {
        &self.input
    }

    pub fn selection(&self) -> &Selection<K> {
        &self.selection
    }

    pub fn cache(&self) -> &OptionCache<O, K> {
        &self.cache
    }

    pub fn search_results(&self) -> &[O] {
        &self.search_buffer
    }

    pub fn visible_options(&self) -> &VisibleOptions<O, K> {
        &self.visible
    }

    pub fn pagination(&self) -> &PaginationState {
        self.pagination.state()
    }

    pub fn has_next_page(&self) -> bool {
        self.pagination.has_next()
    }

    pub fn is_loading_more(&self) -> bool {
        self.pagination.is_loading()
    }

    pub fn is_searching(&self) -> bool {
        self.mode.is_searching()
    }

    pub fn last_error(&self) -> Option<&SelectError> {
        self.last_error.as_ref()
    }

    /// Whether the input should keep focus across the next render
    pub fn preserve_focus(&self) -> bool {
        self.preserve_focus
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.selection.contains(key)
    }

    pub fn select_all_state(&self) -> SelectAllState {
        select_all_state(&self.visible.keys, &self.selection)
    }

    /// Selected options that can be resolved, in visible order
    pub fn selected_options(&self) -> Vec<&O> {
        let selected = self.selection.key_set();
        self.visible
            .keys
            .iter()
            .zip(&self.visible.options)
            .filter(|(key, _)| selected.contains(*key))
            .map(|(_, option)| option)
            .collect()
    }

    /// Label of the single-select value, if it can be resolved
    pub fn selected_label(&self) -> Option<String> {
        let key = self.selection.keys().first()?;
        self.visible
            .get(key)
            .or_else(|| self.cache.lookup(key))
            .or_else(|| self.pinned.lookup(key))
            .map(|option| self.accessors.label_of(option))
    }

    pub fn show_spinner(&self) -> bool {
        self.config.loading || self.is_searching() || self.is_loading_more()
    }

    pub fn show_clear_button(&self) -> bool {
        self.config.clearable
            && !self.config.disabled
            && (!self.selection.is_empty() || !self.input.is_empty())
    }

    pub fn show_select_all(&self) -> bool {
        self.config.show_select_all && self.config.multiple && !self.visible.is_empty()
    }

    /// Status row above the options
    pub fn list_status(&self) -> Option<ListStatus> {
        let state = self.pagination.state();
        if self.is_loading_more() && !self.is_searching() {
            return Some(ListStatus::LoadingMore {
                next_page: state.next_page(),
                total_pages: state.total_pages,
            });
        }
        match self.mode.mode() {
            Mode::Search
                if !self.is_searching()
                    && self.search_buffer.is_empty()
                    && !self.input.trim().is_empty() =>
            {
                Some(ListStatus::NoResults {
                    query: self.input.clone(),
                })
            }
            Mode::Browse => state.total_records.map(|total| ListStatus::ItemsLoaded {
                loaded: self.cache.len(),
                total,
            }),
            _ => None,
        }
    }

    /// Text shown in place of the list when nothing is visible
    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.visible.is_empty() {
            return None;
        }
        if self.is_searching() {
            Some(EmptyState::Searching)
        } else {
            Some(EmptyState::NoOptions)
        }
    }

    /// Row model for the dropdown
    pub fn listbox(&self) -> Listbox {
        let select_all = self.show_select_all().then(|| self.select_all_state());
        Listbox::build(
            select_all,
            self.list_status(),
            self.visible.len(),
            self.config.row_height,
            self.config.max_visible_items,
        )
    }

    /// Scroll proximity rule combined with the loading gates
    pub fn should_load_next(
        &self,
        scroll_position: f32,
        total_height: f32,
        viewport_height: f32,
    ) -> bool {
        self.can_load()
            && self
                .pagination
                .should_load_next(scroll_position, total_height, viewport_height)
    }

    fn can_load(&self) -> bool {
        self.loader_attached
            && self.mode.mode() == Mode::Browse
            && self.pagination.has_next()
            && !self.pagination.is_loading()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Initial load when no seed data was provided
    pub fn mount(&mut self) -> Commands {
        if self.pagination.is_pristine() && self.cache.is_empty() {
            return self.load_next();
        }
        Commands::new()
    }

    pub fn open(&mut self) -> Commands {
        let mut commands = Commands::new();
        if self.open || self.config.disabled {
            return commands;
        }
        self.open = true;
        tracing::debug!("Dropdown opened");
        self.callbacks.opened();
        commands.push(EngineCommand::AcquireListeners);
        if self.pagination.is_pristine() {
            commands.extend(self.load_next());
        }
        commands
    }

    /// Close the dropdown and leave search
    pub fn close(&mut self) -> Commands {
        let mut commands = Commands::new();
        if !self.open {
            return commands;
        }
        self.open = false;
        self.search_buffer.clear();
        self.mode.enter_browse();
        if let Some(ticket) = self.mode.cancel_pending() {
            commands.push(EngineCommand::CancelScheduledSearch(ticket));
        }
        self.refresh();
        if !self.config.multiple {
            self.input = self.selected_label().unwrap_or_default();
        }
        self.preserve_focus = false;
        tracing::debug!("Dropdown closed");
        self.callbacks.closed();
        commands.push(EngineCommand::ReleaseListeners);
        commands
    }

    /// Arrow button
    pub fn toggle_open(&mut self) -> Commands {
        if self.open {
            self.close()
        } else {
            self.open()
        }
    }

    pub fn pointer_down_outside(&mut self) -> Commands {
        self.close()
    }

    pub fn set_disabled(&mut self, disabled: bool) -> Commands {
        self.config.disabled = disabled;
        if disabled {
            self.close()
        } else {
            Commands::new()
        }
    }

    /// External loading indicator
    pub fn set_loading(&mut self, loading: bool) {
        self.config.loading = loading;
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Input text changed
    pub fn input_changed(&mut self, text: impl Into<String>) -> Commands {
        self.input = text.into();
        let mut commands = Commands::new();
        let outcome = self.mode.input_changed(&self.input);

        if let Some(ticket) = outcome.cancelled {
            commands.push(EngineCommand::CancelScheduledSearch(ticket));
        }
        match outcome.scheduled {
            Some((ticket, delay)) if self.search_attached => {
                tracing::trace!("Scheduling search {} in {:?}", ticket.raw(), delay);
                commands.push(EngineCommand::ScheduleSearch { ticket, delay });
            }
            Some(_) => {
                self.mode.cancel_pending();
            }
            None => {}
        }
        if outcome.returned_to_browse || self.mode.mode() == Mode::Browse {
            if outcome.returned_to_browse {
                tracing::debug!("Input cleared, back to browse");
            }
            self.search_buffer.clear();
        }
        self.refresh();
        commands
    }

    /// The debounce timer with `ticket` fired
    pub fn debounce_elapsed(&mut self, ticket: DebounceTicket) -> Commands {
        let mut commands = Commands::new();
        let Some(text) = self.mode.take_elapsed(ticket) else {
            tracing::debug!("Ignoring stale debounce timer {}", ticket.raw());
            return commands;
        };
        if !self.search_attached {
            return commands;
        }

        let terms = parse_search_terms(&text);
        self.search_buffer.clear();
        if terms.is_empty() {
            self.mode.enter_search_idle();
        } else {
            let ticket = self.mode.begin_search();
            tracing::debug!("Searching for {:?} (ticket {})", terms, ticket.raw());
            commands.push(EngineCommand::Search { ticket, terms });
        }
        self.refresh();
        commands
    }

    /// Apply the outcome of the search issued with `ticket`
    pub fn apply_search(
        &mut self,
        ticket: SearchTicket,
        terms: Vec<String>,
        result: SourceResult<O>,
    ) {
        if !self.mode.accepts(ticket) {
            tracing::debug!("Discarding stale search response {}", ticket.raw());
            return;
        }
        self.mode.finish_search();
        match result {
            Ok(response) => match response.normalize() {
                Some(normalized) => {
                    tracing::debug!("Search returned {} options", normalized.data.len());
                    self.search_buffer = normalized.data;
                    self.pin_selected_results();
                }
                None => tracing::debug!("Ignoring malformed search response"),
            },
            Err(err) => {
                tracing::warn!("Search for {:?} failed: {}", terms, err);
                self.search_buffer.clear();
                self.last_error = Some(SelectError::Search { terms, source: err });
            }
        }
        self.refresh();
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Request the next browse page if allowed
    pub fn load_next(&mut self) -> Commands {
        let mut commands = Commands::new();
        if !self.loader_attached || self.mode.mode() == Mode::Search {
            return commands;
        }
        if let Some(params) = self.pagination.begin() {
            let ticket = PageTicket {
                page: params.page,
                generation: self.generation,
            };
            self.in_flight = Some(ticket);
            tracing::debug!("Loading page {} (size {})", params.page, params.page_size);
            commands.push(EngineCommand::LoadPage { ticket, params });
        }
        commands
    }

    /// Apply the outcome of the page request issued with `ticket`
    pub fn apply_page(&mut self, ticket: PageTicket, result: SourceResult<O>) {
        if self.in_flight != Some(ticket) {
            tracing::debug!("Ignoring response for page {}: not in flight", ticket.page);
            return;
        }
        self.in_flight = None;

        if ticket.generation != self.generation {
            tracing::debug!("Dropping page {}: issued before reset", ticket.page);
            self.pagination.abandon();
            return;
        }
        if self.mode.mode() == Mode::Search {
            tracing::debug!("Dropping page {}: search mode active", ticket.page);
            self.pagination.abandon();
            return;
        }

        match result {
            Ok(response) => match response.normalize() {
                Some(normalized) => {
                    self.pagination.complete(ticket.page, &normalized);
                    let added = self.cache.merge(normalized.data, &self.accessors);
                    tracing::debug!(
                        "Page {} merged: {} new, {} cached, has_next={}",
                        self.pagination.state().current_page,
                        added,
                        self.cache.len(),
                        self.pagination.has_next()
                    );
                }
                None => {
                    tracing::debug!("Ignoring malformed response for page {}", ticket.page);
                    self.pagination.abandon();
                }
            },
            Err(err) => {
                tracing::error!("Error loading page {}: {}", ticket.page, err);
                self.pagination.fail();
                self.last_error = Some(SelectError::PageLoad {
                    page: ticket.page,
                    source: err,
                });
            }
        }
        self.refresh();
    }

    /// Scroll event from the virtual list
    pub fn list_scrolled(&mut self, event: ScrollEvent) -> Commands {
        if self.can_load()
            && self
                .pagination
                .should_load_for_scroll(&event, self.visible.len())
        {
            return self.load_next();
        }
        Commands::new()
    }

    /// Raw metrics from the direct scroll listener
    pub fn container_scrolled(&mut self, metrics: ScrollMetrics) -> Commands {
        if self.can_load() && self.pagination.should_load_for_metrics(&metrics) {
            return self.load_next();
        }
        Commands::new()
    }

    // =========================================================================
    // Seed data and reset
    // =========================================================================

    /// Ingest initial data; the same `Arc` is only ingested once
    pub fn seed(&mut self, data: Arc<LoadResponse<O>>, input_focused: bool) -> Commands {
        let mut commands = Commands::new();
        if let Some(ref last) = self.last_seed {
            if Arc::ptr_eq(last, &data) {
                return commands;
            }
        }
        self.last_seed = Some(Arc::clone(&data));

        if input_focused {
            self.preserve_focus = true;
            commands.push(EngineCommand::RestoreFocus {
                delay: Duration::from_millis(FOCUS_DELAY_MS),
            });
        }

        let Some(normalized) = (*data).clone().normalize() else {
            tracing::debug!("Seed data is empty");
            return commands;
        };
        if normalized.data.is_empty() {
            return commands;
        }

        if normalized.is_search || !self.input.trim().is_empty() {
            tracing::debug!("Seeding {} search results", normalized.data.len());
            self.mode.enter_search_idle();
            self.search_buffer = normalized.data;
            self.pin_selected_results();
        } else {
            self.pagination
                .seed(&normalized, self.config.default_page_size);
            self.last_error = None;
            let added = self.cache.merge(normalized.data, &self.accessors);
            tracing::debug!("Seeded {} options ({} new)", self.cache.len(), added);
        }
        self.refresh();
        commands
    }

    /// Focus was handed back to the input
    pub fn focus_restored(&mut self) {
        self.preserve_focus = false;
    }

    /// Forget pagination and cached options, keeping the selected ones
    pub fn reset(&mut self) -> Commands {
        let keep = self.selection.key_set();
        self.cache.retain_keys(&keep);
        self.pinned.retain_keys(&keep);
        self.pagination.reset(self.config.default_page_size);
        self.generation += 1;
        self.last_error = None;
        tracing::debug!("Reset, {} selected options kept", self.cache.len());
        self.refresh();
        if self.open && !self.pagination.is_loading() {
            return self.load_next();
        }
        Commands::new()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Host writes back the accepted selection
    pub fn set_selection(&mut self, selection: Selection<K>) {
        self.selection = selection.coerce(self.config.multiple);
        self.pin_selected_results();
        self.pinned.retain_keys(&self.selection.key_set());
        self.refresh();
        if !self.config.multiple && !self.open {
            self.input = self.selected_label().unwrap_or_default();
        }
    }

    /// Option row clicked
    pub fn click_option(&mut self, key: &K) -> Update<K> {
        let mut update = Update::default();
        if self.config.disabled {
            return update;
        }
        let Some(option) = self.visible.get(key).cloned() else {
            tracing::debug!("Click on unknown option {:?}", key);
            return update;
        };
        if !self.cache.contains(key) {
            self.pinned.merge([option.clone()], &self.accessors);
        }

        if self.config.multiple {
            let next = self.selection.toggled(key);
            self.callbacks.commit(&next);
            self.callbacks.selected(&SelectedOptions::One(option));
            update.proposed = Some(next);
        } else {
            let next = Selection::single(key.clone());
            let label = self.accessors.label_of(&option);
            self.callbacks.commit(&next);
            self.callbacks.selected(&SelectedOptions::One(option));
            update.commands = self.close();
            self.input = label;
            update.proposed = Some(next);
        }
        update
    }

    /// Chip delete button
    pub fn remove_chip(&mut self, key: &K) -> Update<K> {
        let mut update = Update::default();
        if self.config.disabled || !self.config.multiple || !self.selection.contains(key) {
            return update;
        }
        let next = self.selection.without(key);
        self.callbacks.commit(&next);
        update.proposed = Some(next);
        update
    }

    /// Clear button
    pub fn clear(&mut self) -> Update<K> {
        let mut update = Update::default();
        if self.config.disabled {
            return update;
        }
        let next = Selection::empty(self.config.multiple);
        self.callbacks.commit(&next);
        self.input.clear();
        self.search_buffer.clear();
        self.mode.enter_browse();
        if let Some(ticket) = self.mode.cancel_pending() {
            update
                .commands
                .push(EngineCommand::CancelScheduledSearch(ticket));
        }
        self.refresh();
        update.proposed = Some(next);
        update
    }

    /// Select-all row
    pub fn toggle_select_all(&mut self) -> Update<K> {
        let mut update = Update::default();
        if self.config.disabled || !self.config.multiple || self.visible.is_empty() {
            return update;
        }
        let next = toggle_select_all(&self.visible.keys, &self.selection);
        let cache = &self.cache;
        let from_search = self
            .visible
            .keys
            .iter()
            .zip(&self.visible.options)
            .filter(|(key, _)| !cache.contains(key))
            .map(|(_, option)| option.clone());
        self.pinned.merge(from_search, &self.accessors);
        self.callbacks.commit(&next);
        self.callbacks
            .selected(&SelectedOptions::Many(self.visible.options.clone()));
        update.proposed = Some(next);
        update
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    /// Keep selected search results resolvable after the buffer is cleared
    fn pin_selected_results(&mut self) {
        let selection = &self.selection;
        let cache = &self.cache;
        let accessors = &self.accessors;
        let selected = self
            .search_buffer
            .iter()
            .filter(|option| {
                let key = accessors.identity_of(option);
                selection.contains(&key) && !cache.contains(&key)
            })
            .cloned();
        self.pinned.merge(selected, accessors);
    }

    fn refresh(&mut self) {
        self.visible = match self.mode.mode() {
            Mode::Browse => resolve_visible(
                self.cache.values(),
                &self.cache,
                &self.pinned,
                &self.selection,
                &self.accessors,
            ),
            Mode::Search => resolve_visible(
                self.search_buffer.iter(),
                &self.cache,
                &self.pinned,
                &self.selection,
                &self.accessors,
            ),
        };
    }
}
