//! Async controller
//!
//! [`SelectController`] drives a [`SelectionEngine`] on a tokio runtime. It
//! executes the commands the engine returns:
//!
//! - page loads and searches run as spawned tasks whose results come back over
//!   an unbounded channel
//! - the debounce, focus and scroll-setup timers are spawned sleeps; the
//!   debounce timer is aborted on every keystroke and all timers are aborted
//!   when the controller is dropped
//! - host listeners are held in a [`ListenerScope`] for as long as the
//!   dropdown is open
//!
//! Completions are applied one at a time, on the task that owns the
//! controller, through [`SelectController::pump`], [`SelectController::next`]
//! or [`SelectController::settle`]. Collaborator requests are never aborted;
//! the engine drops results that arrive too late. A request that panics is
//! reported as [`LoadError::Cancelled`], so the engine always leaves its
//! loading state.

use std::sync::Arc;
use std::time::Duration;

use paged_select_core::config::SCROLL_SETUP_DELAY_MS;
use paged_select_core::{
    Commands, DebounceTicket, EngineCommand, Identity, LoadError, LoadResponse, OptionKey,
    PageLoader, PageTicket, ScrollEvent, ScrollMetrics, SearchProvider, SearchTicket, Selection,
    SelectionEngine, SourceFuture, SourceResult, Update,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::listeners::{DetachedHost, ListenerKind, ListenerScope, WidgetHost};

/// Result delivered back to the controller
enum Completion<O> {
    Page {
        ticket: PageTicket,
        result: SourceResult<O>,
    },
    Search {
        ticket: SearchTicket,
        terms: Vec<String>,
        result: SourceResult<O>,
    },
    Debounce(DebounceTicket),
    Focus,
    ScrollSetup(u64),
}

/// Tokio driver for a [`SelectionEngine`]
pub struct SelectController<O, K = OptionKey> {
    engine: SelectionEngine<O, K>,
    loader: Arc<dyn PageLoader<O>>,
    search: Option<Arc<dyn SearchProvider<O>>>,
    host: Arc<dyn WidgetHost>,
    tx: mpsc::UnboundedSender<Completion<O>>,
    rx: mpsc::UnboundedReceiver<Completion<O>>,
    debounce: Option<(DebounceTicket, JoinHandle<()>)>,
    focus_timer: Option<JoinHandle<()>>,
    scroll_setup: Option<JoinHandle<()>>,
    listeners: ListenerScope,
    /// Bumped on every acquire/release so a late scroll setup can be discarded
    listener_epoch: u64,
    requests_in_flight: usize,
    auto_commit: bool,
}

impl<O, K> SelectController<O, K>
where
    O: Clone + Send + 'static,
    K: Identity,
{
    pub fn new(engine: SelectionEngine<O, K>, loader: Arc<dyn PageLoader<O>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            engine: engine.with_loader(true).with_search(false),
            loader,
            search: None,
            host: Arc::new(DetachedHost::default()),
            tx,
            rx,
            debounce: None,
            focus_timer: None,
            scroll_setup: None,
            listeners: ListenerScope::new(),
            listener_epoch: 0,
            requests_in_flight: 0,
            auto_commit: false,
        }
    }

    pub fn with_search(mut self, provider: Arc<dyn SearchProvider<O>>) -> Self {
        self.search = Some(provider);
        self.engine.set_search_attached(true);
        self
    }

    pub fn with_host(mut self, host: Arc<dyn WidgetHost>) -> Self {
        self.host = host;
        self
    }

    /// Adopt every proposed selection immediately instead of waiting for the host
    pub fn with_auto_commit(mut self, auto_commit: bool) -> Self {
        self.auto_commit = auto_commit;
        self
    }

    pub fn engine(&self) -> &SelectionEngine<O, K> {
        &self.engine
    }

    /// Page loads and searches not yet applied
    pub fn requests_in_flight(&self) -> usize {
        self.requests_in_flight
    }

    /// Whether any request or timer is still outstanding
    pub fn is_busy(&self) -> bool {
        self.requests_in_flight > 0
            || self.debounce.is_some()
            || self.focus_timer.is_some()
            || self.scroll_setup.is_some()
    }

    pub fn listeners(&self) -> &ListenerScope {
        &self.listeners
    }

    // =========================================================================
    // Events
    // =========================================================================

    pub fn mount(&mut self) {
        let commands = self.engine.mount();
        self.execute(commands);
    }

    pub fn open(&mut self) {
        let commands = self.engine.open();
        self.execute(commands);
    }

    pub fn close(&mut self) {
        let commands = self.engine.close();
        self.execute(commands);
    }

    pub fn toggle_open(&mut self) {
        let commands = self.engine.toggle_open();
        self.execute(commands);
    }

    pub fn pointer_down_outside(&mut self) {
        let commands = self.engine.pointer_down_outside();
        self.execute(commands);
    }

    pub fn input_changed(&mut self, text: impl Into<String>) {
        let commands = self.engine.input_changed(text);
        self.execute(commands);
    }

    pub fn list_scrolled(&mut self, event: ScrollEvent) {
        let commands = self.engine.list_scrolled(event);
        self.execute(commands);
    }

    pub fn container_scrolled(&mut self, metrics: ScrollMetrics) {
        let commands = self.engine.container_scrolled(metrics);
        self.execute(commands);
    }

    pub fn load_next(&mut self) {
        let commands = self.engine.load_next();
        self.execute(commands);
    }

    pub fn seed(&mut self, data: Arc<LoadResponse<O>>, input_focused: bool) {
        let commands = self.engine.seed(data, input_focused);
        self.execute(commands);
    }

    pub fn reset(&mut self) {
        let commands = self.engine.reset();
        self.execute(commands);
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        let commands = self.engine.set_disabled(disabled);
        self.execute(commands);
    }

    pub fn set_selection(&mut self, selection: Selection<K>) {
        self.engine.set_selection(selection);
    }

    pub fn click_option(&mut self, key: &K) -> Option<Selection<K>> {
        let update = self.engine.click_option(key);
        self.finish_update(update)
    }

    pub fn remove_chip(&mut self, key: &K) -> Option<Selection<K>> {
        let update = self.engine.remove_chip(key);
        self.finish_update(update)
    }

    pub fn clear(&mut self) -> Option<Selection<K>> {
        let update = self.engine.clear();
        self.finish_update(update)
    }

    pub fn toggle_select_all(&mut self) -> Option<Selection<K>> {
        let update = self.engine.toggle_select_all();
        self.finish_update(update)
    }

    fn finish_update(&mut self, update: Update<K>) -> Option<Selection<K>> {
        self.execute(update.commands);
        if self.auto_commit {
            if let Some(ref selection) = update.proposed {
                self.engine.set_selection(selection.clone());
            }
        }
        update.proposed
    }

    // =========================================================================
    // Completions
    // =========================================================================

    /// Apply every completion that is already available
    ///
    /// Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it
    pub async fn next(&mut self) {
        // The controller holds a sender, so the channel never closes
        if let Some(completion) = self.rx.recv().await {
            self.apply(completion);
        }
    }

    /// Apply completions until no request or timer is outstanding
    pub async fn settle(&mut self) {
        while self.is_busy() {
            self.next().await;
        }
    }

    fn apply(&mut self, completion: Completion<O>) {
        match completion {
            Completion::Page { ticket, result } => {
                self.requests_in_flight = self.requests_in_flight.saturating_sub(1);
                self.engine.apply_page(ticket, result);
            }
            Completion::Search {
                ticket,
                terms,
                result,
            } => {
                self.requests_in_flight = self.requests_in_flight.saturating_sub(1);
                self.engine.apply_search(ticket, terms, result);
            }
            Completion::Debounce(ticket) => {
                if matches!(self.debounce, Some((current, _)) if current == ticket) {
                    self.debounce = None;
                }
                let commands = self.engine.debounce_elapsed(ticket);
                self.execute(commands);
            }
            Completion::Focus => {
                self.focus_timer = None;
                self.host.focus_input();
                self.engine.focus_restored();
            }
            Completion::ScrollSetup(epoch) => {
                if epoch != self.listener_epoch {
                    return;
                }
                self.scroll_setup = None;
                if self.engine.is_open() {
                    self.listeners.attach(&self.host, ListenerKind::ListScroll);
                }
            }
        }
    }

    // =========================================================================
    // Command execution
    // =========================================================================

    fn execute(&mut self, commands: Commands) {
        for command in commands {
            tracing::trace!("Executing {:?}", command);
            match command {
                EngineCommand::LoadPage { ticket, params } => {
                    let request = self.loader.load_page(params);
                    let tx = self.tx.clone();
                    self.requests_in_flight += 1;
                    tokio::spawn(async move {
                        let result = run_request(request).await;
                        let _ = tx.send(Completion::Page { ticket, result });
                    });
                }
                EngineCommand::Search { ticket, terms } => {
                    let Some(ref provider) = self.search else {
                        tracing::warn!("Search requested without a search provider");
                        continue;
                    };
                    let request = provider.search(terms.clone());
                    let tx = self.tx.clone();
                    self.requests_in_flight += 1;
                    tokio::spawn(async move {
                        let result = run_request(request).await;
                        let _ = tx.send(Completion::Search {
                            ticket,
                            terms,
                            result,
                        });
                    });
                }
                EngineCommand::ScheduleSearch { ticket, delay } => {
                    self.abort_debounce();
                    let handle = self.after(delay, Completion::Debounce(ticket));
                    self.debounce = Some((ticket, handle));
                }
                EngineCommand::CancelScheduledSearch(ticket) => {
                    if matches!(self.debounce, Some((current, _)) if current == ticket) {
                        self.abort_debounce();
                    }
                }
                EngineCommand::AcquireListeners => {
                    self.listener_epoch += 1;
                    self.listeners
                        .attach(&self.host, ListenerKind::PointerDownOutside);
                    if let Some(handle) = self.scroll_setup.take() {
                        handle.abort();
                    }
                    let delay = Duration::from_millis(SCROLL_SETUP_DELAY_MS);
                    let completion = Completion::ScrollSetup(self.listener_epoch);
                    self.scroll_setup = Some(self.after(delay, completion));
                }
                EngineCommand::ReleaseListeners => {
                    self.listener_epoch += 1;
                    if let Some(handle) = self.scroll_setup.take() {
                        handle.abort();
                    }
                    self.listeners.release();
                }
                EngineCommand::RestoreFocus { delay } => {
                    if let Some(handle) = self.focus_timer.take() {
                        handle.abort();
                    }
                    self.focus_timer = Some(self.after(delay, Completion::Focus));
                }
            }
        }
    }

    /// Deliver `completion` after `delay`
    fn after(&self, delay: Duration, completion: Completion<O>) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(completion);
        })
    }

    fn abort_debounce(&mut self) {
        if let Some((ticket, handle)) = self.debounce.take() {
            tracing::trace!("Aborting debounce timer {}", ticket.raw());
            handle.abort();
        }
    }
}

/// Await a collaborator request on its own task
///
/// A request that panics or is aborted still produces a completion, reported
/// as [`LoadError::Cancelled`].
async fn run_request<O: Send + 'static>(request: SourceFuture<O>) -> SourceResult<O> {
    match tokio::spawn(request).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!("Collaborator request did not complete: {}", err);
            Err(LoadError::Cancelled)
        }
    }
}

impl<O, K> Drop for SelectController<O, K> {
    fn drop(&mut self) {
        for command in self.engine.teardown() {
            tracing::trace!("Teardown {:?}", command);
        }
        if let Some((_, handle)) = self.debounce.take() {
            handle.abort();
        }
        for handle in [self.focus_timer.take(), self.scroll_setup.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
        // Guards unsubscribe as the scope drops
        self.listeners.release();
    }
}
