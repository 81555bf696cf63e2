//! Browse / Search mode controller
//!
//! Typing schedules a debounced search; each keystroke supersedes the previous
//! timer. Timers and search requests are tagged with monotonically increasing
//! tickets so that a timer that was cancelled, or a response to a request that
//! has been superseded, can always be recognised and dropped.

use std::time::Duration;

/// Which data source feeds the visible list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Paginated, cumulatively cached data
    #[default]
    Browse,
    /// Only the latest search response
    Search,
}

/// Identifies one scheduled debounce timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DebounceTicket(u64);

impl DebounceTicket {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Identifies one issued search request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
struct PendingDebounce {
    ticket: DebounceTicket,
    text: String,
}

/// Result of a keystroke
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputOutcome {
    /// A previously scheduled timer must be cancelled
    pub cancelled: Option<DebounceTicket>,
    /// A new timer must be scheduled
    pub scheduled: Option<(DebounceTicket, Duration)>,
    /// The input became empty and the controller went back to Browse
    pub returned_to_browse: bool,
}

/// Mode state machine with debounce and search ticketing
#[derive(Clone, Debug)]
pub struct ModeController {
    mode: Mode,
    debounce: Duration,
    pending: Option<PendingDebounce>,
    next_debounce: u64,
    next_search: u64,
    current_search: Option<SearchTicket>,
    searching: bool,
}

impl ModeController {
    pub fn new(debounce: Duration) -> Self {
        Self {
            mode: Mode::Browse,
            debounce,
            pending: None,
            next_debounce: 0,
            next_search: 0,
            current_search: None,
            searching: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn pending_debounce(&self) -> Option<DebounceTicket> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    pub fn current_search(&self) -> Option<SearchTicket> {
        self.current_search
    }

    /// Handle new input text
    pub fn input_changed(&mut self, text: &str) -> InputOutcome {
        let cancelled = self.pending.take().map(|p| p.ticket);

        if text.trim().is_empty() {
            let returned_to_browse = self.mode == Mode::Search || self.searching;
            self.enter_browse();
            return InputOutcome {
                cancelled,
                scheduled: None,
                returned_to_browse,
            };
        }

        self.next_debounce += 1;
        let ticket = DebounceTicket(self.next_debounce);
        self.pending = Some(PendingDebounce {
            ticket,
            text: text.to_string(),
        });
        InputOutcome {
            cancelled,
            scheduled: Some((ticket, self.debounce)),
            returned_to_browse: false,
        }
    }

    /// Consume the pending timer if `ticket` is still current
    ///
    /// Returns the input text the timer was scheduled for.
    pub fn take_elapsed(&mut self, ticket: DebounceTicket) -> Option<String> {
        match &self.pending {
            Some(pending) if pending.ticket == ticket => self.pending.take().map(|p| p.text),
            _ => None,
        }
    }

    /// Drop any pending timer, returning its ticket
    pub fn cancel_pending(&mut self) -> Option<DebounceTicket> {
        self.pending.take().map(|p| p.ticket)
    }

    /// Switch to Search and issue a new search ticket
    pub fn begin_search(&mut self) -> SearchTicket {
        self.mode = Mode::Search;
        self.searching = true;
        self.next_search += 1;
        let ticket = SearchTicket(self.next_search);
        self.current_search = Some(ticket);
        ticket
    }

    /// Switch to Search without a request in flight
    pub fn enter_search_idle(&mut self) {
        self.mode = Mode::Search;
        self.searching = false;
        // Any in-flight response is now superseded
        self.current_search = None;
    }

    /// Whether a search response with `ticket` may still be applied
    pub fn accepts(&self, ticket: SearchTicket) -> bool {
        self.mode == Mode::Search && self.current_search == Some(ticket)
    }

    /// Mark the current search as finished
    pub fn finish_search(&mut self) {
        self.searching = false;
    }

    /// Return to Browse, superseding any in-flight search
    pub fn enter_browse(&mut self) {
        self.mode = Mode::Browse;
        self.searching = false;
        self.current_search = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ModeController {
        ModeController::new(Duration::from_millis(300))
    }

    #[test]
    fn test_keystrokes_supersede_timers() {
        let mut mc = controller();

        let first = mc.input_changed("a");
        let (t1, delay) = first.scheduled.unwrap();
        assert_eq!(delay, Duration::from_millis(300));
        assert!(first.cancelled.is_none());

        let second = mc.input_changed("ab");
        assert_eq!(second.cancelled, Some(t1));
        let (t2, _) = second.scheduled.unwrap();

        // The superseded timer can never fire
        assert_eq!(mc.take_elapsed(t1), None);
        assert_eq!(mc.take_elapsed(t2).as_deref(), Some("ab"));
        // And a ticket fires at most once
        assert_eq!(mc.take_elapsed(t2), None);
    }

    #[test]
    fn test_clearing_input_cancels_and_returns_to_browse() {
        let mut mc = controller();
        let (ticket, _) = mc.input_changed("a").scheduled.unwrap();
        mc.take_elapsed(ticket);
        mc.begin_search();
        assert_eq!(mc.mode(), Mode::Search);

        let (pending, _) = mc.input_changed("ab").scheduled.unwrap();
        let outcome = mc.input_changed("   ");
        assert_eq!(outcome.cancelled, Some(pending));
        assert!(outcome.returned_to_browse);
        assert_eq!(mc.mode(), Mode::Browse);
        assert!(!mc.is_searching());
        assert_eq!(mc.take_elapsed(pending), None);
    }

    #[test]
    fn test_search_ticket_acceptance() {
        let mut mc = controller();
        let first = mc.begin_search();
        assert!(mc.accepts(first));

        // Typing more without firing keeps the in-flight search current
        mc.input_changed("abc");
        assert!(mc.accepts(first));

        let second = mc.begin_search();
        assert!(!mc.accepts(first));
        assert!(mc.accepts(second));

        mc.enter_browse();
        assert!(!mc.accepts(second));
    }
}
