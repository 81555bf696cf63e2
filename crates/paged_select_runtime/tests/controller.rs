//! Controller behaviour on a paused tokio clock

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use paged_select_core::prelude::*;
use paged_select_core::{LoadPageParams, Mode, ScrollEvent};
use paged_select_runtime::{ListenerId, ListenerKind, SelectController, WidgetHost};

type User = (u32, String);

fn user(id: u32) -> User {
    (id, format!("user-{}", id))
}

fn serve(params: &LoadPageParams, total: u32) -> Result<LoadResponse<User>, LoadError> {
    let start = (params.page - 1) * params.page_size;
    let end = (start + params.page_size).min(total);
    Ok(PageResponse::new((start..end).map(user).collect())
        .page(params.page, params.page_size)
        .totals(Some(total.div_ceil(params.page_size)), Some(total as u64))
        .into())
}

fn engine(page_size: u32) -> SelectionEngine<User, u32> {
    SelectionEngine::new(
        SelectConfig::new()
            .multiple(true)
            .default_page_size(page_size),
        Accessors::new(|u: &User| u.0, |u: &User| u.1.clone()),
    )
    .unwrap()
}

/// Loader over `total` users that counts its calls
fn counting_loader(total: u32, calls: Arc<AtomicUsize>) -> Arc<dyn PageLoader<User>> {
    page_loader(move |params: LoadPageParams| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            serve(&params, total)
        }
    })
}

/// Search provider that records the terms it was asked for
fn recording_search(log: Arc<Mutex<Vec<Vec<String>>>>) -> Arc<dyn SearchProvider<User>> {
    search_provider(move |terms: Vec<String>| {
        log.lock().unwrap().push(terms);
        async move {
            // Slow enough for a newer query to overtake it
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(LoadResponse::Options(vec![user(9000), user(9001)]))
        }
    })
}

#[derive(Default)]
struct RecordingHost {
    next: AtomicUsize,
    live: Mutex<Vec<(ListenerId, ListenerKind)>>,
    focused: AtomicUsize,
}

impl RecordingHost {
    fn live_kinds(&self) -> Vec<ListenerKind> {
        self.live.lock().unwrap().iter().map(|(_, k)| *k).collect()
    }
}

impl WidgetHost for RecordingHost {
    fn subscribe(&self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next.fetch_add(1, Ordering::SeqCst) as u64);
        self.live.lock().unwrap().push((id, kind));
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.live.lock().unwrap().retain(|(live, _)| *live != id);
    }

    fn focus_input(&self) {
        self.focused.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test(start_paused = true)]
async fn rapid_typing_collapses_into_one_search() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let calls = Arc::new(AtomicUsize::new(0));
    let mut c = SelectController::new(engine(10), counting_loader(100, calls))
        .with_search(recording_search(log.clone()));
    c.mount();
    c.settle().await;

    for text in ["a", "ab", "abc"] {
        c.input_changed(text);
        tokio::time::sleep(Duration::from_millis(100)).await;
        c.pump();
    }
    c.settle().await;

    assert_eq!(*log.lock().unwrap(), vec![vec!["abc".to_string()]]);
    assert_eq!(c.engine().mode(), Mode::Search);
    assert_eq!(c.engine().visible_options().keys, vec![9000, 9001]);
}

#[tokio::test(start_paused = true)]
async fn late_search_after_clear_keeps_browse_data() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let calls = Arc::new(AtomicUsize::new(0));
    let mut c = SelectController::new(engine(10), counting_loader(100, calls))
        .with_search(recording_search(log.clone()));
    c.mount();
    c.settle().await;
    let browse = c.engine().visible_options().keys.clone();

    c.input_changed("a");
    // Debounce fires and the search goes out
    c.next().await;
    assert_eq!(log.lock().unwrap().len(), 1);
    assert!(c.engine().is_searching());

    c.input_changed("");
    c.settle().await;

    assert_eq!(c.requests_in_flight(), 0);
    assert_eq!(c.engine().mode(), Mode::Browse);
    assert_eq!(c.engine().visible_options().keys, browse);
}

#[tokio::test(start_paused = true)]
async fn pagination_stops_after_last_page() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut c = SelectController::new(engine(10), counting_loader(95, calls.clone()));
    c.mount();
    c.settle().await;

    while c.engine().has_next_page() {
        c.load_next();
        // A second request while one is in flight is suppressed
        c.load_next();
        assert_eq!(c.requests_in_flight(), 1);
        c.settle().await;
    }

    assert_eq!(calls.load(Ordering::SeqCst), 10);
    assert_eq!(c.engine().cache().len(), 95);
    c.load_next();
    assert_eq!(c.requests_in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn scrolling_near_the_end_loads_the_next_page() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut c = SelectController::new(engine(10), counting_loader(100, calls.clone()));
    c.mount();
    c.settle().await;

    c.list_scrolled(ScrollEvent::forward(60.0));
    c.settle().await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(c.engine().pagination().current_page, 2);
}

#[tokio::test(start_paused = true)]
async fn listeners_follow_the_dropdown() {
    let host = Arc::new(RecordingHost::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let mut c = SelectController::new(engine(10), counting_loader(100, calls))
        .with_host(host.clone());

    c.open();
    assert_eq!(host.live_kinds(), vec![ListenerKind::PointerDownOutside]);
    c.settle().await;
    assert_eq!(
        host.live_kinds(),
        vec![ListenerKind::PointerDownOutside, ListenerKind::ListScroll]
    );

    c.pointer_down_outside();
    assert!(host.live_kinds().is_empty());
    assert!(!c.engine().is_open());

    c.open();
    drop(c);
    assert!(host.live_kinds().is_empty());
}

#[tokio::test(start_paused = true)]
async fn closing_before_scroll_setup_never_attaches_scroll_listener() {
    let host = Arc::new(RecordingHost::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let mut c = SelectController::new(engine(10), counting_loader(100, calls))
        .with_host(host.clone());

    c.open();
    c.close();
    c.settle().await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    c.pump();
    assert!(host.live_kinds().is_empty());
}

#[tokio::test(start_paused = true)]
async fn seed_while_focused_restores_focus() {
    let host = Arc::new(RecordingHost::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let mut c = SelectController::new(engine(10), counting_loader(100, calls.clone()))
        .with_host(host.clone());

    c.seed(Arc::new(vec![user(1), user(2)].into()), true);
    assert!(c.engine().preserve_focus());
    c.mount();
    c.settle().await;

    assert_eq!(host.focused.load(Ordering::SeqCst), 1);
    assert!(!c.engine().preserve_focus());
    // Seeded, so mount did not fetch
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn page_failure_is_recorded() {
    let loader = page_loader(|_params: LoadPageParams| async {
        Err::<LoadResponse<User>, _>(LoadError::Request("503".into()))
    });
    let mut c = SelectController::new(engine(10), loader);
    c.mount();
    c.settle().await;

    assert!(matches!(
        c.engine().last_error(),
        Some(SelectError::PageLoad { page: 1, .. })
    ));
    assert!(!c.engine().has_next_page());
}

#[tokio::test(start_paused = true)]
async fn auto_commit_adopts_proposed_selection() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut c = SelectController::new(engine(10), counting_loader(100, calls))
        .with_auto_commit(true);
    c.mount();
    c.settle().await;

    assert_eq!(c.click_option(&3), Some(Selection::multiple([3])));
    assert_eq!(c.engine().selection(), &Selection::multiple([3]));
    c.toggle_select_all();
    assert_eq!(c.engine().select_all_state(), SelectAllState::All);
    c.clear();
    assert!(c.engine().selection().is_empty());
}

async fn exploding_loader(_params: LoadPageParams) -> Result<LoadResponse<User>, LoadError> {
    panic!("loader exploded")
}

async fn exploding_search(_terms: Vec<String>) -> Result<LoadResponse<User>, LoadError> {
    panic!("search exploded")
}

#[tokio::test(start_paused = true)]
async fn panicking_loader_releases_the_loading_state() {
    let mut c = SelectController::new(engine(10), page_loader(exploding_loader));
    c.mount();
    assert!(c.engine().is_loading_more());
    c.settle().await;

    assert_eq!(c.requests_in_flight(), 0);
    assert!(!c.engine().is_loading_more());
    assert!(!c.engine().show_spinner());
    assert_eq!(
        c.engine().last_error(),
        Some(&SelectError::PageLoad {
            page: 1,
            source: LoadError::Cancelled
        })
    );
}

#[tokio::test(start_paused = true)]
async fn panicking_search_clears_the_searching_flag() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut c = SelectController::new(engine(10), counting_loader(100, calls))
        .with_search(search_provider(exploding_search));
    c.mount();
    c.settle().await;

    c.input_changed("a");
    c.settle().await;

    assert_eq!(c.requests_in_flight(), 0);
    assert_eq!(c.engine().mode(), Mode::Search);
    assert!(!c.engine().is_searching());
    assert!(matches!(
        c.engine().last_error(),
        Some(SelectError::Search {
            source: LoadError::Cancelled,
            ..
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_controller_cancels_the_pending_search() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let calls = Arc::new(AtomicUsize::new(0));
    let mut c = SelectController::new(engine(10), counting_loader(100, calls))
        .with_search(recording_search(log.clone()));
    c.mount();
    c.settle().await;

    c.input_changed("a");
    drop(c);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(log.lock().unwrap().is_empty());
}
