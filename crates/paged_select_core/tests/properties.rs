//! Behavioural properties of the selection engine, driven without a runtime

use paged_select_core::prelude::*;
use paged_select_core::{Commands, Mode, PageTicket, SearchTicket, SourceResult};

type User = (u32, String);

fn user(id: u32) -> User {
    (id, format!("user-{}", id))
}

fn engine(page_size: u32) -> SelectionEngine<User, u32> {
    SelectionEngine::new(
        SelectConfig::new()
            .multiple(true)
            .default_page_size(page_size),
        Accessors::new(|u: &User| u.0, |u: &User| u.1.clone()),
    )
    .unwrap()
    .with_search(true)
}

/// Directory of `total` users served `page_size` at a time, with totals
fn serve(params: &paged_select_core::LoadPageParams, total: u32) -> SourceResult<User> {
    let start = (params.page - 1) * params.page_size;
    let end = (start + params.page_size).min(total);
    let total_pages = total.div_ceil(params.page_size);
    Ok(PageResponse::new((start..end).map(user).collect())
        .page(params.page, params.page_size)
        .totals(Some(total_pages), Some(total as u64))
        .into())
}

fn take_load(commands: &Commands) -> Option<(PageTicket, paged_select_core::LoadPageParams)> {
    commands.iter().find_map(|c| match c {
        EngineCommand::LoadPage { ticket, params } => Some((*ticket, params.clone())),
        _ => None,
    })
}

fn run_search(engine: &mut SelectionEngine<User, u32>, text: &str) -> (SearchTicket, Vec<String>) {
    let scheduled = engine.input_changed(text);
    let ticket = scheduled
        .iter()
        .find_map(|c| match c {
            EngineCommand::ScheduleSearch { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .unwrap();
    engine
        .debounce_elapsed(ticket)
        .into_iter()
        .find_map(|c| match c {
            EngineCommand::Search { ticket, terms } => Some((ticket, terms)),
            _ => None,
        })
        .unwrap()
}

#[test]
fn cache_never_exceeds_distinct_identities() {
    let mut e = engine(10);
    let mut seen = std::collections::HashSet::new();
    let (ticket, _) = take_load(&e.mount()).unwrap();
    // Overlapping pages: ids repeat across responses
    let pages: [Vec<u32>; 4] = [
        (0..10).collect(),
        (5..15).collect(),
        (10..20).collect(),
        vec![1, 1, 2, 3],
    ];
    let mut ticket = Some(ticket);
    for ids in pages {
        seen.extend(ids.iter().copied());
        let t = ticket.take().unwrap_or_else(|| take_load(&e.load_next()).unwrap().0);
        e.apply_page(
            t,
            Ok(PageResponse::new(ids.into_iter().map(user).collect())
                .totals(Some(10), None)
                .into()),
        );
        assert!(e.cache().len() <= seen.len());
    }
    assert_eq!(e.cache().len(), seen.len());
}

#[test]
fn selected_options_survive_many_page_merges() {
    let mut e = engine(10);
    let (ticket, params) = take_load(&e.mount()).unwrap();
    e.apply_page(ticket, serve(&params, 500));
    e.set_selection(Selection::multiple([3, 7]));

    for _ in 0..12 {
        let (ticket, params) = take_load(&e.load_next()).unwrap();
        e.apply_page(ticket, serve(&params, 500));
    }
    assert_eq!(e.pagination().current_page, 13);

    // Search for something that does not contain the selected users
    let (ticket, terms) = run_search(&mut e, "user-4");
    e.apply_search(ticket, terms, Ok(vec![user(400), user(401)].into()));
    let keys = &e.visible_options().keys;
    assert!(keys.contains(&3));
    assert!(keys.contains(&7));
    assert_eq!(e.selected_options().len(), 2);
}

#[test]
fn select_all_twice_restores_selection() {
    let mut e = engine(10);
    let (ticket, params) = take_load(&e.mount()).unwrap();
    e.apply_page(ticket, serve(&params, 100));

    for start in [vec![], vec![2, 5], (0..10).collect::<Vec<_>>(), vec![42]] {
        let original = Selection::multiple(start);
        e.set_selection(original.clone());
        let partial = e.select_all_state() == SelectAllState::Some;
        let once = e.toggle_select_all().proposed.unwrap();
        e.set_selection(once);
        let twice = e.toggle_select_all().proposed.unwrap();
        if partial {
            // A partial selection is completed first, so the visible ones are dropped
            let visible = e.visible_options().keys.iter().copied().collect();
            assert_eq!(twice, original.difference(&visible));
        } else {
            assert_eq!(twice.key_set(), original.key_set());
        }
    }
}

#[test]
fn pagination_loads_exactly_ceil_n_over_p_pages() {
    for (total, page_size) in [(95u32, 10u32), (100, 10), (7, 50), (1000, 50)] {
        let mut e = engine(page_size);
        let mut loads = 0;
        let mut commands = e.mount();
        while let Some((ticket, params)) = take_load(&commands) {
            loads += 1;
            e.apply_page(ticket, serve(&params, total));
            commands = e.load_next();
        }
        assert_eq!(loads, total.div_ceil(page_size), "total={} size={}", total, page_size);
        assert!(!e.has_next_page());
        assert_eq!(e.cache().len(), total as usize);
    }
}

#[test]
fn rapid_typing_issues_one_search() {
    let mut e = engine(10);
    let mut scheduled = Vec::new();
    for text in ["a", "ab", "abc"] {
        for command in e.input_changed(text) {
            if let EngineCommand::ScheduleSearch { ticket, .. } = command {
                scheduled.push(ticket);
            }
        }
    }
    // Every timer fires, but only the last one is still current
    let searches: Vec<Vec<String>> = scheduled
        .into_iter()
        .flat_map(|t| e.debounce_elapsed(t))
        .filter_map(|c| match c {
            EngineCommand::Search { terms, .. } => Some(terms),
            _ => None,
        })
        .collect();
    assert_eq!(searches, vec![vec!["abc".to_string()]]);
}

#[test]
fn query_then_clear_leaves_cache_untouched() {
    let mut e = engine(10);
    let (ticket, params) = take_load(&e.mount()).unwrap();
    e.apply_page(ticket, serve(&params, 100));
    let before: Vec<u32> = e.cache().keys().copied().collect();

    let (ticket, terms) = run_search(&mut e, "x; y;z ");
    assert_eq!(terms, vec!["x", "y", "z"]);
    e.apply_search(ticket, terms, Ok(vec![user(900)].into()));
    e.input_changed("");

    assert_eq!(e.mode(), Mode::Browse);
    assert_eq!(e.cache().keys().copied().collect::<Vec<_>>(), before);
    assert_eq!(e.visible_options().keys, before);
}

#[test]
fn stale_search_after_clear_is_ignored() {
    let mut e = engine(10);
    let (ticket, params) = take_load(&e.mount()).unwrap();
    e.apply_page(ticket, serve(&params, 100));
    let browse = e.visible_options().keys.clone();

    let (ticket, terms) = run_search(&mut e, "a");
    e.input_changed("");
    e.apply_search(ticket, terms, Ok(vec![user(500), user(501)].into()));

    assert_eq!(e.mode(), Mode::Browse);
    assert_eq!(e.visible_options().keys, browse);
}
