//! Scripted demo session
//!
//! Walks a multi-select user picker through the usual interactions (initial
//! load, scrolling, searching, selecting and select-all) and prints what the
//! widget would show after each step.

use std::sync::Arc;

use anyhow::{Context, Result};
use paged_select_cn::prelude::*;
use paged_select_core::prelude::*;
use paged_select_core::Mode;
use paged_select_runtime::SelectController;
use tracing::info;

use crate::directory::{Directory, User};

/// Options for one run of the session
#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub config: SelectConfig,
    pub total_users: u32,
    pub query: String,
    /// Print the final view as JSON
    pub json: bool,
}

type Controller = SelectController<User, u32>;

fn build(options: &SessionOptions, directory: &Arc<Directory>) -> Result<Controller> {
    let callbacks = SelectCallbacks::new()
        .on_change(|selection: &Selection<u32>| {
            info!("Selection changed: {} selected", selection.len())
        })
        .on_open(|| info!("Dropdown opened"))
        .on_close(|| info!("Dropdown closed"))
        .on_select_option(|selected: &SelectedOptions<User>| match selected {
            SelectedOptions::One(user) => info!("Selected {}", user.name),
            SelectedOptions::Many(users) => info!("{} users selected", users.len()),
        });

    let engine = SelectionEngine::new(
        options.config.clone(),
        Accessors::new(|u: &User| u.id, User::label),
    )
    .context("Invalid select configuration")?
    .with_callbacks(callbacks);

    Ok(SelectController::new(engine, directory.loader())
        .with_search(directory.search_provider())
        .with_auto_commit(true))
}

fn report(step: &str, controller: &Controller) {
    let engine = controller.engine();
    let visible = engine.visible_options();
    let pagination = engine.pagination();

    println!("== {}", step);
    println!(
        "   mode: {:?}, visible: {}, cached: {}, page: {}/{}",
        engine.mode(),
        visible.len(),
        engine.cache().len(),
        pagination.current_page,
        pagination
            .total_pages
            .map_or_else(|| "?".to_string(), |t| t.to_string()),
    );
    if let Some(status) = engine.list_status() {
        println!("   status: {}", status.message());
    }
    if let Some(empty) = engine.empty_state() {
        println!("   {}", empty.message());
    }
    let selected: Vec<String> = engine
        .selected_options()
        .into_iter()
        .map(|user| user.name.clone())
        .collect();
    println!("   selected ({}): {}", selected.len(), selected.join(", "));
    if let Some(err) = engine.last_error() {
        println!("   error: {}", err);
    }
}

/// Run the scripted session to completion
pub async fn run(options: SessionOptions) -> Result<()> {
    let directory = Directory::new(options.total_users);
    info!("Directory holds {} users", directory.len());

    let mut controller = build(&options, &directory)?;
    let combobox = cn::combobox::<User>("users").render_row(|user, selected| {
        let mark = if selected { "[x]" } else { "[ ]" };
        format!("{} {} - {}", mark, user.name, user.role)
    });

    controller.mount();
    controller.settle().await;
    report("Mounted", &controller);

    controller.open();
    controller.settle().await;
    report("Opened", &controller);

    // Scroll the virtual list to its end to pull in the next page
    let mut window = ListWindow::for_listbox(&controller.engine().listbox());
    let bottom = window.total_height();
    controller.list_scrolled(window.scroll_to(bottom));
    controller.settle().await;
    report("Scrolled to the end", &controller);

    let first_two: Vec<u32> = controller
        .engine()
        .visible_options()
        .keys
        .iter()
        .take(2)
        .copied()
        .collect();
    for key in &first_two {
        controller.click_option(key);
    }
    report("Picked two users", &controller);

    controller.input_changed(options.query.as_str());
    controller.settle().await;
    report(&format!("Searched for {:?}", options.query), &controller);

    if controller.engine().mode() == Mode::Search {
        let hit = controller.engine().visible_options().keys.iter().copied().find(|key| {
            !controller.engine().is_selected(key)
        });
        if let Some(key) = hit {
            controller.click_option(&key);
            report("Picked a search result", &controller);
        }
    }

    controller.input_changed("");
    controller.settle().await;
    report("Cleared the query", &controller);

    if controller.engine().show_select_all() {
        controller.toggle_select_all();
        report("Select all", &controller);
        controller.toggle_select_all();
        report("Select all again", &controller);
    }

    let view = combobox.view(controller.engine());
    controller.close();
    report("Closed", &controller);

    if options.json {
        let json = serde_json::to_string_pretty(&view).context("Failed to serialize view")?;
        println!("{}", json);
    } else if let Some(ref dropdown) = view.dropdown {
        println!("== Last open dropdown ({} rows)", dropdown.rows.len());
        for row in dropdown.rows.iter().take(6) {
            match row {
                RowView::SelectAll { label, checkbox, .. } => {
                    println!("   {} {}", checkbox.icon().unwrap_or(' '), label)
                }
                RowView::Divider { .. } => println!("   ----"),
                RowView::Status { text, .. } => println!("   {}", text),
                RowView::Option(option) => println!("   {}", option.content),
            }
        }
    }

    Ok(())
}
