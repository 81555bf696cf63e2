//! Combobox view for a paged select
//!
//! Turns the state of a [`SelectionEngine`] into a render-ready description:
//! label, chips, the input with its accessibility attributes, the action
//! buttons, and (when open) the dropdown rows. Rendering backends draw the
//! view and route events back to the engine.
//!
//! # Example
//!
//! ```ignore
//! use paged_select_cn::prelude::*;
//!
//! let combobox = cn::combobox("users")
//!     .size(ComboboxSize::Large)
//!     .class_names(ClassNames::new().chip("user-chip"));
//!
//! let view = combobox.view(&engine);
//! for row in &view.dropdown.as_ref().unwrap().rows {
//!     // draw row
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use paged_select_core::{Identity, ListRow, ListStatus, SelectAllState, SelectionEngine};
use serde::Serialize;

use super::checkbox::{checkbox, Checkbox};
use super::chip::{chips, Chip};
use super::class_names::{join, ClassNames};
use super::spinner::{spinner, Spinner};

/// Content of an option row: `(option, is_selected) -> text`
pub type RenderRowFn<O> = Arc<dyn Fn(&O, bool) -> String + Send + Sync>;

/// Combobox size variants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ComboboxSize {
    /// Small combobox (height: 32px, text: 13px)
    Small,
    /// Medium combobox (height: 40px, text: 14px)
    #[default]
    Medium,
    /// Large combobox (height: 48px, text: 16px)
    Large,
}

impl ComboboxSize {
    pub fn height(&self) -> f32 {
        match self {
            ComboboxSize::Small => 32.0,
            ComboboxSize::Medium => 40.0,
            ComboboxSize::Large => 48.0,
        }
    }

    pub fn font_size(&self) -> f32 {
        match self {
            ComboboxSize::Small => 13.0,
            ComboboxSize::Medium => 14.0,
            ComboboxSize::Large => 16.0,
        }
    }
}

/// Text input part
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InputView {
    pub value: String,
    pub placeholder: String,
    pub disabled: bool,
    pub role: &'static str,
    pub aria_autocomplete: &'static str,
    pub aria_expanded: bool,
    pub aria_controls: String,
    pub class: String,
    pub height: f32,
    pub font_size: f32,
    /// Focus must survive the next render
    pub keep_focus: bool,
}

/// Open/close arrow
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArrowView {
    pub open: bool,
    pub aria_label: &'static str,
    pub disabled: bool,
}

/// Option row
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OptionRowView<K> {
    pub key: K,
    pub content: String,
    pub selected: bool,
    pub role: &'static str,
    /// Present in multi-select mode
    pub checkbox: Option<Checkbox>,
    pub class: String,
    pub height: f32,
}

/// One row of the dropdown
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum RowView<K> {
    SelectAll {
        checkbox: Checkbox,
        label: String,
        class: String,
    },
    Divider {
        height: f32,
    },
    Status {
        text: String,
        class: String,
    },
    Option(OptionRowView<K>),
}

/// Open dropdown
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DropdownView<K> {
    pub id: String,
    pub role: &'static str,
    pub multiselectable: bool,
    pub class: String,
    /// Viewport height of the virtual list
    pub height: f32,
    pub row_heights: Vec<f32>,
    pub rows: Vec<RowView<K>>,
    /// Shown instead of the list when there are no options
    pub empty_text: Option<String>,
}

/// Complete widget description
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComboboxView<K> {
    pub class: String,
    pub label: Option<String>,
    pub chips: Vec<Chip<K>>,
    pub more_chips: Option<String>,
    pub input: InputView,
    pub spinner: Option<Spinner>,
    pub clear_button: bool,
    pub arrow: ArrowView,
    pub dropdown: Option<DropdownView<K>>,
}

/// Combobox view builder
pub struct Combobox<O> {
    id: String,
    size: ComboboxSize,
    class_names: ClassNames,
    class_name: Option<String>,
    render_row: Option<RenderRowFn<O>>,
}

impl<O> Clone for Combobox<O> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            size: self.size,
            class_names: self.class_names.clone(),
            class_name: self.class_name.clone(),
            render_row: self.render_row.clone(),
        }
    }
}

impl<O> fmt::Debug for Combobox<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combobox")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("class_names", &self.class_names)
            .field("render_row", &self.render_row.is_some())
            .finish()
    }
}

impl<O> Combobox<O> {
    /// `id` prefixes element ids (the dropdown is `"{id}-listbox"`)
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            size: ComboboxSize::default(),
            class_names: ClassNames::default(),
            class_name: None,
            render_row: None,
        }
    }

    pub fn size(mut self, size: ComboboxSize) -> Self {
        self.size = size;
        self
    }

    pub fn class_names(mut self, class_names: ClassNames) -> Self {
        self.class_names = class_names;
        self
    }

    /// Extra class on the container
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Custom option row content
    pub fn render_row<F>(mut self, f: F) -> Self
    where
        F: Fn(&O, bool) -> String + Send + Sync + 'static,
    {
        self.render_row = Some(Arc::new(f));
        self
    }

    pub fn listbox_id(&self) -> String {
        format!("{}-listbox", self.id)
    }

    /// Describe the current engine state
    pub fn view<K>(&self, engine: &SelectionEngine<O, K>) -> ComboboxView<K>
    where
        O: Clone,
        K: Identity,
    {
        let config = engine.config();
        let names = &self.class_names;

        let container_state = config.disabled.then_some("ps-disabled");
        let class = join(
            "ps-container",
            &[self.class_name.as_deref(), names.container.as_deref(), container_state],
        );

        let (chip_views, more_chips) = if config.multiple {
            let items = engine
                .selected_options()
                .into_iter()
                .map(|option| {
                    let accessors = engine.accessors();
                    (accessors.identity_of(option), accessors.label_of(option))
                })
                .collect();
            let list = chips(items)
                .limit(config.limit_tags)
                .deletable(!config.disabled);
            let list = match names.chip {
                Some(ref class) => list.class_name(class.clone()),
                None => list,
            };
            (list.chips(), list.more_label())
        } else {
            (Vec::new(), None)
        };

        let open = engine.is_open();
        let input = InputView {
            value: engine.input_text().to_string(),
            placeholder: config.placeholder.clone(),
            disabled: config.disabled,
            role: "combobox",
            aria_autocomplete: "list",
            aria_expanded: open,
            aria_controls: self.listbox_id(),
            class: join(
                "ps-input",
                &[names.input.as_deref(), open.then_some("ps-input-focused")],
            ),
            height: self.size.height(),
            font_size: self.size.font_size(),
            keep_focus: engine.preserve_focus(),
        };

        let spinner = engine.show_spinner().then(|| match names.loader {
            Some(ref class) => spinner().class_name(class.clone()),
            None => spinner(),
        });

        let arrow = ArrowView {
            open,
            aria_label: if open { "Close dropdown" } else { "Open dropdown" },
            disabled: config.disabled,
        };

        let dropdown = open.then(|| self.dropdown(engine));

        ComboboxView {
            class,
            label: config.label.clone(),
            chips: chip_views,
            more_chips,
            input,
            spinner,
            clear_button: engine.show_clear_button(),
            arrow,
            dropdown,
        }
    }

    fn dropdown<K>(&self, engine: &SelectionEngine<O, K>) -> DropdownView<K>
    where
        O: Clone,
        K: Identity,
    {
        let config = engine.config();
        let names = &self.class_names;
        let visible = engine.visible_options();
        let listbox = engine.listbox();

        let empty_text = engine
            .empty_state()
            .map(|state| state.message().to_string());

        let mut rows = Vec::with_capacity(listbox.len());
        if empty_text.is_none() {
            for (index, row) in listbox.rows.iter().enumerate() {
                let height = listbox.row_height_at(index);
                rows.push(match row {
                    ListRow::SelectAll(state) => {
                        let mut cb = checkbox(*state == SelectAllState::All)
                            .indeterminate(*state == SelectAllState::Some);
                        if let Some(ref class) = names.checkbox {
                            cb = cb.class_name(class.clone());
                        }
                        RowView::SelectAll {
                            checkbox: cb,
                            label: config.select_all_label.clone(),
                            class: join("ps-select-all", &[names.select_all.as_deref()]),
                        }
                    }
                    ListRow::Divider => RowView::Divider { height },
                    ListRow::Status(status) => RowView::Status {
                        text: status.message(),
                        class: match status {
                            ListStatus::NoResults { .. } => {
                                join("ps-no-results", &[names.no_results.as_deref()])
                            }
                            ListStatus::LoadingMore { .. } => {
                                "ps-loading-text".to_string()
                            }
                            ListStatus::ItemsLoaded { .. } => {
                                "ps-items-count".to_string()
                            }
                        },
                    },
                    ListRow::Option(i) => {
                        let key = visible.keys[*i].clone();
                        let option = &visible.options[*i];
                        let selected = engine.is_selected(&key);
                        let content = match self.render_row {
                            Some(ref render) => render(option, selected),
                            None => engine.accessors().label_of(option),
                        };
                        let checkbox = config.multiple.then(|| {
                            let cb = checkbox(selected);
                            match names.checkbox {
                                Some(ref class) => cb.class_name(class.clone()),
                                None => cb,
                            }
                        });
                        let selected_class = if selected {
                            Some(join("ps-option-selected", &[names.selected_option.as_deref()]))
                        } else {
                            None
                        };
                        RowView::Option(OptionRowView {
                            key,
                            content,
                            selected,
                            role: "option",
                            checkbox,
                            class: join(
                                "ps-option",
                                &[names.option.as_deref(), selected_class.as_deref()],
                            ),
                            height,
                        })
                    }
                });
            }
        }

        tracing::trace!(
            "{}: {} rows, {} options",
            self.listbox_id(),
            rows.len(),
            visible.len()
        );
        DropdownView {
            id: self.listbox_id(),
            role: "listbox",
            multiselectable: config.multiple,
            class: join("ps-dropdown", &[names.dropdown.as_deref()]),
            height: listbox.rendered_height(),
            row_heights: listbox.row_heights(),
            rows,
            empty_text,
        }
    }
}

/// Create a combobox view builder
pub fn combobox<O>(id: impl Into<String>) -> Combobox<O> {
    Combobox::new(id)
}
