//! # Paged Select Components (paged_select_cn)
//!
//! View models for a paginated, searchable select built on
//! `paged_select_core`.
//!
//! The engine owns behaviour; this crate describes what to draw. A backend
//! calls [`Combobox::view`] after every engine event and renders the
//! resulting [`ComboboxView`].
//!
//! ## Example
//!
//! ```ignore
//! use paged_select_cn::prelude::*;
//!
//! let view = cn::combobox("users")
//!     .size(ComboboxSize::Medium)
//!     .view(&engine);
//!
//! let mut window = ListWindow::for_listbox(&engine.listbox());
//! let event = window.scroll_to(400.0);
//! engine.list_scrolled(event);
//! ```
//!
//! ## Components
//!
//! - **Combobox** - input, chips, action buttons and dropdown rows
//! - **Checkbox** - checked / indeterminate states for option and select-all rows
//! - **Chip** - selected options with a "+N more" overflow
//! - **Spinner** - loading indicator
//! - **ListWindow** - virtual list geometry reporting scroll events

pub mod components;

pub use components::*;

/// Convenience module for accessing components with `cn::` prefix
pub mod cn {
    pub use crate::components::checkbox::checkbox;
    pub use crate::components::chip::chips;
    pub use crate::components::combobox::combobox;
    pub use crate::components::spinner::spinner;
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cn;
    pub use crate::components::checkbox::{checkbox, Checkbox, CheckboxSize};
    pub use crate::components::chip::{chips, Chip, ChipList};
    pub use crate::components::class_names::ClassNames;
    pub use crate::components::combobox::{combobox, Combobox, ComboboxSize, ComboboxView, RowView};
    pub use crate::components::spinner::{spinner, Spinner, SpinnerSize};
    pub use crate::components::virtual_list::{ListWindow, VirtualWindow};
}
