//! View models for the paged select parts
//!
//! Each component follows a consistent pattern:
//! - Builder function (e.g., `checkbox(true)`)
//! - Size enum where the part has sizes (e.g., `CheckboxSize`)
//! - Plain, serializable data a rendering backend can draw

pub mod checkbox;
pub mod chip;
pub mod class_names;
pub mod combobox;
pub mod spinner;
pub mod virtual_list;

pub use checkbox::{checkbox, AriaChecked, Checkbox, CheckboxSize};
pub use chip::{chips, Chip, ChipList, ChipVariant};
pub use class_names::ClassNames;
pub use combobox::{
    combobox, ArrowView, Combobox, ComboboxSize, ComboboxView, DropdownView, InputView,
    OptionRowView, RenderRowFn, RowView,
};
pub use spinner::{spinner, Spinner, SpinnerSize};
pub use virtual_list::{ListWindow, VirtualWindow};
