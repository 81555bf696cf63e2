//! Checkbox shown in option rows and the select-all row
//!
//! Supports an indeterminate state for partially selected lists.
//!
//! # Example
//!
//! ```ignore
//! use paged_select_cn::prelude::*;
//!
//! cn::checkbox(false)
//!     .indeterminate(true)
//!     .label("Select All")
//! ```

use serde::Serialize;

/// Glyph drawn for the checked state
pub const CHECK_ICON: char = '✓';
/// Glyph drawn for the indeterminate state
pub const INDETERMINATE_ICON: char = '−';

/// Checkbox size variants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum CheckboxSize {
    /// Small checkbox (14px)
    Small,
    /// Medium checkbox (18px)
    #[default]
    Medium,
    /// Large checkbox (22px)
    Large,
}

impl CheckboxSize {
    pub fn size(&self) -> f32 {
        match self {
            CheckboxSize::Small => 14.0,
            CheckboxSize::Medium => 18.0,
            CheckboxSize::Large => 22.0,
        }
    }

    fn icon_size(&self) -> f32 {
        match self {
            CheckboxSize::Small => 10.0,
            CheckboxSize::Medium => 12.0,
            CheckboxSize::Large => 16.0,
        }
    }
}

/// Value of `aria-checked`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaChecked {
    True,
    False,
    Mixed,
}

impl AriaChecked {
    pub fn as_str(&self) -> &'static str {
        match self {
            AriaChecked::True => "true",
            AriaChecked::False => "false",
            AriaChecked::Mixed => "mixed",
        }
    }
}

/// Checkbox view
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Checkbox {
    checked: bool,
    indeterminate: bool,
    disabled: bool,
    size: CheckboxSize,
    label: Option<String>,
    class_name: Option<String>,
}

impl Checkbox {
    pub fn new(checked: bool) -> Self {
        Self {
            checked,
            indeterminate: false,
            disabled: false,
            size: CheckboxSize::default(),
            label: None,
            class_name: None,
        }
    }

    pub fn indeterminate(mut self, indeterminate: bool) -> Self {
        self.indeterminate = indeterminate;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn size(mut self, size: CheckboxSize) -> Self {
        self.size = size;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_indeterminate(&self) -> bool {
        self.indeterminate
    }

    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn class(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn role(&self) -> &'static str {
        "checkbox"
    }

    /// Indeterminate wins over checked
    pub fn aria_checked(&self) -> AriaChecked {
        if self.indeterminate {
            AriaChecked::Mixed
        } else if self.checked {
            AriaChecked::True
        } else {
            AriaChecked::False
        }
    }

    pub fn icon(&self) -> Option<char> {
        match self.aria_checked() {
            AriaChecked::Mixed => Some(INDETERMINATE_ICON),
            AriaChecked::True => Some(CHECK_ICON),
            AriaChecked::False => None,
        }
    }

    /// Box edge length and glyph size in pixels
    pub fn dimensions(&self) -> (f32, f32) {
        (self.size.size(), self.size.icon_size())
    }

    /// Disabled checkboxes are removed from the tab order
    pub fn tab_index(&self) -> i32 {
        if self.disabled {
            -1
        } else {
            0
        }
    }

    /// Value after a click; `None` when disabled
    pub fn toggle(&self) -> Option<bool> {
        if self.disabled {
            return None;
        }
        // An indeterminate box always becomes checked
        Some(self.indeterminate || !self.checked)
    }
}

/// Create a checkbox
pub fn checkbox(checked: bool) -> Checkbox {
    Checkbox::new(checked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aria_checked_states() {
        assert_eq!(checkbox(false).aria_checked(), AriaChecked::False);
        assert_eq!(checkbox(true).aria_checked(), AriaChecked::True);
        assert_eq!(
            checkbox(true).indeterminate(true).aria_checked(),
            AriaChecked::Mixed
        );
        assert_eq!(AriaChecked::Mixed.as_str(), "mixed");
    }

    #[test]
    fn test_icons() {
        assert_eq!(checkbox(false).icon(), None);
        assert_eq!(checkbox(true).icon(), Some('✓'));
        assert_eq!(checkbox(false).indeterminate(true).icon(), Some('−'));
    }

    #[test]
    fn test_toggle_and_disabled() {
        assert_eq!(checkbox(false).toggle(), Some(true));
        assert_eq!(checkbox(true).toggle(), Some(false));
        assert_eq!(checkbox(false).indeterminate(true).toggle(), Some(true));

        let disabled = checkbox(true).disabled(true);
        assert_eq!(disabled.toggle(), None);
        assert_eq!(disabled.tab_index(), -1);
        assert_eq!(checkbox(true).tab_index(), 0);
    }

    #[test]
    fn test_sizes() {
        assert_eq!(checkbox(false).dimensions(), (18.0, 12.0));
        assert_eq!(
            checkbox(false).size(CheckboxSize::Small).dimensions(),
            (14.0, 10.0)
        );
    }
}
