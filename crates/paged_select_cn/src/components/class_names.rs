//! Per-part class names

use serde::{Deserialize, Serialize};

/// Extra class names appended to the built-in ones, per part of the widget
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    pub container: Option<String>,
    pub input: Option<String>,
    pub dropdown: Option<String>,
    pub option: Option<String>,
    pub selected_option: Option<String>,
    pub chip: Option<String>,
    pub checkbox: Option<String>,
    pub loader: Option<String>,
    pub no_results: Option<String>,
    pub select_all: Option<String>,
}

impl ClassNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container(mut self, class: impl Into<String>) -> Self {
        self.container = Some(class.into());
        self
    }

    pub fn input(mut self, class: impl Into<String>) -> Self {
        self.input = Some(class.into());
        self
    }

    pub fn dropdown(mut self, class: impl Into<String>) -> Self {
        self.dropdown = Some(class.into());
        self
    }

    pub fn option(mut self, class: impl Into<String>) -> Self {
        self.option = Some(class.into());
        self
    }

    pub fn selected_option(mut self, class: impl Into<String>) -> Self {
        self.selected_option = Some(class.into());
        self
    }

    pub fn chip(mut self, class: impl Into<String>) -> Self {
        self.chip = Some(class.into());
        self
    }

    pub fn checkbox(mut self, class: impl Into<String>) -> Self {
        self.checkbox = Some(class.into());
        self
    }

    pub fn loader(mut self, class: impl Into<String>) -> Self {
        self.loader = Some(class.into());
        self
    }

    pub fn no_results(mut self, class: impl Into<String>) -> Self {
        self.no_results = Some(class.into());
        self
    }

    pub fn select_all(mut self, class: impl Into<String>) -> Self {
        self.select_all = Some(class.into());
        self
    }
}

/// `base` followed by each present extra class
pub fn join(base: &str, extras: &[Option<&str>]) -> String {
    let mut out = base.to_string();
    for extra in extras.iter().flatten() {
        if extra.is_empty() {
            continue;
        }
        out.push(' ');
        out.push_str(extra);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(join("ps-option", &[]), "ps-option");
        assert_eq!(
            join("ps-option", &[Some("row"), None, Some(""), Some("selected")]),
            "ps-option row selected"
        );
    }
}
