//! Outward callback surface

use std::fmt;
use std::sync::Arc;

use crate::selection::{SelectedOptions, Selection};

/// Receives a proposed selection value
pub type SelectionCallback<K> = Arc<dyn Fn(&Selection<K>) + Send + Sync>;
/// Notification without payload (open / close)
pub type NotifyCallback = Arc<dyn Fn() + Send + Sync>;
/// Receives the option(s) a selection change was made with
pub type OptionCallback<O> = Arc<dyn Fn(&SelectedOptions<O>) + Send + Sync>;

/// Callbacks fired by the engine
pub struct SelectCallbacks<O, K> {
    on_change: Option<SelectionCallback<K>>,
    on_blur: Option<SelectionCallback<K>>,
    on_open: Option<NotifyCallback>,
    on_close: Option<NotifyCallback>,
    on_select_option: Option<OptionCallback<O>>,
}

impl<O, K> Default for SelectCallbacks<O, K> {
    fn default() -> Self {
        Self {
            on_change: None,
            on_blur: None,
            on_open: None,
            on_close: None,
            on_select_option: None,
        }
    }
}

impl<O, K> Clone for SelectCallbacks<O, K> {
    fn clone(&self) -> Self {
        Self {
            on_change: self.on_change.clone(),
            on_blur: self.on_blur.clone(),
            on_open: self.on_open.clone(),
            on_close: self.on_close.clone(),
            on_select_option: self.on_select_option.clone(),
        }
    }
}

impl<O, K> fmt::Debug for SelectCallbacks<O, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectCallbacks")
            .field("on_change", &self.on_change.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_select_option", &self.on_select_option.is_some())
            .finish()
    }
}

impl<O, K> SelectCallbacks<O, K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&Selection<K>) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
        self
    }

    pub fn on_blur<F>(mut self, f: F) -> Self
    where
        F: Fn(&Selection<K>) + Send + Sync + 'static,
    {
        self.on_blur = Some(Arc::new(f));
        self
    }

    pub fn on_open<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_open = Some(Arc::new(f));
        self
    }

    pub fn on_close<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_close = Some(Arc::new(f));
        self
    }

    pub fn on_select_option<F>(mut self, f: F) -> Self
    where
        F: Fn(&SelectedOptions<O>) + Send + Sync + 'static,
    {
        self.on_select_option = Some(Arc::new(f));
        self
    }

    /// A committed change is reported through both `on_change` and `on_blur`
    pub(crate) fn commit(&self, value: &Selection<K>) {
        if let Some(ref cb) = self.on_change {
            cb(value);
        }
        if let Some(ref cb) = self.on_blur {
            cb(value);
        }
    }

    pub(crate) fn selected(&self, options: &SelectedOptions<O>) {
        if let Some(ref cb) = self.on_select_option {
            cb(options);
        }
    }

    pub(crate) fn opened(&self) {
        if let Some(ref cb) = self.on_open {
            cb();
        }
    }

    pub(crate) fn closed(&self) {
        if let Some(ref cb) = self.on_close {
            cb();
        }
    }
}
