//! # Paged Select Runtime
//!
//! Runs a `paged_select_core` engine on tokio: collaborator requests become
//! tasks, the search debounce becomes an abortable timer, and host listeners
//! are held by RAII guards while the dropdown is open.
//!
//! ## Example
//!
//! ```ignore
//! use paged_select_core::prelude::*;
//! use paged_select_runtime::SelectController;
//!
//! let engine = SelectionEngine::new(SelectConfig::new(), Accessors::conventional())?;
//! let mut controller = SelectController::new(engine, loader).with_search(search);
//!
//! controller.mount();
//! controller.input_changed("ann");
//! controller.settle().await;
//! ```

pub mod controller;
pub mod listeners;

pub use controller::SelectController;
pub use listeners::{DetachedHost, ListenerGuard, ListenerId, ListenerKind, ListenerScope, WidgetHost};
