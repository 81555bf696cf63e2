//! # Paged Select Core
//!
//! State machine behind a paginated, searchable select (single or multiple).
//!
//! ## Parts
//!
//! - **Option Cache** ([`OptionCache`]): insertion-ordered identity → option map
//!   that grows as pages arrive
//! - **Mode Controller** ([`ModeController`]): Browse / Search, with a debounced
//!   search and ticketed requests
//! - **Pagination Driver** ([`PaginationDriver`]): page bookkeeping and the
//!   scroll proximity rule
//! - **Selection Resolver** ([`resolve_visible`]): keeps selected options visible
//!   even when the current list does not contain them
//!
//! [`SelectionEngine`] combines them. It performs no I/O; its event methods
//! return [`EngineCommand`]s that a runtime executes.
//!
//! ## Example
//!
//! ```ignore
//! use paged_select_core::prelude::*;
//!
//! let mut engine = SelectionEngine::new(
//!     SelectConfig::new().multiple(true),
//!     Accessors::conventional(),
//! )?
//! .with_search(true);
//!
//! for command in engine.open() {
//!     // run the command, feed the result back with apply_page / apply_search
//! }
//! ```

pub mod cache;
pub mod callbacks;
pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod listbox;
pub mod mode;
pub mod pagination;
pub mod response;
pub mod selection;
pub mod source;

pub use cache::OptionCache;
pub use callbacks::SelectCallbacks;
pub use config::SelectConfig;
pub use engine::{Commands, EngineCommand, PageTicket, SelectionEngine, Update};
pub use error::{ConfigError, ConfigResult, LoadError, SelectError};
pub use identity::{Accessors, Identity, OptionKey};
pub use listbox::{EmptyState, ListRow, ListStatus, Listbox};
pub use mode::{DebounceTicket, Mode, ModeController, SearchTicket};
pub use pagination::{
    LoadPageParams, PaginationDriver, PaginationState, ScrollDirection, ScrollEvent,
    ScrollMetrics,
};
pub use response::{parse_search_terms, LoadResponse, NormalizedResponse, PageResponse};
pub use selection::{
    resolve_visible, select_all_state, toggle_select_all, SelectAllState, SelectedOptions,
    Selection, VisibleOptions,
};
pub use source::{page_loader, search_provider, PageLoader, SearchProvider, SourceFuture, SourceResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::callbacks::SelectCallbacks;
    pub use crate::config::SelectConfig;
    pub use crate::engine::{EngineCommand, SelectionEngine};
    pub use crate::error::{LoadError, SelectError};
    pub use crate::identity::{Accessors, Identity, OptionKey};
    pub use crate::response::{LoadResponse, PageResponse};
    pub use crate::selection::{SelectAllState, SelectedOptions, Selection};
    pub use crate::source::{page_loader, search_provider, PageLoader, SearchProvider};
}
