//! Error types for paged_select_core

use thiserror::Error;

/// Failure reported by a page loader or search provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The request reached the backend and failed
    #[error("request failed: {0}")]
    Request(String),

    /// The backend did not answer in time
    #[error("request timed out")]
    Timeout,

    /// The collaborator task went away before producing a result
    #[error("request was cancelled")]
    Cancelled,

    /// Generic collaborator error
    #[error("{0}")]
    Other(String),
}

/// Invalid widget configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Page size must be at least one
    #[error("default_page_size must be greater than zero")]
    ZeroPageSize,

    /// The viewport needs at least one row
    #[error("max_visible_items must be greater than zero")]
    ZeroVisibleItems,

    /// Row height must be a positive, finite number of pixels
    #[error("row_height must be positive and finite, got {0}")]
    InvalidRowHeight(f32),

    /// TOML could not be parsed into a configuration
    #[error("invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime failures recorded by the selection engine
///
/// Construction fails earlier, with a [`ConfigError`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectError {
    /// A page request failed; automatic loading stays off until reset
    #[error("page {page} failed to load: {source}")]
    PageLoad {
        page: u32,
        #[source]
        source: LoadError,
    },

    /// A search request failed; the search buffer was cleared
    #[error("search for {terms:?} failed: {source}")]
    Search {
        terms: Vec<String>,
        #[source]
        source: LoadError,
    },
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
