//! Collaborator response shapes and normalization
//!
//! Loaders and search providers may answer with either a bare list of options
//! (one unpaginated page) or a structured page:
//!
//! ```json
//! { "data": [...], "currentPage": 2, "pageSize": 50,
//!   "totalPages": 20, "totalRecords": 1000,
//!   "isSearch": false, "searchTerms": [] }
//! ```
//!
//! `onPage` is accepted as an alias of `currentPage`. Anything else, including
//! `null`, decodes to [`LoadResponse::Absent`] and is ignored by the engine.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured page response
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<O> {
    pub data: Vec<O>,
    #[serde(default, alias = "onPage", skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_records: Option<u64>,
    #[serde(default)]
    pub is_search: bool,
    #[serde(default)]
    pub search_terms: Vec<String>,
}

impl<O> PageResponse<O> {
    /// A page carrying only data
    pub fn new(data: Vec<O>) -> Self {
        Self {
            data,
            current_page: None,
            page_size: None,
            total_pages: None,
            total_records: None,
            is_search: false,
            search_terms: Vec::new(),
        }
    }

    pub fn page(mut self, current_page: u32, page_size: u32) -> Self {
        self.current_page = Some(current_page);
        self.page_size = Some(page_size);
        self
    }

    pub fn totals(mut self, total_pages: Option<u32>, total_records: Option<u64>) -> Self {
        self.total_pages = total_pages;
        self.total_records = total_records;
        self
    }

    /// Mark as a search result for the given terms
    pub fn search(mut self, terms: Vec<String>) -> Self {
        self.is_search = true;
        self.search_terms = terms;
        self
    }
}

/// Any response a loader or search provider may produce
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoadResponse<O> {
    /// Bare list of options
    Options(Vec<O>),
    /// Structured page
    Page(PageResponse<O>),
    /// No usable data
    Absent,
}

impl<O> LoadResponse<O> {
    /// Normalize into a flat response; `None` for [`LoadResponse::Absent`]
    pub fn normalize(self) -> Option<NormalizedResponse<O>> {
        match self {
            LoadResponse::Options(data) => Some(NormalizedResponse {
                data,
                current_page: None,
                page_size: None,
                total_pages: None,
                total_records: None,
                is_search: false,
                structured: false,
            }),
            LoadResponse::Page(page) => {
                let is_search = page.is_search || !page.search_terms.is_empty();
                Some(NormalizedResponse {
                    data: page.data,
                    current_page: page.current_page.filter(|p| *p > 0),
                    page_size: page.page_size.filter(|s| *s > 0),
                    total_pages: page.total_pages,
                    total_records: page.total_records,
                    is_search,
                    structured: true,
                })
            }
            LoadResponse::Absent => None,
        }
    }

    /// Whether this response is classified as a search result
    pub fn is_search(&self) -> bool {
        match self {
            LoadResponse::Page(page) => page.is_search || !page.search_terms.is_empty(),
            _ => false,
        }
    }
}

impl<O: DeserializeOwned> LoadResponse<O> {
    /// Decode a raw JSON response; malformed input becomes `Absent`
    pub fn from_json(value: Value) -> Self {
        match serde_json::from_value(value) {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!("Ignoring malformed option response: {}", err);
                LoadResponse::Absent
            }
        }
    }
}

impl<O> From<Vec<O>> for LoadResponse<O> {
    fn from(data: Vec<O>) -> Self {
        LoadResponse::Options(data)
    }
}

impl<O> From<PageResponse<O>> for LoadResponse<O> {
    fn from(page: PageResponse<O>) -> Self {
        LoadResponse::Page(page)
    }
}

/// A response reduced to data plus whatever pagination it carried
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedResponse<O> {
    pub data: Vec<O>,
    pub current_page: Option<u32>,
    pub page_size: Option<u32>,
    pub total_pages: Option<u32>,
    pub total_records: Option<u64>,
    pub is_search: bool,
    /// False for bare option lists
    pub structured: bool,
}

/// Split raw input text into search terms
///
/// Segments are separated by `;`, trimmed, and empty segments dropped:
/// `"ann; bob ; ; carol"` → `["ann", "bob", "carol"]`.
pub fn parse_search_terms(input: &str) -> Vec<String> {
    input
        .split(';')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}
