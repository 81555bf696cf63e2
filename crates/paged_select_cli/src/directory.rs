//! In-memory user directory backing the demo
//!
//! Serves pages of a fixed user list with totals, and answers searches by
//! matching any term against name, email or role.

use std::sync::Arc;
use std::time::Duration;

use paged_select_core::{
    page_loader, search_provider, LoadPageParams, LoadResponse, PageLoader, PageResponse,
    SearchProvider,
};
use serde::{Deserialize, Serialize};

/// Users in the default directory
pub const TOTAL_USERS: u32 = 1000;
/// Results returned for a single search
pub const MAX_SEARCH_RESULTS: usize = 100;

const ROLES: [&str; 3] = ["Admin", "Editor", "Viewer"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl User {
    fn numbered(n: u32) -> Self {
        Self {
            id: n,
            name: format!("User {}", n),
            email: format!("user{}@example.com", n),
            role: ROLES[(n as usize) % ROLES.len()].to_string(),
        }
    }

    /// Label shown in the input and chips
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.email)
    }

    fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.name, &self.email, &self.role]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Simulated network latency
#[derive(Clone, Copy, Debug)]
pub struct Latency {
    pub page: Duration,
    pub search: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            page: Duration::from_millis(500),
            search: Duration::from_millis(300),
        }
    }
}

#[derive(Debug)]
pub struct Directory {
    users: Vec<User>,
    latency: Latency,
}

impl Directory {
    pub fn new(total: u32) -> Arc<Self> {
        Self::with_latency(total, Latency::default())
    }

    pub fn with_latency(total: u32, latency: Latency) -> Arc<Self> {
        Arc::new(Self {
            users: (1..=total).map(User::numbered).collect(),
            latency,
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Page `params.page` of the directory, with totals
    pub fn page(&self, params: &LoadPageParams) -> LoadResponse<User> {
        let size = params.page_size.max(1) as usize;
        let start = (params.page.max(1) as usize - 1) * size;
        let data: Vec<User> = self.users.iter().skip(start).take(size).cloned().collect();
        let total = self.users.len();

        PageResponse::new(data)
            .page(params.page, params.page_size)
            .totals(
                Some(total.div_ceil(size) as u32),
                Some(total as u64),
            )
            .into()
    }

    /// Users matching any of `terms`, capped at [`MAX_SEARCH_RESULTS`]
    pub fn search(&self, terms: &[String]) -> LoadResponse<User> {
        let data: Vec<User> = self
            .users
            .iter()
            .filter(|user| terms.iter().any(|term| user.matches(term)))
            .take(MAX_SEARCH_RESULTS)
            .cloned()
            .collect();
        let total = data.len();

        PageResponse::new(data)
            .page(1, total.max(1) as u32)
            .totals(Some(1), Some(total as u64))
            .search(terms.to_vec())
            .into()
    }

    pub fn loader(self: &Arc<Self>) -> Arc<dyn PageLoader<User>> {
        let directory = Arc::clone(self);
        page_loader(move |params: LoadPageParams| {
            let directory = Arc::clone(&directory);
            async move {
                tokio::time::sleep(directory.latency.page).await;
                tracing::debug!("Serving page {} ({} per page)", params.page, params.page_size);
                Ok(directory.page(&params))
            }
        })
    }

    pub fn search_provider(self: &Arc<Self>) -> Arc<dyn SearchProvider<User>> {
        let directory = Arc::clone(self);
        search_provider(move |terms: Vec<String>| {
            let directory = Arc::clone(&directory);
            async move {
                tokio::time::sleep(directory.latency.search).await;
                tracing::debug!("Searching for {:?}", terms);
                Ok(directory.search(&terms))
            }
        })
    }
}
