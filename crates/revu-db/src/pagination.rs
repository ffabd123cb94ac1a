//! Page requests and paged results.
//!
//! Listing endpoints either ask for one page (`page`, `per_page`) or for
//! everything (`page=all`). Plain table listings push the window into SQL
//! with [`PageRequest::sql_window`]; derived collections (vendor statistics)
//! are windowed in memory with [`Paged::from_vec`].

use serde::Serialize;

/// Which slice of a collection to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum PageRequest {
    All,
    Page { page: u32, per_page: u32 },
}

impl PageRequest {
    /// A 1-based page. Zero is clamped to the first page and an empty page
    /// size to one row.
    #[must_use]
    pub fn page(page: u32, per_page: u32) -> Self {
        Self::Page {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Offset of the first row in the window.
    #[must_use]
    pub fn offset(self) -> u64 {
        match self {
            Self::All => 0,
            Self::Page { page, per_page } => u64::from(page.saturating_sub(1)) * u64::from(per_page),
        }
    }

    /// `LIMIT .. OFFSET ..` clause, or an empty string for [`PageRequest::All`].
    #[must_use]
    pub fn sql_window(self) -> String {
        match self {
            Self::All => String::new(),
            Self::Page { per_page, .. } => format!(" LIMIT {per_page} OFFSET {}", self.offset()),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::page(1, 25)
    }
}

/// One window of a collection plus the size of the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Paged<T> {
    /// Window an already materialized collection.
    #[must_use]
    pub fn from_vec(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len() as u64;
        let items = match request {
            PageRequest::All => items,
            PageRequest::Page { per_page, .. } => {
                let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
                items.into_iter().skip(skip).take(per_page as usize).collect()
            }
        };
        Self { items, total, request }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}
