use serde::{Deserialize, Serialize};

use crate::core::pagination::{clamp_page, page_count};

/// The tuple that uniquely determines a result page
///
/// An empty `breed` means no search is active; an empty `zip_code` means no
/// ZIP filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchQuery {
    pub breed: String,
    pub zip_code: String,
    pub page: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            breed: String::new(),
            zip_code: String::new(),
            page: 1,
        }
    }
}

impl SearchQuery {
    pub fn new(breed: impl Into<String>, zip_code: impl Into<String>, page: u32) -> Self {
        Self {
            breed: breed.into(),
            zip_code: zip_code.into(),
            page: page.max(1),
        }
    }

    /// Searching requires a breed term
    pub fn is_active(&self) -> bool {
        !self.breed.is_empty()
    }

    /// Same breed and ZIP, ignoring the page
    pub fn same_filter(&self, other: &SearchQuery) -> bool {
        self.breed == other.breed && self.zip_code == other.zip_code
    }
}

/// Holder of the current query
///
/// Every setter returns the new signature when it changed and `None` when the
/// call was a no-op, which is what drives re-fetching.
#[derive(Debug, Clone, Default)]
pub struct SearchQueryState {
    current: SearchQuery,
}

impl SearchQueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &SearchQuery {
        &self.current
    }

    /// A new breed always starts over at page 1
    pub fn set_breed(&mut self, breed: impl Into<String>) -> Option<SearchQuery> {
        let breed = breed.into();
        if breed == self.current.breed {
            return None;
        }
        self.current.breed = breed;
        self.current.page = 1;
        Some(self.current.clone())
    }

    pub fn set_zip(&mut self, zip_code: impl Into<String>) -> Option<SearchQuery> {
        let zip_code = zip_code.into();
        if zip_code == self.current.zip_code {
            return None;
        }
        self.current.zip_code = zip_code;
        Some(self.current.clone())
    }

    /// Move to `page`, clamped to the pages `total` results span
    pub fn set_page(&mut self, page: u32, total: u64) -> Option<SearchQuery> {
        let page = clamp_page(page, total);
        if page == self.current.page {
            return None;
        }
        self.current.page = page;
        Some(self.current.clone())
    }

    /// Pull the page back inside a freshly learned total
    ///
    /// Only a non-zero total can shrink the page; zero hits keep the page as-is.
    pub fn clamp_to_total(&mut self, total: u64) -> Option<SearchQuery> {
        let last = page_count(total);
        if last == 0 || self.current.page <= last {
            return None;
        }
        self.current.page = last;
        Some(self.current.clone())
    }
}
