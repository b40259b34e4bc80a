use serde::{Deserialize, Serialize};

use crate::core::pagination::{page_count, shows_pagination};

/// An adoptable dog as returned by the hydration endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DogRecord {
    pub id: String,
    pub img: String,
    pub name: String,
    pub age: u32,
    pub zip_code: String,
    pub breed: String,
}

/// One page of search results
///
/// `dogs` keeps the order the service returned (breed ascending) and is never
/// re-sorted locally. The whole page is replaced on every successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultPage {
    pub dogs: Vec<DogRecord>,
    pub total: u64,
    pub page: u32,
}

impl ResultPage {
    /// A page with no records
    pub fn empty(page: u32, total: u64) -> Self {
        Self {
            dogs: Vec::new(),
            total,
            page,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }

    /// Number of pages the total spans
    pub fn page_count(&self) -> u32 {
        page_count(self.total)
    }

    /// Whether a pagination control should be offered
    pub fn shows_pagination(&self) -> bool {
        shows_pagination(self.total)
    }
}
