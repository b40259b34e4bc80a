use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::pagination::{offset_for_page, PAGE_SIZE};
use crate::core::query::SearchQuery;

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1), email)]
    pub email: String,
}

impl LoginRequest {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Parameters of `GET /dogs/search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub breed: String,
    pub zip_code: Option<String>,
    pub size: u32,
    pub from: u64,
}

impl SearchParams {
    /// Build the request for the page a query points at
    pub fn for_query(query: &SearchQuery) -> Self {
        let zip_code = if query.zip_code.is_empty() {
            None
        } else {
            Some(query.zip_code.clone())
        };

        Self {
            breed: query.breed.clone(),
            zip_code,
            size: PAGE_SIZE,
            from: offset_for_page(query.page),
        }
    }

    /// Encode as a URL query string, without the leading `?`
    pub fn to_query_string(&self) -> String {
        let mut query = format!(
            "breeds={}&size={}&from={}",
            urlencoding::encode(&self.breed),
            self.size,
            self.from
        );

        if let Some(zip) = &self.zip_code {
            query.push_str("&zipCodes=");
            query.push_str(&urlencoding::encode(zip));
        }

        query.push_str("&sort=breed:asc");
        query
    }
}
