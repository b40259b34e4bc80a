//! Pawfetch - client for the dog shelter search service
//!
//! This library holds the HTTP client for the shelter service, the client
//! state behind a search session (query, result paging, favorites, best match)
//! and a small line-driven front end that renders that state as text.

pub mod config;
pub mod core;
pub mod models;
pub mod services;
pub mod shell;

// Re-export commonly used types
pub use self::core::{FavoritesSet, SearchController, SearchQuery, SearchView, PAGE_SIZE};
pub use models::{DogRecord, ResultPage};
pub use services::{ApiError, DogService, DogsClient};
