// Unit tests for Pawfetch client state

use pawfetch::core::{
    clamp_page, page_count, shows_pagination, FavoritesSet, SearchQuery, SearchQueryState,
    SessionError, SessionGateway,
};
use pawfetch::models::{DogRecord, LoginRequest, MatchResponse, SearchParams, SearchResponse};
use pawfetch::services::{ApiError, DogService};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_breed_change_always_resets_page() {
    for start_page in 1..=6 {
        let mut state = SearchQueryState::new();
        state.set_breed("Poodle");
        state.set_page(start_page, 200);

        let changed = state.set_breed("Beagle").unwrap();
        assert_eq!(changed.page, 1, "page not reset from {}", start_page);
    }
}

#[test]
fn test_zip_and_page_changes_preserve_page() {
    let mut state = SearchQueryState::new();
    state.set_breed("Poodle");
    state.set_page(5, 200);

    assert_eq!(state.set_zip("10001").unwrap().page, 5);
    assert_eq!(state.set_zip("").unwrap().page, 5);
    assert_eq!(state.current(), &SearchQuery::new("Poodle", "", 5));
}

#[test]
fn test_page_count_matches_ceiling() {
    for total in 0..=260u64 {
        let expected = ((total as f64) / 25.0).ceil() as u32;
        assert_eq!(page_count(total), expected, "total {}", total);
        assert_eq!(shows_pagination(total), total > 25, "total {}", total);
    }
}

#[test]
fn test_clamped_page_is_always_in_range() {
    for total in [0u64, 1, 25, 26, 99, 1000] {
        for page in [0u32, 1, 2, 7, 400] {
            let clamped = clamp_page(page, total);
            assert!(clamped >= 1);
            assert!(clamped <= page_count(total).max(1));
        }
    }
}

#[test]
fn test_toggle_is_an_involution() {
    let mut favorites = FavoritesSet::new();
    for id in ["x", "y", "z"] {
        favorites.toggle(id);
    }

    for id in ["a", "x", "q", "z"] {
        let before = favorites.clone();
        favorites.toggle(id);
        favorites.toggle(id);
        assert_eq!(favorites, before, "toggle({}) twice changed the set", id);
    }
}

#[test]
fn test_search_params_follow_query() {
    let params = SearchParams::for_query(&SearchQuery::new("Poodle", "", 4));
    assert_eq!(params.size, 25);
    assert_eq!(params.from, 75);
    assert!(params.zip_code.is_none());
}

/// Counts login calls and accepts all of them
#[derive(Default)]
struct CountingService {
    logins: AtomicUsize,
}

#[async_trait]
impl DogService for CountingService {
    async fn login(&self, _request: &LoginRequest) -> Result<(), ApiError> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn breeds(&self) -> Result<Vec<String>, ApiError> {
        Ok(vec![])
    }

    async fn search(&self, _params: &SearchParams) -> Result<SearchResponse, ApiError> {
        Ok(SearchResponse {
            result_ids: vec![],
            total: 0,
        })
    }

    async fn hydrate(&self, _ids: &[String]) -> Result<Vec<DogRecord>, ApiError> {
        Ok(vec![])
    }

    async fn match_favorites(&self, _ids: &[String]) -> Result<MatchResponse, ApiError> {
        Ok(MatchResponse {
            matched_id: String::new(),
        })
    }
}

#[test]
fn test_login_validation_happens_before_network() {
    let service = CountingService::default();
    let mut session = SessionGateway::new();

    let missing = tokio_test::block_on(session.login(&service, "", "ada@example.com"));
    assert!(matches!(missing, Err(SessionError::MissingFields)));
    assert_eq!(session.error(), Some("Please enter both name and email."));

    let invalid = tokio_test::block_on(session.login(&service, "Ada", "ada-at-example"));
    assert!(matches!(invalid, Err(SessionError::InvalidEmail)));

    assert_eq!(service.logins.load(Ordering::SeqCst), 0);
    assert!(!session.is_authenticated());
}

#[test]
fn test_login_then_logout() {
    let service = CountingService::default();
    let mut session = SessionGateway::new();

    tokio_test::block_on(session.login(&service, "Ada", "ada@example.com")).unwrap();
    assert!(session.is_authenticated());
    assert_eq!(session.user(), Some("Ada"));
    assert!(session.logged_in_at().is_some());
    assert!(session.error().is_none());

    tokio_test::block_on(session.logout(&service)).unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(service.logins.load(Ordering::SeqCst), 1);
}
