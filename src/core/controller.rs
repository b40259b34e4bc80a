use std::sync::Arc;
use tokio::sync::watch;

use crate::core::breeds::BreedLookup;
use crate::core::favorites::FavoritesSet;
use crate::core::matcher::{MatchError, MatchRequester};
use crate::core::paging::{fetch_page, Completion, FetchError, FetchTicket, ResultPager};
use crate::core::query::{SearchQuery, SearchQueryState};
use crate::models::{DogRecord, ResultPage};
use crate::services::DogService;

/// Snapshot of everything the search surface renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub query: SearchQuery,
    pub results: ResultPage,
    pub loading: bool,
    pub error: Option<String>,
    pub favorites: Vec<String>,
    pub breeds_loading: bool,
    pub breed_count: usize,
    pub matched: Option<DogRecord>,
    pub alert: Option<String>,
}

impl SearchView {
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f == id)
    }
}

/// Owner of all search-surface state
///
/// State changes only through the methods below. Each change publishes a new
/// `SearchView` on a watch channel for the rendering layer.
///
/// Query setters come in two forms: `apply_*` performs the pure transition and
/// hands back a `FetchTicket` when a fetch is needed, while the async `set_*`
/// variants also run that fetch to completion.
pub struct SearchController {
    service: Arc<dyn DogService>,
    query: SearchQueryState,
    pager: ResultPager,
    favorites: FavoritesSet,
    breeds: BreedLookup,
    matcher: MatchRequester,
    view_tx: watch::Sender<SearchView>,
}

impl SearchController {
    pub fn new(service: Arc<dyn DogService>) -> Self {
        let query = SearchQueryState::new();
        let pager = ResultPager::new();
        let favorites = FavoritesSet::new();
        let breeds = BreedLookup::new();
        let matcher = MatchRequester::new();

        let initial = build_view(&query, &pager, &favorites, &breeds, &matcher);
        let (view_tx, _) = watch::channel(initial);

        Self {
            service,
            query,
            pager,
            favorites,
            breeds,
            matcher,
            view_tx,
        }
    }

    pub fn service(&self) -> Arc<dyn DogService> {
        Arc::clone(&self.service)
    }

    /// Receive a fresh `SearchView` after every transition
    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view_tx.subscribe()
    }

    pub fn view(&self) -> SearchView {
        build_view(
            &self.query,
            &self.pager,
            &self.favorites,
            &self.breeds,
            &self.matcher,
        )
    }

    pub fn query(&self) -> &SearchQuery {
        self.query.current()
    }

    pub fn results(&self) -> &ResultPage {
        self.pager.page()
    }

    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    pub fn breeds(&self) -> &BreedLookup {
        &self.breeds
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.view());
    }

    /// Load breed suggestions; runs once per controller
    pub async fn mount(&mut self) {
        if !self.breeds.start() {
            return;
        }
        self.publish();

        let options = match self.service.breeds().await {
            Ok(breeds) => breeds,
            Err(e) => {
                tracing::error!("Error fetching breeds: {}", e);
                Vec::new()
            }
        };
        self.breeds.finish(options);
        self.publish();
    }

    fn on_query_change(&mut self, changed: Option<SearchQuery>) -> Option<FetchTicket> {
        let query = changed?;
        let ticket = if query.is_active() {
            Some(self.pager.begin(&query))
        } else {
            self.pager.clear(&query);
            None
        };
        self.publish();
        ticket
    }

    pub fn apply_breed(&mut self, breed: &str) -> Option<FetchTicket> {
        let changed = self.query.set_breed(breed);
        self.on_query_change(changed)
    }

    pub fn apply_zip(&mut self, zip_code: &str) -> Option<FetchTicket> {
        let changed = self.query.set_zip(zip_code);
        self.on_query_change(changed)
    }

    pub fn apply_page(&mut self, page: u32) -> Option<FetchTicket> {
        let total = self.pager.known_total();
        let changed = self.query.set_page(page, total);
        self.on_query_change(changed)
    }

    /// Apply a finished fetch
    ///
    /// Returns a follow-up ticket when the result showed the current page lies
    /// past the last page.
    pub fn finish(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<ResultPage, FetchError>,
    ) -> Option<FetchTicket> {
        if self.pager.complete(ticket.seq(), outcome) == Completion::Stale {
            return None;
        }

        let total = self.pager.page().total;
        let follow_up = if self.pager.error().is_none() {
            let clamped = self.query.clamp_to_total(total);
            self.on_query_change(clamped)
        } else {
            None
        };

        if follow_up.is_none() {
            self.publish();
        }
        follow_up
    }

    /// Run a ticket and any follow-ups it produces
    pub async fn run(&mut self, ticket: FetchTicket) {
        let mut next = Some(ticket);
        while let Some(ticket) = next {
            let outcome = fetch_page(self.service.as_ref(), &ticket).await;
            next = self.finish(&ticket, outcome);
        }
    }

    pub async fn set_breed(&mut self, breed: &str) {
        if let Some(ticket) = self.apply_breed(breed) {
            self.run(ticket).await;
        }
    }

    pub async fn set_zip(&mut self, zip_code: &str) {
        if let Some(ticket) = self.apply_zip(zip_code) {
            self.run(ticket).await;
        }
    }

    pub async fn set_page(&mut self, page: u32) {
        if let Some(ticket) = self.apply_page(page) {
            self.run(ticket).await;
        }
    }

    /// Returns whether `id` is a favorite afterwards
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let now_favorite = self.favorites.toggle(id);
        self.publish();
        now_favorite
    }

    pub async fn find_match(&mut self) -> Result<(), MatchError> {
        let result = self
            .matcher
            .find_match(self.service.as_ref(), &self.favorites)
            .await;
        self.publish();
        result
    }

    pub fn dismiss_match(&mut self) {
        self.matcher.dismiss();
        self.publish();
    }

    pub fn dismiss_alert(&mut self) {
        self.matcher.dismiss_alert();
        self.publish();
    }
}

fn build_view(
    query: &SearchQueryState,
    pager: &ResultPager,
    favorites: &FavoritesSet,
    breeds: &BreedLookup,
    matcher: &MatchRequester,
) -> SearchView {
    SearchView {
        query: query.current().clone(),
        results: pager.page().clone(),
        loading: pager.is_loading(),
        error: pager.error().map(str::to_string),
        favorites: favorites.all(),
        breeds_loading: breeds.is_loading(),
        breed_count: breeds.options().len(),
        matched: matcher.matched().cloned(),
        alert: matcher.alert().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LoginRequest, MatchResponse, SearchParams, SearchResponse};
    use crate::services::ApiError;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    fn dog(id: &str, breed: &str) -> DogRecord {
        DogRecord {
            id: id.to_string(),
            img: format!("https://img.test/{}.jpg", id),
            name: format!("Dog {}", id),
            age: 3,
            zip_code: "02139".to_string(),
            breed: breed.to_string(),
        }
    }

    /// Answers every search with the same IDs and records each call
    #[derive(Default)]
    struct FakeService {
        ids: Vec<String>,
        total: u64,
        fail_search: bool,
        searches: Mutex<Vec<SearchParams>>,
        hydrations: Mutex<Vec<Vec<String>>>,
        matches: Mutex<usize>,
    }

    #[async_trait]
    impl DogService for FakeService {
        async fn login(&self, _request: &LoginRequest) -> Result<(), ApiError> {
            Ok(())
        }

        async fn logout(&self) -> Result<(), ApiError> {
            Ok(())
        }

        async fn breeds(&self) -> Result<Vec<String>, ApiError> {
            Ok(vec!["Beagle".to_string(), "Poodle".to_string()])
        }

        async fn search(&self, params: &SearchParams) -> Result<SearchResponse, ApiError> {
            self.searches.lock().unwrap().push(params.clone());
            if self.fail_search {
                return Err(ApiError::ApiError(StatusCode::INTERNAL_SERVER_ERROR));
            }
            if params.from >= self.total {
                return Ok(SearchResponse {
                    result_ids: vec![],
                    total: self.total,
                });
            }
            Ok(SearchResponse {
                result_ids: self.ids.clone(),
                total: self.total,
            })
        }

        async fn hydrate(&self, ids: &[String]) -> Result<Vec<DogRecord>, ApiError> {
            self.hydrations.lock().unwrap().push(ids.to_vec());
            Ok(ids.iter().map(|id| dog(id, "Poodle")).collect())
        }

        async fn match_favorites(&self, ids: &[String]) -> Result<MatchResponse, ApiError> {
            *self.matches.lock().unwrap() += 1;
            Ok(MatchResponse {
                matched_id: ids[0].clone(),
            })
        }
    }

    fn controller(fake: FakeService) -> (SearchController, Arc<FakeService>) {
        let fake = Arc::new(fake);
        (SearchController::new(fake.clone()), fake)
    }

    #[tokio::test]
    async fn test_empty_breed_never_calls_service() {
        let (mut ctrl, fake) = controller(FakeService::default());

        ctrl.set_breed("Poodle").await;
        ctrl.set_breed("").await;

        assert_eq!(fake.searches.lock().unwrap().len(), 1);
        assert!(ctrl.results().is_empty());
        assert_eq!(ctrl.results().total, 0);
        assert!(!ctrl.view().loading);
    }

    #[tokio::test]
    async fn test_zero_hits_skip_hydration() {
        let (mut ctrl, fake) = controller(FakeService::default());

        ctrl.set_breed("Poodle").await;

        assert!(fake.hydrations.lock().unwrap().is_empty());
        assert!(ctrl.results().is_empty());
    }

    #[tokio::test]
    async fn test_late_response_does_not_overwrite_newer_query() {
        let (mut ctrl, _fake) = controller(FakeService {
            ids: vec!["b1".into()],
            total: 1,
            ..Default::default()
        });

        let poodle = ctrl.apply_breed("Poodle").unwrap();
        let beagle = ctrl.apply_breed("Beagle").unwrap();
        assert!(poodle.is_cancelled());

        let outcome = fetch_page(ctrl.service().as_ref(), &beagle).await;
        assert!(ctrl.finish(&beagle, outcome).is_none());

        let late = Ok(ResultPage {
            dogs: vec![dog("p1", "Poodle"), dog("p2", "Poodle")],
            total: 2,
            page: 1,
        });
        assert!(ctrl.finish(&poodle, late).is_none());

        assert_eq!(ctrl.query().breed, "Beagle");
        assert_eq!(ctrl.results().dogs.len(), 1);
        assert_eq!(ctrl.results().dogs[0].id, "b1");
    }

    #[tokio::test]
    async fn test_cancelled_fetch_reports_superseded() {
        let (mut ctrl, fake) = controller(FakeService::default());

        let first = ctrl.apply_breed("Poodle").unwrap();
        let _second = ctrl.apply_breed("Beagle").unwrap();

        let outcome = fetch_page(ctrl.service().as_ref(), &first).await;
        assert!(matches!(outcome, Err(FetchError::Superseded)));
        assert!(fake.searches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_page_past_end_is_clamped_and_refetched() {
        let ids: Vec<String> = (0..25).map(|i| format!("d{}", i)).collect();
        let (mut ctrl, fake) = controller(FakeService {
            ids,
            total: 100,
            ..Default::default()
        });

        ctrl.set_breed("Poodle").await;
        ctrl.set_page(4).await;
        assert_eq!(ctrl.query().page, 4);

        // The ZIP filter shrinks the result set to two pages
        let ticket = ctrl.apply_zip("02139").unwrap();
        let outcome = Ok(ResultPage::empty(4, 40));
        let follow_up = ctrl.finish(&ticket, outcome).unwrap();

        assert_eq!(follow_up.query().page, 2);
        assert_eq!(ctrl.query().page, 2);
        assert!(ctrl.view().loading);
        assert_eq!(fake.searches.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_query_change_drops_previous_results() {
        let ids: Vec<String> = (0..25).map(|i| format!("d{}", i)).collect();
        let (mut ctrl, _fake) = controller(FakeService {
            ids,
            total: 100,
            ..Default::default()
        });

        ctrl.set_breed("Poodle").await;
        assert_eq!(ctrl.view().results.dogs.len(), 25);

        let _beagle = ctrl.apply_breed("Beagle").unwrap();
        let view = ctrl.view();
        assert!(view.loading);
        assert_eq!(view.query.breed, "Beagle");
        assert!(view.results.dogs.is_empty());
        assert_eq!(view.results.total, 0);
        assert_eq!(view.results.page, 1);

        // Beagle's total is still unknown, so Poodle's pages are not reachable
        let ticket = ctrl.apply_page(4);
        assert!(ticket.is_none());
        assert_eq!(ctrl.query().page, 1);
    }

    #[tokio::test]
    async fn test_page_change_keeps_filter_total() {
        let ids: Vec<String> = (0..25).map(|i| format!("d{}", i)).collect();
        let (mut ctrl, _fake) = controller(FakeService {
            ids,
            total: 100,
            ..Default::default()
        });

        ctrl.set_breed("Poodle").await;
        let second = ctrl.apply_page(2).unwrap();
        assert!(ctrl.view().results.dogs.is_empty());

        // Same filter, so the known total still bounds paging mid-fetch
        let third = ctrl.apply_page(3).unwrap();
        assert!(second.is_cancelled());
        assert_eq!(third.query().page, 3);
    }

    #[tokio::test]
    async fn test_search_error_clears_loading() {
        let (mut ctrl, fake) = controller(FakeService {
            fail_search: true,
            ..Default::default()
        });

        ctrl.set_breed("Poodle").await;

        let view = ctrl.view();
        assert!(!view.loading);
        assert_eq!(view.error.as_deref(), Some("Failed to load dogs. Please try again."));
        assert!(view.results.dogs.is_empty());
        assert!(fake.hydrations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_favorites_survive_paging() {
        let ids: Vec<String> = (0..25).map(|i| format!("d{}", i)).collect();
        let (mut ctrl, _fake) = controller(FakeService {
            ids,
            total: 60,
            ..Default::default()
        });

        ctrl.set_breed("Poodle").await;
        ctrl.toggle_favorite("d3");
        ctrl.set_page(2).await;
        ctrl.set_page(1).await;

        assert!(ctrl.favorites().contains("d3"));
        assert!(ctrl.view().is_favorite("d3"));
    }

    #[tokio::test]
    async fn test_match_without_favorites_alerts_without_calling() {
        let (mut ctrl, fake) = controller(FakeService::default());

        let result = ctrl.find_match().await;

        assert!(matches!(result, Err(MatchError::NoFavorites)));
        assert_eq!(*fake.matches.lock().unwrap(), 0);
        assert_eq!(
            ctrl.view().alert.as_deref(),
            Some("Please select at least one favorite dog to find a match!")
        );
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let (mut ctrl, _fake) = controller(FakeService::default());
        let mut rx = ctrl.subscribe();

        ctrl.mount().await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().breed_count, 2);

        ctrl.toggle_favorite("a");
        assert_eq!(rx.borrow_and_update().favorites, vec!["a"]);
    }
}
