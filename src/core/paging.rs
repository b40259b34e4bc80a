use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::core::pagination::PAGE_SIZE;
use crate::core::query::SearchQuery;
use crate::models::{ResultPage, SearchParams};
use crate::services::{ApiError, DogService};

/// Why a page fetch produced no results
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("search request failed: {0}")]
    Search(#[source] ApiError),

    #[error("hydration request failed: {0}")]
    Hydrate(#[source] ApiError),

    #[error("superseded by a newer query")]
    Superseded,
}

impl FetchError {
    /// Message shown in place of the result list
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Search(_) | FetchError::Superseded => "Failed to load dogs. Please try again.",
            FetchError::Hydrate(_) => "Failed to load dog details. Please try again.",
        }
    }
}

/// A fetch that has been started for one query signature
#[derive(Debug, Clone)]
pub struct FetchTicket {
    seq: u64,
    query: SearchQuery,
    token: CancellationToken,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Whether a completed fetch was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// Bookkeeping half of the result paging controller
///
/// Owns the current page plus loading and error state. Each `begin` issues a
/// ticket with a fresh sequence number and cancels the previous one; only the
/// latest ticket's completion is ever applied.
#[derive(Debug, Default)]
pub struct ResultPager {
    last_seq: u64,
    in_flight: Option<CancellationToken>,
    pending: Option<SearchQuery>,
    settled: Option<SearchQuery>,
    known_total: u64,
    loading: bool,
    error: Option<String>,
    page: ResultPage,
}

impl ResultPager {
    pub fn new() -> Self {
        Self {
            page: ResultPage::empty(1, 0),
            ..Default::default()
        }
    }

    pub fn page(&self) -> &ResultPage {
        &self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last total known to hold for the current breed and ZIP filter
    ///
    /// Survives a page-only fetch; any filter change resets it to 0 until the
    /// new query's total arrives.
    pub fn known_total(&self) -> u64 {
        self.known_total
    }

    fn supersede(&mut self) -> u64 {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.last_seq += 1;
        self.last_seq
    }

    /// Start fetching `query`, superseding anything still in flight
    pub fn begin(&mut self, query: &SearchQuery) -> FetchTicket {
        let seq = self.supersede();
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.loading = true;
        self.error = None;

        let same_filter = self
            .settled
            .as_ref()
            .is_some_and(|settled| settled.same_filter(query));
        if !same_filter {
            self.known_total = 0;
        }
        self.page = ResultPage::empty(query.page, 0);
        self.pending = Some(query.clone());

        tracing::debug!("Fetch #{} started for {:?}", seq, query);

        FetchTicket {
            seq,
            query: query.clone(),
            token,
        }
    }

    /// Resolve to an empty page without touching the network
    pub fn clear(&mut self, query: &SearchQuery) {
        self.supersede();
        self.pending = None;
        self.settled = None;
        self.known_total = 0;
        self.loading = false;
        self.error = None;
        self.page = ResultPage::empty(query.page, 0);
    }

    /// Apply the outcome of the fetch identified by `seq`
    pub fn complete(&mut self, seq: u64, outcome: Result<ResultPage, FetchError>) -> Completion {
        if seq != self.last_seq {
            tracing::warn!("Discarding stale fetch #{} (latest is #{})", seq, self.last_seq);
            return Completion::Stale;
        }
        if matches!(outcome, Err(FetchError::Superseded)) {
            return Completion::Stale;
        }

        self.in_flight = None;
        self.loading = false;
        let fetched = self.pending.take();

        match outcome {
            Ok(page) => {
                self.error = None;
                self.known_total = page.total;
                self.settled = fetched;
                self.page = page;
            }
            Err(e) => {
                tracing::error!("Fetch #{} failed: {}", seq, e);
                let page = fetched.as_ref().map_or(self.page.page, |query| query.page);
                self.error = Some(e.user_message().to_string());
                self.known_total = 0;
                self.settled = None;
                self.page = ResultPage::empty(page, 0);
            }
        }

        Completion::Applied
    }
}

/// Effect half of the paging controller: search, then hydrate
///
/// Resolves to `FetchError::Superseded` as soon as the ticket is cancelled.
pub async fn fetch_page(
    service: &dyn DogService,
    ticket: &FetchTicket,
) -> Result<ResultPage, FetchError> {
    tokio::select! {
        biased;
        _ = ticket.token.cancelled() => Err(FetchError::Superseded),
        result = search_and_hydrate(service, &ticket.query) => result,
    }
}

async fn search_and_hydrate(
    service: &dyn DogService,
    query: &SearchQuery,
) -> Result<ResultPage, FetchError> {
    let params = SearchParams::for_query(query);
    let found = service.search(&params).await.map_err(FetchError::Search)?;

    if found.result_ids.len() > PAGE_SIZE as usize {
        tracing::warn!(
            "Search returned {} IDs for a page of {}",
            found.result_ids.len(),
            PAGE_SIZE
        );
    }

    if found.result_ids.is_empty() {
        return Ok(ResultPage::empty(query.page, found.total));
    }

    let dogs = service
        .hydrate(&found.result_ids)
        .await
        .map_err(FetchError::Hydrate)?;

    Ok(ResultPage {
        dogs,
        total: found.total,
        page: query.page,
    })
}
