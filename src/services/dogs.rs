use crate::models::{DogRecord, LoginRequest, MatchResponse, SearchParams, SearchResponse};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// The hydration endpoint accepts at most this many IDs per request
pub const MAX_HYDRATE_BATCH: usize = 100;

/// Errors that can occur when talking to the shelter service
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(StatusCode),

    #[error("Unauthorized: session missing or expired")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// True when the request never produced an HTTP status
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::RequestError(e) if e.status().is_none())
    }
}

/// Remote operations the client state depends on
///
/// `DogsClient` is the HTTP implementation; tests plug in in-memory fakes.
#[async_trait]
pub trait DogService: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<(), ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    /// All valid breed names
    async fn breeds(&self) -> Result<Vec<String>, ApiError>;

    /// One page of matching dog IDs plus the total hit count
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, ApiError>;

    /// Full records for the given IDs, in the order the service returns them
    async fn hydrate(&self, ids: &[String]) -> Result<Vec<DogRecord>, ApiError>;

    /// Ask the service to pick one dog out of the given favorites
    async fn match_favorites(&self, ids: &[String]) -> Result<MatchResponse, ApiError>;
}

/// HTTP client for the shelter service
///
/// Holds a cookie store, so the session cookie set by `login` is sent with
/// every later call.
pub struct DogsClient {
    base_url: String,
    client: Client,
}

impl DogsClient {
    /// Create a new client for the given base URL
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn hydrate_batch(&self, ids: &[String]) -> Result<Vec<DogRecord>, ApiError> {
        let url = self.url("/dogs");

        tracing::debug!("Hydrating {} dogs", ids.len());

        let response = self.client.post(&url).json(ids).send().await?;
        let response = check_status(response, "hydrate dogs").await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse dogs: {}", e)))
    }
}

/// Map non-success statuses to errors, logging the body for diagnosis
async fn check_status(response: Response, operation: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read body".to_string());
    tracing::error!("Failed to {}: {} - {}", operation, status, body);

    if status == StatusCode::UNAUTHORIZED {
        Err(ApiError::Unauthorized)
    } else {
        Err(ApiError::ApiError(status))
    }
}

#[async_trait]
impl DogService for DogsClient {
    async fn login(&self, request: &LoginRequest) -> Result<(), ApiError> {
        let url = self.url("/auth/login");

        let response = self.client.post(&url).json(request).send().await?;
        check_status(response, "log in").await?;

        tracing::debug!("Login accepted for {}", request.email);
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let url = self.url("/auth/logout");

        let response = self.client.post(&url).send().await?;
        check_status(response, "log out").await?;

        Ok(())
    }

    async fn breeds(&self) -> Result<Vec<String>, ApiError> {
        let url = self.url("/dogs/breeds");

        tracing::debug!("Fetching breeds from: {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, "fetch breeds").await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse breeds: {}", e)))
    }

    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, ApiError> {
        let url = format!("{}?{}", self.url("/dogs/search"), params.to_query_string());

        tracing::debug!("Searching dogs: {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, "search dogs").await?;

        let result: SearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse search: {}", e)))?;

        tracing::debug!(
            "Search returned {} ids (total: {})",
            result.result_ids.len(),
            result.total
        );

        Ok(result)
    }

    async fn hydrate(&self, ids: &[String]) -> Result<Vec<DogRecord>, ApiError> {
        let mut dogs = Vec::with_capacity(ids.len());
        for batch in ids.chunks(MAX_HYDRATE_BATCH) {
            dogs.extend(self.hydrate_batch(batch).await?);
        }
        Ok(dogs)
    }

    async fn match_favorites(&self, ids: &[String]) -> Result<MatchResponse, ApiError> {
        let url = self.url("/dogs/match");

        tracing::debug!("Requesting match among {} favorites", ids.len());

        let response = self.client.post(&url).json(ids).send().await?;
        let response = check_status(response, "match favorites").await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse match: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = DogsClient::new("https://dogs.test/", Duration::from_secs(5)).unwrap();

        assert_eq!(client.base_url(), "https://dogs.test/");
        assert_eq!(client.url("/dogs/breeds"), "https://dogs.test/dogs/breeds");
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::ApiError(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "API returned error: 500 Internal Server Error");
        assert!(!err.is_transport());
    }
}
