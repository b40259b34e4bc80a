use thiserror::Error;

use crate::core::favorites::FavoritesSet;
use crate::models::DogRecord;
use crate::services::{ApiError, DogService};

/// Why a match request produced no match
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("no favorites selected")]
    NoFavorites,

    #[error("match request failed: {0}")]
    Match(#[source] ApiError),

    #[error("match hydration failed: {0}")]
    Hydrate(#[source] ApiError),

    #[error("matched dog {0} was not returned by hydration")]
    MissingRecord(String),
}

impl MatchError {
    /// Alert text for the user
    pub fn user_message(&self) -> &'static str {
        match self {
            MatchError::NoFavorites => "Please select at least one favorite dog to find a match!",
            MatchError::Match(_) => "Failed to find match. Please try again.",
            MatchError::Hydrate(_) | MatchError::MissingRecord(_) => {
                "Failed to load match details. Please try again."
            }
        }
    }
}

/// Asks the service for a best match among the favorites
///
/// Holds the last match until it is dismissed, and the last alert until it
/// is acknowledged.
#[derive(Debug, Clone, Default)]
pub struct MatchRequester {
    matched: Option<DogRecord>,
    alert: Option<String>,
}

impl MatchRequester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matched(&self) -> Option<&DogRecord> {
        self.matched.as_ref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Close the match display
    pub fn dismiss(&mut self) {
        self.matched = None;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Submit the favorites and surface the matched dog
    pub async fn find_match(
        &mut self,
        service: &dyn DogService,
        favorites: &FavoritesSet,
    ) -> Result<(), MatchError> {
        self.alert = None;

        match request_match(service, favorites).await {
            Ok(dog) => {
                tracing::info!("Matched with {} ({})", dog.name, dog.id);
                self.matched = Some(dog);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Match failed: {}", e);
                self.alert = Some(e.user_message().to_string());
                Err(e)
            }
        }
    }
}

/// Match, then hydrate the single matched ID
pub async fn request_match(
    service: &dyn DogService,
    favorites: &FavoritesSet,
) -> Result<DogRecord, MatchError> {
    if favorites.is_empty() {
        return Err(MatchError::NoFavorites);
    }

    let response = service
        .match_favorites(&favorites.all())
        .await
        .map_err(MatchError::Match)?;

    let ids = vec![response.matched_id];
    let mut dogs = service.hydrate(&ids).await.map_err(MatchError::Hydrate)?;

    match dogs.iter().position(|dog| dog.id == ids[0]) {
        Some(index) => Ok(dogs.swap_remove(index)),
        None if !dogs.is_empty() => Ok(dogs.swap_remove(0)),
        None => Err(MatchError::MissingRecord(ids[0].clone())),
    }
}
