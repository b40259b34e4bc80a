use chrono::{DateTime, Utc};
use thiserror::Error;
use validator::Validate;

use crate::models::LoginRequest;
use crate::services::{ApiError, DogService};

/// Why a login attempt failed
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("name and email are required")]
    MissingFields,

    #[error("email is not valid")]
    InvalidEmail,

    #[error("login rejected: {0}")]
    Rejected(#[source] ApiError),

    #[error("login request failed: {0}")]
    Unreachable(#[source] ApiError),
}

impl SessionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            SessionError::MissingFields => "Please enter both name and email.",
            SessionError::InvalidEmail => "Please enter a valid email.",
            SessionError::Rejected(_) => "Login failed. Please try again.",
            SessionError::Unreachable(_) => "Something went wrong. Please try again later.",
        }
    }
}

/// Credentialed login and logout against the shelter service
#[derive(Debug, Clone, Default)]
pub struct SessionGateway {
    user: Option<String>,
    logged_in_at: Option<DateTime<Utc>>,
    error: Option<String>,
}

impl SessionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn logged_in_at(&self) -> Option<DateTime<Utc>> {
        self.logged_in_at
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn login(
        &mut self,
        service: &dyn DogService,
        name: &str,
        email: &str,
    ) -> Result<(), SessionError> {
        self.error = None;

        let result = attempt_login(service, name, email).await;
        match &result {
            Ok(()) => {
                tracing::info!("Login successful for {}", name);
                self.user = Some(name.to_string());
                self.logged_in_at = Some(Utc::now());
            }
            Err(e) => {
                tracing::error!("Error logging in: {}", e);
                self.error = Some(e.user_message().to_string());
            }
        }
        result
    }

    /// End the session; a failed logout is logged and leaves the session in place
    pub async fn logout(&mut self, service: &dyn DogService) -> Result<(), ApiError> {
        if let Err(e) = service.logout().await {
            tracing::error!("Error logging out: {}", e);
            return Err(e);
        }

        tracing::info!("Logged out");
        self.user = None;
        self.logged_in_at = None;
        Ok(())
    }
}

async fn attempt_login(
    service: &dyn DogService,
    name: &str,
    email: &str,
) -> Result<(), SessionError> {
    if name.trim().is_empty() || email.trim().is_empty() {
        return Err(SessionError::MissingFields);
    }

    let request = LoginRequest::new(name.trim(), email.trim());
    if request.validate().is_err() {
        return Err(SessionError::InvalidEmail);
    }

    service.login(&request).await.map_err(|e| {
        if e.is_transport() {
            SessionError::Unreachable(e)
        } else {
            SessionError::Rejected(e)
        }
    })
}
