use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Response carrying the re-issued token
#[derive(Debug, Clone)]
pub struct RefreshTokenResponse {
  pub token: String,
  pub expires_at: DateTime<Utc>,
}

/// Use case for exchanging a live token for one with a fresh expiry
pub struct RefreshTokenUseCase {
  auth_service: Arc<AuthService>,
}

impl RefreshTokenUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError::TokenInvalid` or `AuthError::TokenExpired` for a
  /// rejected token, `AuthError::TokenGenerationFailed` if signing fails
  pub fn execute(&self, token: &SessionToken) -> Result<RefreshTokenResponse, AuthError> {
    let issued = self.auth_service.refresh(token)?;

    Ok(RefreshTokenResponse {
      token: issued.token.into_inner(),
      expires_at: issued.expires_at,
    })
  }
}
