use std::sync::Arc;

use crate::domain::auth::entities::AuthenticatedUser;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Use case backing the protected-resource guard
pub struct AuthenticateUserUseCase {
  auth_service: Arc<AuthService>,
}

impl AuthenticateUserUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Resolves a bearer token to the principal it names
  ///
  /// # Errors
  /// Returns `AuthError::TokenInvalid` or `AuthError::TokenExpired`
  pub fn execute(&self, token: &SessionToken) -> Result<AuthenticatedUser, AuthError> {
    self.auth_service.authenticate(token)
  }
}
