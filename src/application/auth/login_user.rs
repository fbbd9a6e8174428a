use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Password, Username};

/// Command for logging in a user
#[derive(Clone)]
pub struct LoginUserCommand {
  pub username: String,
  /// User's password (plain text)
  pub password: String,
}

impl fmt::Debug for LoginUserCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LoginUserCommand")
      .field("username", &self.username)
      .field("password", &"***")
      .finish()
  }
}

/// Response after successful user login
#[derive(Debug, Clone)]
pub struct LoginUserResponse {
  pub username: String,
  /// Signed session token
  pub token: String,
  /// Token expiration timestamp
  pub expires_at: DateTime<Utc>,
}

/// Use case for logging in a user
pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginUserUseCase {
  /// Creates a new instance of LoginUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user login use case
  ///
  /// # Errors
  /// Returns `AuthError::InvalidCredentials` for an unknown username or a
  /// wrong password, `AuthError::TokenGenerationFailed` if signing fails
  pub async fn execute(&self, command: LoginUserCommand) -> Result<LoginUserResponse, AuthError> {
    let username = Username::new(command.username)?;
    let password = Password::new(command.password)?;

    let issued = self
      .auth_service
      .login(username.clone(), password)
      .await?;

    Ok(LoginUserResponse {
      username: username.into_inner(),
      token: issued.token.into_inner(),
      expires_at: issued.expires_at,
    })
  }
}
