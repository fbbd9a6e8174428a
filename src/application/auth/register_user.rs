use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Password, Username};

/// Command for registering a new user
#[derive(Clone)]
pub struct RegisterUserCommand {
  /// Username exactly as submitted
  pub username: String,
  /// User's password (plain text, will be hashed)
  pub password: String,
}

impl fmt::Debug for RegisterUserCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RegisterUserCommand")
      .field("username", &self.username)
      .field("password", &"***")
      .finish()
  }
}

/// Response after successful user registration
#[derive(Debug, Clone)]
pub struct RegisterUserResponse {
  pub username: String,
  pub created_at: DateTime<Utc>,
}

/// Use case for registering a new user
pub struct RegisterUserUseCase {
  auth_service: Arc<AuthService>,
}

impl RegisterUserUseCase {
  /// Creates a new instance of RegisterUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user registration use case
  ///
  /// # Errors
  /// Returns `AuthError` if registration fails (e.g., username taken, validation errors)
  pub async fn execute(
    &self,
    command: RegisterUserCommand,
  ) -> Result<RegisterUserResponse, AuthError> {
    let username = Username::new(command.username)?;
    let password = Password::new(command.password)?;

    let user = self.auth_service.register(username, password).await?;

    Ok(RegisterUserResponse {
      username: user.username,
      created_at: user.created_at,
    })
  }
}
