use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// Request bodies carry plaintext passwords, so they do not derive Debug

/// Request for user registration
#[derive(Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  #[validate(length(
    min = 1,
    max = 64,
    message = "Username must be between 1 and 64 characters"
  ))]
  pub username: String,

  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

/// Request for user login
#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
  #[validate(length(min = 1, message = "Username is required"))]
  pub username: String,

  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

/// Standard success response for operations without data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
  pub message: String,
}

impl MessageResponse {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

/// Response carrying a signed session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
  pub token: String,

  /// Token expiration timestamp
  pub expires_at: DateTime<Utc>,
}

/// Standard error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
  pub error: String,
}

/// Liveness probe body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
  pub status: String,
}
