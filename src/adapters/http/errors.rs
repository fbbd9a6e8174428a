use actix_web::{
  HttpRequest, HttpResponse,
  error::{JsonPayloadError, ResponseError},
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::auth::errors::{AuthError, HashError};

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Authentication error (400, 401 or 500 depending on kind)
  Auth(AuthErrorKind),

  /// Credential store unreachable (503 Service Unavailable)
  Unavailable(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
  /// Username already registered (400)
  UsernameTaken,

  /// Unknown username or wrong password (401)
  InvalidCredentials,

  /// Missing, malformed, forged or expired bearer token (401)
  Unauthorized,

  /// Token signing failed (500)
  TokenGenerationFailed,

  /// Password could not be hashed during registration (400)
  HashFailed,
}

impl AuthErrorKind {
  fn message(self) -> &'static str {
    match self {
      AuthErrorKind::UsernameTaken => "username already exists",
      AuthErrorKind::InvalidCredentials => "invalid credentials",
      AuthErrorKind::Unauthorized => "invalid or missing token",
      AuthErrorKind::TokenGenerationFailed => "could not generate token",
      AuthErrorKind::HashFailed => "could not hash password",
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::Unavailable(msg) => write!(f, "Service unavailable: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::UsernameTaken => StatusCode::BAD_REQUEST,
        AuthErrorKind::HashFailed => StatusCode::BAD_REQUEST,
        AuthErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        AuthErrorKind::TokenGenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
      },
      ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let message = match self {
      ApiError::Validation(msg) => msg.clone(),
      ApiError::Auth(kind) => kind.message().to_string(),
      ApiError::Unavailable(msg) => {
        tracing::error!("Credential store unavailable: {}", msg);
        "service temporarily unavailable".to_string()
      }
      ApiError::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        "internal server error".to_string()
      }
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(ErrorResponse { error: message })
  }
}

/// Convert AuthError to ApiError
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::Validation(err) => ApiError::Validation(err.to_string()),
      AuthError::UsernameTaken => ApiError::Auth(AuthErrorKind::UsernameTaken),
      AuthError::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      AuthError::TokenInvalid | AuthError::TokenExpired => {
        ApiError::Auth(AuthErrorKind::Unauthorized)
      }
      AuthError::TokenGenerationFailed(_) => ApiError::Auth(AuthErrorKind::TokenGenerationFailed),
      AuthError::StoreUnavailable(err) => ApiError::Unavailable(err.to_string()),
      AuthError::Hash(HashError::HashingFailed(_)) => ApiError::Auth(AuthErrorKind::HashFailed),
      AuthError::Hash(err) => ApiError::Internal(err.to_string()),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();

    // HashMap order varies between runs
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}

/// Turns JSON extractor failures into `400 {"error": ...}`
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  let message = match &err {
    JsonPayloadError::ContentType => "expected an application/json body".to_string(),
    JsonPayloadError::Deserialize(e) => format!("malformed request body: {}", e),
    JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
      "request body too large".to_string()
    }
    _ => "malformed request body".to_string(),
  };

  tracing::debug!(error = %err, "Rejected request body");
  ApiError::Validation(message).into()
}
