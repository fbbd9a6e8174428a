use thiserror::Error;

/// Main authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("Username already exists")]
  UsernameTaken,

  /// Unknown username and wrong password both map here
  #[error("Invalid credentials provided")]
  InvalidCredentials,

  #[error("Token generation failed: {0}")]
  TokenGenerationFailed(String),

  #[error("Invalid token")]
  TokenInvalid,

  #[error("Token has expired")]
  TokenExpired,

  #[error("Credential store unavailable: {0}")]
  StoreUnavailable(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),
}

impl AuthError {
  /// True for failures that reject a presented bearer token
  pub fn is_token_rejection(&self) -> bool {
    matches!(self, AuthError::TokenInvalid | AuthError::TokenExpired)
  }
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Query timed out after {0} seconds")]
  Timeout(u64),

  #[error("Migration failed: {0}")]
  MigrationFailed(String),

  #[error("Unsupported database URL: {0}")]
  UnsupportedUrl(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),

  #[error("Invalid hash format")]
  InvalidFormat,
}

/// Input validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
  #[error("Missing required field: {field}")]
  MissingField { field: String },

  #[error("Username too long, maximum {max} characters allowed")]
  UsernameTooLong { max: usize },

  #[error("Password too long, maximum {max} bytes allowed")]
  PasswordTooLong { max: usize },

  #[error("Invalid field: {field}")]
  InvalidField { field: String },
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::Database(db_err) => RepositoryError::DatabaseError(db_err.message().to_string()),
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      sqlx::Error::Io(e) => RepositoryError::ConnectionFailed(e.to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::migrate::MigrateError> for RepositoryError {
  fn from(error: sqlx::migrate::MigrateError) -> Self {
    RepositoryError::MigrationFailed(error.to_string())
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::StoreUnavailable(RepositoryError::from(error))
  }
}

impl From<argon2::password_hash::Error> for HashError {
  fn from(error: argon2::password_hash::Error) -> Self {
    use argon2::password_hash::Error;
    match error {
      Error::PhcStringField | Error::PhcStringTrailingData | Error::B64Encoding(_) => {
        HashError::InvalidFormat
      }
      _ => HashError::HashingFailed(error.to_string()),
    }
  }
}
