use async_trait::async_trait;
use chrono::Duration;

use super::entities::{AuthenticatedUser, IssuedToken, User};
use super::errors::AuthError;
use super::value_objects::{Password, PasswordHash, SessionToken, Username};

/// Repository trait for credential persistence
///
/// Implementations must tolerate concurrent calls; writes to distinct
/// usernames never affect each other.
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Inserts the user, replacing any existing record with the same username
  async fn save(&self, user: User) -> Result<(), AuthError>;

  /// Inserts the user only if the username is free
  ///
  /// Returns `false`, leaving the existing record untouched, when the
  /// username is already present. The check and the write are atomic.
  async fn insert_new(&self, user: User) -> Result<bool, AuthError>;

  /// Finds a user by username; `None` when no record exists
  async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password with a fresh random salt
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password against a hashed password in constant time
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError>;
}

/// Issues and verifies signed, time-limited session tokens
///
/// Both operations are pure: the only shared state is the signing key.
pub trait TokenService: Send + Sync {
  /// Signs a new token for `username` that expires `ttl` from now
  fn issue(&self, username: &Username, ttl: Duration) -> Result<IssuedToken, AuthError>;

  /// Checks signature then expiry; fails with `TokenInvalid` or `TokenExpired`
  fn verify(&self, token: &SessionToken) -> Result<AuthenticatedUser, AuthError>;
}
