use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{PasswordHash, SessionToken, Username};

/// User entity representing a stored credential record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  /// Unique username, the record key
  pub username: String,
  /// Salted password digest (never plaintext)
  pub password_hash: String,
  /// Timestamp when the user registered
  pub created_at: DateTime<Utc>,
}

impl User {
  /// Creates a new user; the typed hash keeps plaintext out of the record
  pub fn new(username: Username, password_hash: PasswordHash) -> Self {
    Self {
      username: username.into_inner(),
      password_hash: password_hash.into_inner(),
      created_at: Utc::now(),
    }
  }

  /// Creates a user from database fields (for reconstruction)
  pub fn from_db(username: String, password_hash: String, created_at: DateTime<Utc>) -> Self {
    Self {
      username,
      password_hash,
      created_at,
    }
  }
}

/// Claims carried inside a signed session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
  pub username: String,
  /// Issued-at, seconds since the epoch
  pub iat: i64,
  /// Expiration, seconds since the epoch
  pub exp: i64,
}

impl TokenClaims {
  /// Builds a fresh claim set for one issuance
  ///
  /// `None` when `issued_at + ttl` falls outside the representable range.
  pub fn new(username: &Username, issued_at: DateTime<Utc>, ttl: Duration) -> Option<Self> {
    let expires_at = issued_at.checked_add_signed(ttl)?;

    Some(Self {
      username: username.as_str().to_string(),
      iat: issued_at.timestamp(),
      exp: expires_at.timestamp(),
    })
  }

  /// A token is live while `exp > now`
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    self.exp <= now.timestamp()
  }

  pub fn expires_at(&self) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(self.exp, 0)
  }
}

/// A freshly signed token together with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
  pub token: SessionToken,
  pub expires_at: DateTime<Utc>,
}

/// Principal recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
  pub username: String,
  pub expires_at: DateTime<Utc>,
}
