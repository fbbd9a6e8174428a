use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

use super::errors::{HashError, ValidationError};

// ============================================================================
// Username Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
  pub const MAX_LENGTH: usize = 64;

  /// Creates a new Username after validation
  ///
  /// The value is stored exactly as submitted; whitespace-only and
  /// control characters are rejected.
  pub fn new(username: impl Into<String>) -> Result<Self, ValidationError> {
    let username = username.into();

    if username.trim().is_empty() {
      return Err(ValidationError::MissingField {
        field: "username".to_string(),
      });
    }

    if username.chars().count() > Self::MAX_LENGTH {
      return Err(ValidationError::UsernameTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    if username.chars().any(char::is_control) {
      return Err(ValidationError::InvalidField {
        field: "username".to_string(),
      });
    }

    Ok(Self(username))
  }

  /// Returns the username as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Username {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Username {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

/// Plain-text password as received from the client.
///
/// The buffer is zeroed when dropped and never shown by `Debug` or `Display`.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
  /// Upper bound on input size; Argon2 accepts any length.
  pub const MAX_LENGTH: usize = 1024;

  pub fn new(password: impl Into<String>) -> Result<Self, ValidationError> {
    let password = Zeroizing::new(password.into());

    if password.is_empty() {
      return Err(ValidationError::MissingField {
        field: "password".to_string(),
      });
    }

    if password.len() > Self::MAX_LENGTH {
      return Err(ValidationError::PasswordTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(password))
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    self.0.as_str()
  }
}

impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

impl fmt::Display for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("***")
  }
}

// ============================================================================
// PasswordHash Value Object (PHC String)
// ============================================================================

/// Salted digest in PHC string format, e.g. `$argon2id$v=19$m=...$salt$hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Wraps an existing digest after a structural check.
  ///
  /// Algorithm-specific parsing happens in the hasher that produced it.
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, HashError> {
    let hash = hash.into();

    if hash.len() < 2 || !hash.starts_with('$') || hash.chars().any(char::is_whitespace) {
      return Err(HashError::InvalidFormat);
    }

    Ok(Self(hash))
  }

  /// Returns the hash as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

// ============================================================================
// SessionToken Value Object (Signed Bearer Token)
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
  /// Wraps a serialized token; only emptiness is checked here; the signature
  /// is checked by the token service.
  pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
    let token = token.into();

    if token.is_empty() {
      return Err(ValidationError::MissingField {
        field: "token".to_string(),
      });
    }

    Ok(Self(token))
  }

  /// Returns the token as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Debug for SessionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("SessionToken(***)")
  }
}

impl fmt::Display for SessionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("***")
  }
}
