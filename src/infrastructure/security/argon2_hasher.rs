use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// Memory cost in KiB (19 MiB)
pub const DEFAULT_MEMORY_KIB: u32 = 19456;
/// Number of passes over memory
pub const DEFAULT_ITERATIONS: u32 = 2;
/// Degree of parallelism
pub const DEFAULT_PARALLELISM: u32 = 1;

/// Argon2id password hasher implementation
///
/// Digests are PHC strings that embed the salt and the cost parameters,
/// so changing the parameters later does not invalidate stored hashes.
/// The hashing work runs on the blocking thread pool.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  /// Creates a hasher with the default work factor
  pub fn new() -> Result<Self, AuthError> {
    Self::with_params(DEFAULT_MEMORY_KIB, DEFAULT_ITERATIONS, DEFAULT_PARALLELISM)
  }

  /// Creates a hasher with an explicit work factor
  pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AuthError> {
    let params = Params::new(memory_kib, iterations, parallelism, Some(32)).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Failed to create Argon2 params: {}",
        e
      )))
    })?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    Ok(Self { argon2 })
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();

    let hash = tokio::task::spawn_blocking(move || {
      let salt = SaltString::generate(&mut rand::rngs::OsRng);
      argon2
        .hash_password(password.as_str().as_bytes(), &salt)
        .map(|hash| hash.to_string())
    })
    .await
    .map_err(|e| HashError::HashingFailed(format!("Hashing task failed: {}", e)))?
    .map_err(|e| HashError::HashingFailed(format!("Failed to hash password: {}", e)))?;

    Ok(PasswordHash::from_hash(hash)?)
  }

  /// `verify_password` compares the derived output in constant time
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();
    let stored = hashed_password.as_str().to_string();

    let outcome = tokio::task::spawn_blocking(move || {
      let parsed_hash = Argon2PasswordHash::new(&stored).map_err(HashError::from)?;

      match argon2.verify_password(password.as_str().as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(HashError::VerificationFailed(e.to_string())),
      }
    })
    .await
    .map_err(|e| HashError::VerificationFailed(format!("Verification task failed: {}", e)))?;

    Ok(outcome?)
  }
}
