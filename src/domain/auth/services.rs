use chrono::Duration;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::entities::{AuthenticatedUser, IssuedToken, User};
use super::errors::AuthError;
use super::ports::{PasswordHasher, TokenService, UserRepository};
use super::value_objects::{Password, PasswordHash, SessionToken, Username};

/// Default lifetime of an issued session token
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 300;

/// Verified against when the username is unknown, so a miss costs a full hash
const DUMMY_PASSWORD: &str = "dummy-password-for-timing";

/// Tunables for the authentication flows
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
  pub token_ttl: Duration,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS),
    }
  }
}

/// Authentication service implementing the registration, login,
/// guard and refresh flows
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_service: Arc<dyn TokenService>,
  config: AuthServiceConfig,
  dummy_hash: OnceCell<PasswordHash>,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_service: Arc<dyn TokenService>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      user_repo,
      password_hasher,
      token_service,
      config,
      dummy_hash: OnceCell::new(),
    }
  }

  /// Registers a new user
  ///
  /// Exists-check, hash, insert-if-absent. Nothing is written when the
  /// username is already present, including when another registration
  /// for the same name lands between the check and the insert.
  ///
  /// # Errors
  /// Returns `AuthError::UsernameTaken` if the username is already registered
  pub async fn register(&self, username: Username, password: Password) -> Result<User, AuthError> {
    if self.user_repo.find_by_username(&username).await?.is_some() {
      tracing::info!(username = %username, "Registration rejected: username taken");
      return Err(AuthError::UsernameTaken);
    }

    let password_hash = self.password_hasher.hash(&password).await.inspect_err(|e| {
      tracing::error!(error = %e, "Password hashing failed during registration");
    })?;

    let user = User::new(username, password_hash);

    // A concurrent registration may have won since the lookup
    if !self.user_repo.insert_new(user.clone()).await? {
      tracing::info!(username = %user.username, "Registration rejected: username taken");
      return Err(AuthError::UsernameTaken);
    }

    tracing::info!(username = %user.username, "User registered");
    Ok(user)
  }

  /// Authenticates a user and issues a session token
  ///
  /// Unknown username and wrong password are indistinguishable to the
  /// caller; only the logs tell them apart.
  ///
  /// # Errors
  /// - `AuthError::InvalidCredentials` on lookup miss or password mismatch
  /// - `AuthError::TokenGenerationFailed` if signing fails
  /// - `AuthError::StoreUnavailable` if the store cannot be reached
  pub async fn login(&self, username: Username, password: Password) -> Result<IssuedToken, AuthError> {
    let user = self
      .user_repo
      .find_by_username(&username)
      .await
      .inspect_err(|e| {
        tracing::error!(username = %username, error = %e, "Credential lookup failed during login");
      })?;

    let Some(user) = user else {
      self.verify_dummy(&password).await;
      tracing::info!(username = %username, "Login rejected: unknown username");
      return Err(AuthError::InvalidCredentials);
    };

    let stored_hash = PasswordHash::from_hash(user.password_hash).inspect_err(|e| {
      tracing::error!(username = %username, error = %e, "Stored password hash is malformed");
    })?;

    if !self.password_hasher.verify(&password, &stored_hash).await? {
      tracing::info!(username = %username, "Login rejected: password mismatch");
      return Err(AuthError::InvalidCredentials);
    }

    let issued = self
      .token_service
      .issue(&username, self.config.token_ttl)
      .inspect_err(|e| {
        tracing::error!(username = %username, error = %e, "Token issuance failed");
      })?;

    tracing::info!(username = %username, expires_at = %issued.expires_at, "User logged in");
    Ok(issued)
  }

  /// Validates a bearer token and returns the principal it names
  ///
  /// # Errors
  /// Returns `AuthError::TokenInvalid` or `AuthError::TokenExpired`
  pub fn authenticate(&self, token: &SessionToken) -> Result<AuthenticatedUser, AuthError> {
    self.token_service.verify(token).inspect_err(|e| match e {
      AuthError::TokenExpired => tracing::debug!("Bearer token rejected: expired"),
      AuthError::TokenInvalid => tracing::debug!("Bearer token rejected: bad signature or malformed"),
      other => tracing::warn!(error = %other, "Bearer token verification failed"),
    })
  }

  /// Re-issues a still-valid token with a fresh expiration
  ///
  /// The presented token is not revoked and stays valid until its own expiry.
  pub fn refresh(&self, token: &SessionToken) -> Result<IssuedToken, AuthError> {
    let principal = self.authenticate(token)?;

    let username = Username::new(principal.username).map_err(|_| AuthError::TokenInvalid)?;

    let issued = self
      .token_service
      .issue(&username, self.config.token_ttl)
      .inspect_err(|e| {
        tracing::error!(username = %username, error = %e, "Token issuance failed during refresh");
      })?;

    tracing::debug!(username = %username, expires_at = %issued.expires_at, "Token refreshed");
    Ok(issued)
  }

  /// Burns one verification against a fixed digest; the result is ignored
  async fn verify_dummy(&self, password: &Password) {
    let dummy = self
      .dummy_hash
      .get_or_try_init(|| async {
        match Password::new(DUMMY_PASSWORD) {
          Ok(dummy_password) => self.password_hasher.hash(&dummy_password).await,
          Err(e) => Err(AuthError::from(e)),
        }
      })
      .await;

    match dummy {
      Ok(hash) => {
        let _ = self.password_hasher.verify(password, hash).await;
      }
      Err(e) => tracing::warn!(error = %e, "Could not prepare dummy hash"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::errors::RepositoryError;
  use async_trait::async_trait;
  use chrono::{DateTime, Utc};
  use std::collections::HashMap;
  use std::sync::Mutex;
  use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

  #[derive(Default)]
  struct FakeUserRepository {
    users: Mutex<HashMap<String, User>>,
    unavailable: AtomicBool,
    /// Lookups miss even for stored users, as when a racing insert is not yet visible
    stale_lookups: AtomicBool,
    writes: AtomicUsize,
  }

  #[async_trait]
  impl UserRepository for FakeUserRepository {
    async fn save(&self, user: User) -> Result<(), AuthError> {
      if self.unavailable.load(Ordering::SeqCst) {
        return Err(RepositoryError::Timeout(5).into());
      }
      self.writes.fetch_add(1, Ordering::SeqCst);
      self
        .users
        .lock()
        .unwrap()
        .insert(user.username.clone(), user);
      Ok(())
    }

    async fn insert_new(&self, user: User) -> Result<bool, AuthError> {
      if self.unavailable.load(Ordering::SeqCst) {
        return Err(RepositoryError::Timeout(5).into());
      }
      let mut users = self.users.lock().unwrap();
      if users.contains_key(&user.username) {
        return Ok(false);
      }
      self.writes.fetch_add(1, Ordering::SeqCst);
      users.insert(user.username.clone(), user);
      Ok(true)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError> {
      if self.unavailable.load(Ordering::SeqCst) {
        return Err(RepositoryError::ConnectionFailed("refused".to_string()).into());
      }
      if self.stale_lookups.load(Ordering::SeqCst) {
        return Ok(None);
      }
      Ok(self.users.lock().unwrap().get(username.as_str()).cloned())
    }
  }

  /// Reversible stand-in for a real KDF; counts verifications
  #[derive(Default)]
  struct FakeHasher {
    verifications: AtomicUsize,
  }

  #[async_trait]
  impl PasswordHasher for FakeHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
      Ok(PasswordHash::from_hash(format!("$fake${}", password.as_str()))?)
    }

    async fn verify(&self, password: &Password, hashed: &PasswordHash) -> Result<bool, AuthError> {
      self.verifications.fetch_add(1, Ordering::SeqCst);
      Ok(hashed.as_str() == format!("$fake${}", password.as_str()))
    }
  }

  /// Tokens look like `signed:<username>`; `expired:<username>` is rejected as expired
  struct FakeTokenService {
    fail_issue: bool,
  }

  fn far_future() -> DateTime<Utc> {
    DateTime::from_timestamp(4_000_000_000, 0).unwrap()
  }

  impl TokenService for FakeTokenService {
    fn issue(&self, username: &Username, _ttl: Duration) -> Result<IssuedToken, AuthError> {
      if self.fail_issue {
        return Err(AuthError::TokenGenerationFailed("key unavailable".to_string()));
      }
      Ok(IssuedToken {
        token: SessionToken::new(format!("signed:{}", username))?,
        expires_at: far_future(),
      })
    }

    fn verify(&self, token: &SessionToken) -> Result<AuthenticatedUser, AuthError> {
      if let Some(username) = token.as_str().strip_prefix("signed:") {
        return Ok(AuthenticatedUser {
          username: username.to_string(),
          expires_at: far_future(),
        });
      }
      if token.as_str().starts_with("expired:") {
        return Err(AuthError::TokenExpired);
      }
      Err(AuthError::TokenInvalid)
    }
  }

  struct Fixture {
    service: AuthService,
    repo: Arc<FakeUserRepository>,
    hasher: Arc<FakeHasher>,
  }

  fn fixture_with(fail_issue: bool) -> Fixture {
    let repo = Arc::new(FakeUserRepository::default());
    let hasher = Arc::new(FakeHasher::default());
    let service = AuthService::new(
      repo.clone(),
      hasher.clone(),
      Arc::new(FakeTokenService { fail_issue }),
      AuthServiceConfig::default(),
    );
    Fixture {
      service,
      repo,
      hasher,
    }
  }

  fn fixture() -> Fixture {
    fixture_with(false)
  }

  fn username(name: &str) -> Username {
    Username::new(name).unwrap()
  }

  fn password(pw: &str) -> Password {
    Password::new(pw).unwrap()
  }

  #[tokio::test]
  async fn test_register_stores_hash_not_plaintext() {
    let fx = fixture();

    let user = fx
      .service
      .register(username("alice"), password("pw1"))
      .await
      .unwrap();

    assert_eq!(user.username, "alice");
    let stored = fx.repo.users.lock().unwrap().get("alice").cloned().unwrap();
    assert_ne!(stored.password_hash, "pw1");
    assert_eq!(stored.password_hash, "$fake$pw1");
  }

  #[tokio::test]
  async fn test_register_twice_keeps_first_hash() {
    let fx = fixture();

    fx.service
      .register(username("alice"), password("pw1"))
      .await
      .unwrap();
    let result = fx.service.register(username("alice"), password("pw2")).await;

    assert!(matches!(result, Err(AuthError::UsernameTaken)));
    assert_eq!(fx.repo.writes.load(Ordering::SeqCst), 1);
    let stored = fx.repo.users.lock().unwrap().get("alice").cloned().unwrap();
    assert_eq!(stored.password_hash, "$fake$pw1");
  }

  #[tokio::test]
  async fn test_register_losing_race_keeps_first_hash() {
    let fx = fixture();

    fx.service
      .register(username("alice"), password("pw1"))
      .await
      .unwrap();
    fx.repo.stale_lookups.store(true, Ordering::SeqCst);

    let result = fx.service.register(username("alice"), password("pw2")).await;

    assert!(matches!(result, Err(AuthError::UsernameTaken)));
    assert_eq!(fx.repo.writes.load(Ordering::SeqCst), 1);
    let stored = fx.repo.users.lock().unwrap().get("alice").cloned().unwrap();
    assert_eq!(stored.password_hash, "$fake$pw1");
  }

  #[tokio::test]
  async fn test_register_store_failure_is_store_unavailable() {
    let fx = fixture();
    fx.repo.unavailable.store(true, Ordering::SeqCst);

    let result = fx.service.register(username("alice"), password("pw1")).await;

    assert!(matches!(result, Err(AuthError::StoreUnavailable(_))));
  }

  #[tokio::test]
  async fn test_login_issues_token_for_user() {
    let fx = fixture();
    fx.service
      .register(username("alice"), password("pw1"))
      .await
      .unwrap();

    let issued = fx
      .service
      .login(username("alice"), password("pw1"))
      .await
      .unwrap();

    assert_eq!(issued.token.as_str(), "signed:alice");
  }

  #[tokio::test]
  async fn test_login_failures_are_indistinguishable() {
    let fx = fixture();
    fx.service
      .register(username("alice"), password("pw1"))
      .await
      .unwrap();

    let wrong_password = fx
      .service
      .login(username("alice"), password("pw1x"))
      .await
      .unwrap_err();
    let unknown_user = fx
      .service
      .login(username("mallory"), password("pw1"))
      .await
      .unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
  }

  #[tokio::test]
  async fn test_login_unknown_user_still_verifies_a_hash() {
    let fx = fixture();

    let _ = fx.service.login(username("ghost"), password("pw")).await;

    assert_eq!(fx.hasher.verifications.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_login_store_failure_is_not_invalid_credentials() {
    let fx = fixture();
    fx.repo.unavailable.store(true, Ordering::SeqCst);

    let result = fx.service.login(username("alice"), password("pw1")).await;

    assert!(matches!(result, Err(AuthError::StoreUnavailable(_))));
  }

  #[tokio::test]
  async fn test_login_token_failure_is_distinct() {
    let fx = fixture_with(true);
    fx.service
      .register(username("alice"), password("pw1"))
      .await
      .unwrap();

    let result = fx.service.login(username("alice"), password("pw1")).await;

    assert!(matches!(result, Err(AuthError::TokenGenerationFailed(_))));
  }

  #[tokio::test]
  async fn test_login_with_corrupt_stored_hash_is_hash_error() {
    let fx = fixture();
    fx.repo.users.lock().unwrap().insert(
      "alice".to_string(),
      User::from_db("alice".to_string(), "plaintext".to_string(), Utc::now()),
    );

    let result = fx.service.login(username("alice"), password("plaintext")).await;

    assert!(matches!(result, Err(AuthError::Hash(_))));
  }

  #[test]
  fn test_authenticate_classifies_rejections() {
    let fx = fixture();

    let principal = fx
      .service
      .authenticate(&SessionToken::new("signed:alice").unwrap())
      .unwrap();
    assert_eq!(principal.username, "alice");

    assert!(matches!(
      fx.service
        .authenticate(&SessionToken::new("expired:alice").unwrap()),
      Err(AuthError::TokenExpired)
    ));
    assert!(matches!(
      fx.service.authenticate(&SessionToken::new("garbage").unwrap()),
      Err(AuthError::TokenInvalid)
    ));
  }

  #[test]
  fn test_refresh_reissues_for_same_user() {
    let fx = fixture();

    let issued = fx
      .service
      .refresh(&SessionToken::new("signed:alice").unwrap())
      .unwrap();

    assert_eq!(issued.token.as_str(), "signed:alice");
  }

  #[test]
  fn test_refresh_rejects_expired_token() {
    let fx = fixture();

    let result = fx
      .service
      .refresh(&SessionToken::new("expired:alice").unwrap());

    assert!(matches!(result, Err(AuthError::TokenExpired)));
  }
}
