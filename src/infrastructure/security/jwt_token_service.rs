use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};

use crate::domain::auth::entities::{AuthenticatedUser, IssuedToken, TokenClaims};
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::TokenService;
use crate::domain::auth::value_objects::{SessionToken, Username};

/// HS256 (HMAC-SHA256) session tokens carrying `{username, iat, exp}`
///
/// The key is fixed for the lifetime of the service. Expiry is checked
/// here rather than by `jsonwebtoken` so the boundary is exactly
/// `exp > now` with no leeway.
pub struct JwtTokenService {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  validation: Validation,
}

impl JwtTokenService {
  /// Keys shorter than 32 bytes work but weaken HS256
  pub const RECOMMENDED_KEY_LEN: usize = 32;

  pub fn new(secret: &[u8]) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    Self {
      encoding_key: EncodingKey::from_secret(secret),
      decoding_key: DecodingKey::from_secret(secret),
      validation,
    }
  }

  /// Signs a token as if the current time were `now`
  pub fn issue_at(
    &self,
    username: &Username,
    ttl: Duration,
    now: DateTime<Utc>,
  ) -> Result<IssuedToken, AuthError> {
    let claims = TokenClaims::new(username, now, ttl)
      .ok_or_else(|| AuthError::TokenGenerationFailed("expiration out of range".to_string()))?;

    let expires_at = claims
      .expires_at()
      .ok_or_else(|| AuthError::TokenGenerationFailed("expiration out of range".to_string()))?;

    let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
      .map_err(|e| AuthError::TokenGenerationFailed(e.to_string()))?;

    let token =
      SessionToken::new(token).map_err(|e| AuthError::TokenGenerationFailed(e.to_string()))?;

    Ok(IssuedToken { token, expires_at })
  }

  /// Verifies a token as if the current time were `now`
  pub fn verify_at(
    &self,
    token: &SessionToken,
    now: DateTime<Utc>,
  ) -> Result<AuthenticatedUser, AuthError> {
    let data = decode::<TokenClaims>(token.as_str(), &self.decoding_key, &self.validation)
      .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
      })?;

    let claims = data.claims;

    // Signature is valid at this point
    if claims.is_expired_at(now) {
      return Err(AuthError::TokenExpired);
    }

    let expires_at = claims.expires_at().ok_or(AuthError::TokenInvalid)?;

    Ok(AuthenticatedUser {
      username: claims.username,
      expires_at,
    })
  }
}

impl TokenService for JwtTokenService {
  fn issue(&self, username: &Username, ttl: Duration) -> Result<IssuedToken, AuthError> {
    self.issue_at(username, ttl, Utc::now())
  }

  fn verify(&self, token: &SessionToken) -> Result<AuthenticatedUser, AuthError> {
    self.verify_at(token, Utc::now())
  }
}
