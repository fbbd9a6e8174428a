pub mod auth;

use crate::{
  adapters::http::{
    errors::{ApiError, AuthErrorKind},
    middleware::AuthUser,
  },
  domain::auth::entities::AuthenticatedUser,
};
use actix_web::HttpRequest;

/// Extract the authenticated principal from request extensions
pub fn get_principal(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
  let principal = req.authenticated_user();

  if principal.is_none() {
    tracing::warn!(
      "get_principal: principal not found in request extensions for path {}",
      req.path()
    );
  }

  principal.ok_or(ApiError::Auth(AuthErrorKind::Unauthorized))
}
