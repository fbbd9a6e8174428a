use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{HealthResponse, LoginRequest, MessageResponse, RegisterRequest, TokenResponse},
  errors::{ApiError, AuthErrorKind},
  handlers::get_principal,
  middleware::extract_bearer_token,
};
use crate::application::auth::{
  LoginUserCommand, LoginUserUseCase, RefreshTokenUseCase, RegisterUserCommand,
  RegisterUserUseCase,
};

/// Handler for user registration
///
/// POST /register
/// Body: RegisterRequest (JSON)
/// Response: MessageResponse (JSON) with status 200
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = RegisterUserCommand {
    username: request.username,
    password: request.password,
  };

  use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(MessageResponse::new("User registered successfully")))
}

/// Handler for user login
///
/// POST /login
/// Body: LoginRequest (JSON)
/// Response: TokenResponse (JSON) with status 200
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = LoginUserCommand {
    username: request.username,
    password: request.password,
  };

  let response = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(TokenResponse {
    token: response.token,
    expires_at: response.expires_at,
  }))
}

/// Handler for the protected resource
///
/// GET /protected
/// Headers: Authorization: Bearer <token>
/// Response: MessageResponse (JSON) with status 200
pub async fn protected_handler(http_req: HttpRequest) -> Result<HttpResponse, ApiError> {
  let principal = get_principal(&http_req)?;

  Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
    "Welcome {}",
    principal.username
  ))))
}

/// Handler for token refresh
///
/// POST /refresh
/// Headers: Authorization: Bearer <token>
/// Response: TokenResponse (JSON) with status 200
pub async fn refresh_handler(
  use_case: web::Data<Arc<RefreshTokenUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let token = extract_bearer_token(http_req.headers()).map_err(|reason| {
    tracing::debug!("Refresh rejected: {}", reason);
    ApiError::Auth(AuthErrorKind::Unauthorized)
  })?;

  let response = use_case.execute(&token)?;

  Ok(HttpResponse::Ok().json(TokenResponse {
    token: response.token,
    expires_at: response.expires_at,
  }))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().json(HealthResponse {
    status: "ok".to_string(),
  })
}
