use actix_web::{App, HttpServer, middleware::Logger};
use chrono::Duration;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use retailer_auth::{
  adapters::http::{AuthRouteDependencies, RequestIdMiddleware, configure_auth_routes},
  application::auth::{
    AuthenticateUserUseCase, LoginUserUseCase, RefreshTokenUseCase, RegisterUserUseCase,
  },
  domain::auth::services::{AuthService, AuthServiceConfig},
  infrastructure::{
    config::Config,
    persistence::{StoreKind, connect_user_repository},
    security::{Argon2PasswordHasher, JwtTokenService},
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "retailer_auth=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting retailer auth service");

  let config = Config::load().map_err(|e| {
    tracing::error!("Failed to load configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;
  tracing::info!("Configuration loaded successfully");

  // Credential store
  let store_kind = StoreKind::from_url(&config.database.url).map_err(|e| {
    tracing::error!("{}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;
  tracing::info!("Using {} credential store", store_kind);

  let user_repo = connect_user_repository(&config.database)
    .await
    .map_err(|e| {
      tracing::error!("Failed to initialize {} credential store: {}", store_kind, e);
      std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
    })?;

  // Security services
  let password_hasher = Argon2PasswordHasher::with_params(
    config.security.argon2_memory_kib,
    config.security.argon2_iterations,
    config.security.argon2_parallelism,
  )
  .map_err(|e| {
    tracing::error!("Invalid Argon2 parameters: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;

  let secret = config.security.jwt_secret.as_bytes();
  if secret.len() < JwtTokenService::RECOMMENDED_KEY_LEN {
    tracing::warn!(
      "security.jwt_secret is {} bytes; use at least {} bytes",
      secret.len(),
      JwtTokenService::RECOMMENDED_KEY_LEN
    );
  }
  let token_service = JwtTokenService::new(secret);

  let token_ttl = i64::try_from(config.security.token_ttl_seconds)
    .ok()
    .and_then(Duration::try_seconds)
    .ok_or_else(|| {
      std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        "security.token_ttl_seconds is out of range",
      )
    })?;

  let auth_service = Arc::new(AuthService::new(
    user_repo,
    Arc::new(password_hasher),
    Arc::new(token_service),
    AuthServiceConfig {
      token_ttl,
    },
  ));

  // Use cases
  let deps = AuthRouteDependencies {
    register_use_case: Arc::new(RegisterUserUseCase::new(auth_service.clone())),
    login_use_case: Arc::new(LoginUserUseCase::new(auth_service.clone())),
    authenticate_use_case: Arc::new(AuthenticateUserUseCase::new(auth_service.clone())),
    refresh_use_case: Arc::new(RefreshTokenUseCase::new(auth_service)),
  };

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    App::new()
      // Add request ID middleware
      .wrap(RequestIdMiddleware::new())
      // Add logging middleware
      .wrap(Logger::default())
      .configure(|cfg| configure_auth_routes(cfg, deps.clone()))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}
