use actix_web::web;
use std::sync::Arc;

use crate::application::auth::{
  AuthenticateUserUseCase, LoginUserUseCase, RefreshTokenUseCase, RegisterUserUseCase,
};

use super::errors::json_error_handler;
use super::handlers::auth::{
  health_handler, login_handler, protected_handler, refresh_handler, register_handler,
};
use super::middleware::AuthMiddleware;

/// Largest JSON body accepted by the auth endpoints
const JSON_BODY_LIMIT: usize = 16 * 1024;

/// Use cases the auth routes dispatch to
#[derive(Clone)]
pub struct AuthRouteDependencies {
  pub register_use_case: Arc<RegisterUserUseCase>,
  pub login_use_case: Arc<LoginUserUseCase>,
  pub authenticate_use_case: Arc<AuthenticateUserUseCase>,
  pub refresh_use_case: Arc<RefreshTokenUseCase>,
}

/// Configure authentication routes
///
/// # Routes
///
/// - GET /health - Liveness probe
/// - POST /register - Register a new user account
/// - POST /login - Verify credentials and issue a session token
/// - POST /refresh - Exchange a live token for a fresh one
/// - GET /protected - Greets the bearer of a valid token
///
/// # Example
///
/// ```no_run
/// use actix_web::App;
/// # use retailer_auth::adapters::http::routes::{AuthRouteDependencies, configure_auth_routes};
///
/// # fn example(deps: AuthRouteDependencies) {
/// let app = App::new().configure(|cfg| configure_auth_routes(cfg, deps.clone()));
/// # }
/// ```
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig, deps: AuthRouteDependencies) {
  cfg
    .app_data(
      web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(json_error_handler),
    )
    .app_data(web::Data::new(deps.register_use_case))
    .app_data(web::Data::new(deps.login_use_case))
    .app_data(web::Data::new(deps.refresh_use_case))
    .route("/health", web::get().to(health_handler))
    .route("/register", web::post().to(register_handler))
    .route("/login", web::post().to(login_handler))
    .route("/refresh", web::post().to(refresh_handler))
    .service(
      web::resource("/protected")
        .wrap(AuthMiddleware::new(deps.authenticate_use_case))
        .route(web::get().to(protected_handler)),
    );
}
