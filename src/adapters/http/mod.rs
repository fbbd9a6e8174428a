pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{
  ErrorResponse, HealthResponse, LoginRequest, MessageResponse, RegisterRequest, TokenResponse,
};
pub use errors::{ApiError, AuthErrorKind, json_error_handler};
pub use handlers::auth::{
  health_handler, login_handler, protected_handler, refresh_handler, register_handler,
};
pub use middleware::{AuthMiddleware, AuthUser, RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{AuthRouteDependencies, configure_auth_routes};
