use actix_web::{
  Error, HttpMessage, ResponseError,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header::{AUTHORIZATION, HeaderMap},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  application::auth::AuthenticateUserUseCase,
  domain::auth::{entities::AuthenticatedUser, value_objects::SessionToken},
};

const BEARER_PREFIX: &str = "Bearer ";

/// Authentication middleware that validates bearer tokens and attaches the
/// principal to the request
///
/// Missing header, wrong scheme, forged and expired tokens all produce the
/// same `401 {"error": "invalid or missing token"}`; the reason is only
/// logged at debug level.
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// use std::sync::Arc;
/// # use retailer_auth::application::auth::AuthenticateUserUseCase;
/// # use retailer_auth::adapters::http::middleware::auth::AuthMiddleware;
///
/// # async fn example(authenticate_use_case: Arc<AuthenticateUserUseCase>) {
/// let app = App::new().service(
///   web::resource("/protected")
///     .wrap(AuthMiddleware::new(authenticate_use_case))
///     .route(web::get().to(|| async { "Protected endpoint" })),
/// );
/// # }
/// ```
pub struct AuthMiddleware {
  authenticate_use_case: Arc<AuthenticateUserUseCase>,
}

impl AuthMiddleware {
  pub fn new(authenticate_use_case: Arc<AuthenticateUserUseCase>) -> Self {
    Self {
      authenticate_use_case,
    }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      authenticate_use_case: self.authenticate_use_case.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  authenticate_use_case: Arc<AuthenticateUserUseCase>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let authenticate_use_case = self.authenticate_use_case.clone();

    Box::pin(async move {
      let principal = extract_bearer_token(req.headers())
        .inspect_err(|reason| tracing::debug!(path = %req.path(), "Rejected request: {}", reason))
        .ok()
        .and_then(|token| authenticate_use_case.execute(&token).ok());

      let Some(principal) = principal else {
        let (request, _) = req.into_parts();
        let response = ApiError::Auth(AuthErrorKind::Unauthorized)
          .error_response()
          .map_into_right_body();
        return Ok(ServiceResponse::new(request, response));
      };

      req.extensions_mut().insert(principal);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

/// Pulls the token out of `Authorization: Bearer <token>`
///
/// The error is a short reason for logs, never sent to the client.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<SessionToken, &'static str> {
  let value = headers
    .get(AUTHORIZATION)
    .ok_or("missing Authorization header")?
    .to_str()
    .map_err(|_| "Authorization header is not visible ASCII")?;

  let token = value
    .strip_prefix(BEARER_PREFIX)
    .ok_or("Authorization header lacks the Bearer prefix")?;

  SessionToken::new(token).map_err(|_| "empty bearer token")
}

/// Extension trait to extract the authenticated principal from a request
pub trait AuthUser {
  /// `None` when the route is not wrapped in `AuthMiddleware`
  fn authenticated_user(&self) -> Option<AuthenticatedUser>;
}

impl AuthUser for actix_web::HttpRequest {
  fn authenticated_user(&self) -> Option<AuthenticatedUser> {
    self.extensions().get::<AuthenticatedUser>().cloned()
  }
}
