use actix_web::{
  App,
  http::{StatusCode, header::AUTHORIZATION},
  test::{self, TestRequest},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use std::sync::Arc;

use retailer_auth::{
  adapters::http::{AuthRouteDependencies, RequestIdMiddleware, configure_auth_routes},
  application::auth::{
    AuthenticateUserUseCase, LoginUserUseCase, RefreshTokenUseCase, RegisterUserUseCase,
  },
  domain::auth::{AuthService, AuthServiceConfig, Username},
  infrastructure::{
    persistence::InMemoryUserRepository,
    security::{Argon2PasswordHasher, JwtTokenService},
  },
};

const SECRET: &[u8] = b"integration-test-signing-key-32b!";

fn dependencies() -> AuthRouteDependencies {
  let auth_service = Arc::new(AuthService::new(
    Arc::new(InMemoryUserRepository::new()),
    Arc::new(Argon2PasswordHasher::with_params(1024, 1, 1).unwrap()),
    Arc::new(JwtTokenService::new(SECRET)),
    AuthServiceConfig::default(),
  ));

  AuthRouteDependencies {
    register_use_case: Arc::new(RegisterUserUseCase::new(auth_service.clone())),
    login_use_case: Arc::new(LoginUserUseCase::new(auth_service.clone())),
    authenticate_use_case: Arc::new(AuthenticateUserUseCase::new(auth_service.clone())),
    refresh_use_case: Arc::new(RefreshTokenUseCase::new(auth_service)),
  }
}

macro_rules! init_app {
  () => {
    test::init_service(
      App::new()
        .wrap(RequestIdMiddleware::new())
        .configure(|cfg| configure_auth_routes(cfg, dependencies())),
    )
    .await
  };
}

macro_rules! post_json {
  ($app:expr, $uri:expr, $body:expr) => {{
    let req = TestRequest::post().uri($uri).set_json($body).to_request();
    let resp = test::call_service(&$app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
  }};
}

macro_rules! get_with_token {
  ($app:expr, $uri:expr, $token:expr) => {{
    let mut req = TestRequest::get().uri($uri);
    let token: Option<&str> = $token;
    if let Some(token) = token {
      req = req.insert_header((AUTHORIZATION, format!("Bearer {}", token)));
    }
    let resp = test::call_service(&$app, req.to_request()).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
  }};
}

#[actix_web::test]
async fn test_register_login_and_access_protected_resource() {
  let app = init_app!();

  let (status, body) = post_json!(app, "/register", json!({"username": "alice", "password": "pw1"}));
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "User registered successfully");

  let (status, body) = post_json!(app, "/register", json!({"username": "alice", "password": "pw2"}));
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "username already exists");

  let (status, body) = post_json!(app, "/login", json!({"username": "alice", "password": "pw1"}));
  assert_eq!(status, StatusCode::OK);
  let token = body["token"].as_str().expect("token in login response").to_string();

  let (status, body) = get_with_token!(app, "/protected", Some(&token));
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Welcome alice");

  let (status, body) = get_with_token!(app, "/protected", None);
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], "invalid or missing token");
}

#[actix_web::test]
async fn test_duplicate_registration_keeps_original_password() {
  let app = init_app!();

  post_json!(app, "/register", json!({"username": "alice", "password": "pw1"}));
  post_json!(app, "/register", json!({"username": "alice", "password": "pw2"}));

  let (original, _) = post_json!(app, "/login", json!({"username": "alice", "password": "pw1"}));
  let (replacement, _) = post_json!(app, "/login", json!({"username": "alice", "password": "pw2"}));

  assert_eq!(original, StatusCode::OK);
  assert_eq!(replacement, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_wrong_password_and_unknown_user_are_indistinguishable() {
  let app = init_app!();
  post_json!(app, "/register", json!({"username": "alice", "password": "pw1"}));

  let wrong_password = post_json!(app, "/login", json!({"username": "alice", "password": "pw1x"}));
  let unknown_user = post_json!(app, "/login", json!({"username": "bob", "password": "pw1"}));

  assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
  assert_eq!(wrong_password, unknown_user);
  assert_eq!(wrong_password.1["error"], "invalid credentials");
}

#[actix_web::test]
async fn test_malformed_bodies_are_bad_requests() {
  let app = init_app!();

  for uri in ["/register", "/login"] {
    let req = TestRequest::post()
      .uri(uri)
      .insert_header(("content-type", "application/json"))
      .set_payload(r#"{"username": "alice""#)
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
  }

  let (status, _) = post_json!(app, "/register", json!({"username": "alice"}));
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_register_validation() {
  let app = init_app!();

  let (empty, _) = post_json!(app, "/register", json!({"username": "", "password": "pw1"}));
  let (blank, _) = post_json!(app, "/register", json!({"username": "   ", "password": "pw1"}));
  let (long, _) = post_json!(
    app,
    "/register",
    json!({"username": "a".repeat(65), "password": "pw1"})
  );
  let (no_password, _) = post_json!(app, "/register", json!({"username": "alice", "password": ""}));

  assert_eq!(empty, StatusCode::BAD_REQUEST);
  assert_eq!(blank, StatusCode::BAD_REQUEST);
  assert_eq!(long, StatusCode::BAD_REQUEST);
  assert_eq!(no_password, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_rejected_tokens_share_one_response() {
  let app = init_app!();
  let signer = JwtTokenService::new(SECRET);
  let alice = Username::new("alice").unwrap();

  let expired = signer
    .issue_at(&alice, Duration::minutes(5), Utc::now() - Duration::hours(1))
    .unwrap();
  let forged = JwtTokenService::new(b"some-other-key-entirely-32-bytes!")
    .issue_at(&alice, Duration::minutes(5), Utc::now())
    .unwrap();

  let expired = get_with_token!(app, "/protected", Some(expired.token.as_str()));
  let forged = get_with_token!(app, "/protected", Some(forged.token.as_str()));
  let garbage = get_with_token!(app, "/protected", Some("garbage"));
  let missing = get_with_token!(app, "/protected", None);

  assert_eq!(expired.0, StatusCode::UNAUTHORIZED);
  assert_eq!(expired, forged);
  assert_eq!(forged, garbage);
  assert_eq!(garbage, missing);
}

#[actix_web::test]
async fn test_refresh_issues_a_working_token() {
  let app = init_app!();
  post_json!(app, "/register", json!({"username": "alice", "password": "pw1"}));
  let (_, login) = post_json!(app, "/login", json!({"username": "alice", "password": "pw1"}));
  let token = login["token"].as_str().unwrap();

  let req = TestRequest::post()
    .uri("/refresh")
    .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  let refreshed = body["token"].as_str().unwrap();

  let (status, body) = get_with_token!(app, "/protected", Some(refreshed));
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Welcome alice");

  // The presented token is not revoked
  let (status, _) = get_with_token!(app, "/protected", Some(token));
  assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_refresh_rejects_expired_token() {
  let app = init_app!();
  let stale = JwtTokenService::new(SECRET)
    .issue_at(
      &Username::new("alice").unwrap(),
      Duration::minutes(5),
      Utc::now() - Duration::hours(1),
    )
    .unwrap();

  let req = TestRequest::post()
    .uri("/refresh")
    .insert_header((AUTHORIZATION, format!("Bearer {}", stale.token.as_str())))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_health_and_request_id() {
  let app = init_app!();

  let req = TestRequest::get().uri("/health").to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::OK);
  assert!(resp.headers().contains_key("x-request-id"));
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_error_responses_carry_request_id() {
  let app = init_app!();

  let req = TestRequest::get().uri("/protected").to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key("x-request-id"));
}
