//! Walks the register, login, guard and refresh flows against a store
//!
//! Uses the in-memory store unless `DATABASE_URL` names a PostgreSQL or
//! SQLite database:
//! ```bash
//! DATABASE_URL=sqlite::memory: cargo run --example auth_flow
//! ```

use chrono::Duration;
use std::sync::Arc;

use retailer_auth::domain::auth::{AuthService, AuthServiceConfig, Password, Username};
use retailer_auth::infrastructure::config::DatabaseConfig;
use retailer_auth::infrastructure::persistence::connect_user_repository;
use retailer_auth::infrastructure::security::{Argon2PasswordHasher, JwtTokenService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt::init();

  let database = DatabaseConfig {
    url: std::env::var("DATABASE_URL").unwrap_or_default(),
    ..DatabaseConfig::default()
  };

  let service = AuthService::new(
    connect_user_repository(&database).await?,
    Arc::new(Argon2PasswordHasher::new()?),
    Arc::new(JwtTokenService::new(b"demo-signing-key-not-for-production")),
    AuthServiceConfig {
      token_ttl: Duration::minutes(5),
    },
  );

  println!("=== Registering alice ===");
  let user = service
    .register(Username::new("alice")?, Password::new("pw1")?)
    .await?;
  println!("  Registered at {}", user.created_at);

  println!("\n=== Registering alice again ===");
  match service
    .register(Username::new("alice")?, Password::new("pw2")?)
    .await
  {
    Ok(_) => println!("  Unexpectedly succeeded"),
    Err(e) => println!("  Rejected: {}", e),
  }

  println!("\n=== Logging in ===");
  let issued = service
    .login(Username::new("alice")?, Password::new("pw1")?)
    .await?;
  println!("  Token expires at {}", issued.expires_at);

  println!("\n=== Wrong password ===");
  if let Err(e) = service
    .login(Username::new("alice")?, Password::new("nope")?)
    .await
  {
    println!("  Rejected: {}", e);
  }

  println!("\n=== Guard ===");
  let principal = service.authenticate(&issued.token)?;
  println!("  Welcome {}", principal.username);

  println!("\n=== Refresh ===");
  let refreshed = service.refresh(&issued.token)?;
  println!("  New token expires at {}", refreshed.expires_at);

  Ok(())
}
