//! Credential store adapters
//!
//! The backend is picked from `database.url`: empty for the in-memory
//! map, `postgres://` / `postgresql://` for PostgreSQL, `sqlite:` for SQLite.

pub mod memory;
pub mod postgres;
pub mod sqlite;

pub use memory::InMemoryUserRepository;
pub use postgres::PostgresUserRepository;
pub use sqlite::SqliteUserRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::auth::ports::UserRepository;
use crate::infrastructure::config::DatabaseConfig;

/// Which credential store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
  Memory,
  Postgres,
  Sqlite,
}

impl StoreKind {
  pub fn from_url(url: &str) -> Result<Self, RepositoryError> {
    let url = url.trim();

    if url.is_empty() {
      Ok(StoreKind::Memory)
    } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
      Ok(StoreKind::Postgres)
    } else if url.starts_with("sqlite:") {
      Ok(StoreKind::Sqlite)
    } else {
      // Only the scheme is echoed; the rest may hold credentials
      let scheme = url.split(':').next().unwrap_or_default();
      Err(RepositoryError::UnsupportedUrl(format!("{}:", scheme)))
    }
  }
}

impl fmt::Display for StoreKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StoreKind::Memory => write!(f, "memory"),
      StoreKind::Postgres => write!(f, "postgres"),
      StoreKind::Sqlite => write!(f, "sqlite"),
    }
  }
}

/// Connects the configured store and applies its migrations
///
/// The connect step is bounded by `connect_timeout_seconds`.
pub async fn connect_user_repository(
  config: &DatabaseConfig,
) -> Result<Arc<dyn UserRepository>, RepositoryError> {
  let kind = StoreKind::from_url(&config.url)?;
  let connect_timeout = Duration::from_secs(config.connect_timeout_seconds);
  let query_timeout = Duration::from_secs(config.query_timeout_seconds);

  match kind {
    StoreKind::Memory => {
      tracing::warn!("No database URL configured; credentials are kept in memory only");
      Ok(Arc::new(InMemoryUserRepository::new()))
    }
    StoreKind::Postgres => {
      let pool = tokio::time::timeout(
        connect_timeout,
        PgPoolOptions::new()
          .max_connections(config.max_connections)
          .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
          .connect(&config.url),
      )
      .await
      .map_err(|_| RepositoryError::Timeout(config.connect_timeout_seconds))??;

      tracing::info!("Running PostgreSQL migrations");
      sqlx::migrate!("./migrations/postgres").run(&pool).await?;

      Ok(Arc::new(PostgresUserRepository::with_query_timeout(
        pool,
        query_timeout,
      )))
    }
    StoreKind::Sqlite => {
      let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

      let pool = tokio::time::timeout(
        connect_timeout,
        SqlitePoolOptions::new()
          .max_connections(config.max_connections)
          .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
          .connect_with(options),
      )
      .await
      .map_err(|_| RepositoryError::Timeout(config.connect_timeout_seconds))??;

      tracing::info!("Running SQLite migrations");
      sqlx::migrate!("./migrations/sqlite").run(&pool).await?;

      Ok(Arc::new(SqliteUserRepository::with_query_timeout(
        pool,
        query_timeout,
      )))
    }
  }
}

/// Runs one store query under a deadline
pub(crate) async fn bounded<T, F>(timeout: Duration, query: F) -> Result<T, AuthError>
where
  F: Future<Output = Result<T, sqlx::Error>>,
{
  match tokio::time::timeout(timeout, query).await {
    Ok(result) => result.map_err(AuthError::from),
    Err(_) => Err(AuthError::StoreUnavailable(RepositoryError::Timeout(
      timeout.as_secs(),
    ))),
  }
}
