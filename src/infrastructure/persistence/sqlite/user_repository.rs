use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::time::Duration;

use crate::domain::auth::{
  entities::User, errors::AuthError, ports::UserRepository, value_objects::Username,
};
use crate::infrastructure::persistence::bounded;

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite implementation of the UserRepository trait
pub struct SqliteUserRepository {
  pool: SqlitePool,
  query_timeout: Duration,
}

impl SqliteUserRepository {
  pub fn new(pool: SqlitePool) -> Self {
    Self::with_query_timeout(pool, DEFAULT_QUERY_TIMEOUT)
  }

  pub fn with_query_timeout(pool: SqlitePool, query_timeout: Duration) -> Self {
    Self {
      pool,
      query_timeout,
    }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  username: String,
  password_hash: String,
  created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User::from_db(row.username, row.password_hash, row.created_at)
  }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
  async fn save(&self, user: User) -> Result<(), AuthError> {
    bounded(
      self.query_timeout,
      sqlx::query(
        r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(username) DO UPDATE
            SET
                password_hash = excluded.password_hash,
                created_at = excluded.created_at
            "#,
      )
      .bind(&user.username)
      .bind(&user.password_hash)
      .bind(user.created_at)
      .execute(&self.pool),
    )
    .await?;

    Ok(())
  }

  async fn insert_new(&self, user: User) -> Result<bool, AuthError> {
    let result = bounded(
      self.query_timeout,
      sqlx::query(
        r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(username) DO NOTHING
            "#,
      )
      .bind(&user.username)
      .bind(&user.password_hash)
      .bind(user.created_at)
      .execute(&self.pool),
    )
    .await?;

    Ok(result.rows_affected() == 1)
  }

  async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError> {
    let row = bounded(
      self.query_timeout,
      sqlx::query_as::<_, UserRow>(
        r#"
            SELECT username, password_hash, created_at
            FROM users
            WHERE username = ?1
            "#,
      )
      .bind(username.as_str())
      .fetch_optional(&self.pool),
    )
    .await?;

    Ok(row.map(User::from))
  }
}
