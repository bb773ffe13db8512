use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use validator::Validate;

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

/// An account row as stored in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or replacing an account.
#[derive(Debug, Deserialize, Validate)]
pub struct UserSchema {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// The public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: i32,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserList {
    pub users: Vec<UserPublic>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

impl User {
    pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_username<'e, E>(
        executor: E,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(executor)
        .await
    }

    pub async fn insert<'e, E>(
        executor: E,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(executor)
        .await
    }

    /// Replaces username, email and password hash, and bumps `updated_at`.
    ///
    /// Returns `None` when no row has the given id.
    pub async fn update<'e, E>(
        executor: E,
        id: i32,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET username = $1, email = $2, password_hash = $3, updated_at = now() \
             WHERE id = $4 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Deletes the account; owned todos go with it through `ON DELETE CASCADE`.
    pub async fn delete<'e, E>(executor: E, id: i32) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list<'e, E>(executor: E, offset: i64, limit: i64) -> Result<Vec<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY id OFFSET $1 LIMIT $2",
            USER_COLUMNS
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(executor)
        .await
    }
}
