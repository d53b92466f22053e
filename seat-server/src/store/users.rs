//! Repository for the `users` table.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use super::models::User;

const USER_COLUMNS: &str = "id, username, email, password_hash, phone_number, upi_id, \
    is_staff, is_verified, created_at";

/// Fields for a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUserRow {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub upi_id: Option<String>,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A taken username surfaces as a unique-constraint database error.
    pub async fn create(e: impl SqliteExecutor<'_>, input: &NewUserRow) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users
                (username, email, password_hash, phone_number, upi_id, is_staff, is_verified, created_at)
             VALUES (?, ?, ?, ?, ?, ?, 0, ?)
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.phone_number)
            .bind(&input.upi_id)
            .bind(input.is_staff)
            .bind(input.created_at)
            .fetch_one(e)
            .await
    }

    pub async fn find_by_id(e: impl SqliteExecutor<'_>, id: i64) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(e)
            .await
    }

    pub async fn find_by_username(
        e: impl SqliteExecutor<'_>,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(e)
            .await
    }

    /// Mark a user as having verified a journey at least once.
    pub async fn mark_verified(e: impl SqliteExecutor<'_>, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET is_verified = 1 WHERE id = ?")
            .bind(id)
            .execute(e)
            .await?;
        Ok(())
    }

    /// Grant or revoke staff rights. Returns `false` if no such user.
    pub async fn set_staff(
        e: impl SqliteExecutor<'_>,
        username: &str,
        is_staff: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET is_staff = ? WHERE username = ?")
            .bind(is_staff)
            .bind(username)
            .execute(e)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Whether a database error is a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
