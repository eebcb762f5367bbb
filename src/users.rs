//! User records. Identity itself is the identity provider's problem; this
//! module only mirrors the opaque `uid` (plus a contact email) so books
//! have something to hang off. Deleting a user cascades to the shelf via
//! the foreign key.
use sqlx::SqlitePool;

use super::error::AppError;

pub async fn register(pool: &SqlitePool, uid: &str, email: &str) -> Result<(), AppError> {
    if uid.trim().is_empty() {
        return Err(AppError::Validation("uid is required".into()));
    }
    if email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }

    sqlx::query("INSERT INTO users (uid, email) VALUES (?, ?)")
        .bind(uid)
        .bind(email)
        .execute(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("User already exists in the database".to_string())
            }
            _ => AppError::Database(e),
        })?;

    Ok(())
}

pub async fn update_email(pool: &SqlitePool, uid: &str, email: &str) -> Result<(), AppError> {
    if email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }

    let result = sqlx::query("UPDATE users SET email = ? WHERE uid = ?")
        .bind(email)
        .bind(uid)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    Ok(())
}

pub async fn delete_user(pool: &SqlitePool, uid: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE uid = ?")
        .bind(uid)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    Ok(())
}
