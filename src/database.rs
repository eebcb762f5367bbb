//! # SQLite
//!
//! Embedded relational store.
//!
//! Two tables, created idempotently at startup:
//! - `users`: `uid` (opaque identity-provider id, primary key) and `email`
//! - `books`: one row per shelf entry, `UNIQUE (uid, name)`, foreign key to
//!   `users` with `ON DELETE CASCADE`
//!
//! The unique constraint and the foreign key carry the write-path
//! guarantees: a duplicate title for the same reader and an insert for an
//! unregistered reader both surface as constraint violations, which the
//! service layer maps onto conflict and not-found responses.
//!
//! Foreign-key enforcement is per-connection in SQLite, so it is switched
//! on in the connect options and therefore applies to every pooled
//! connection.
use std::{str::FromStr, time::Duration};

use sqlx::{
    Error,
    sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
    },
};

const CREATE_USERS: &str = "
    CREATE TABLE IF NOT EXISTS users (
        uid   TEXT PRIMARY KEY,
        email TEXT NOT NULL
    )";

const CREATE_BOOKS: &str = "
    CREATE TABLE IF NOT EXISTS books (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        name     TEXT NOT NULL,
        author   TEXT NOT NULL,
        review   TEXT,
        rating   INTEGER,
        cover    TEXT,
        category TEXT,
        status   TEXT NOT NULL DEFAULT 'Reading',
        uid      TEXT NOT NULL REFERENCES users(uid) ON DELETE CASCADE,
        UNIQUE (uid, name)
    )";

pub async fn init_db(database_url: &str) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid DATABASE_URL!")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await
        .expect("Database misconfigured!");

    create_schema(&pool).await.expect("Schema creation failed!");

    pool
}

/// In-memory store for the test suite. Single connection, so every query
/// sees the same database.
pub async fn init_memory_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Invalid connection string!")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("In-memory database failed!");

    create_schema(&pool).await.expect("Schema creation failed!");

    pool
}

async fn create_schema(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::query(CREATE_USERS).execute(pool).await?;
    sqlx::query(CREATE_BOOKS).execute(pool).await?;

    Ok(())
}
