//! Database connection pool
//!
//! SQLite connection pool creation for the news backend. File-based databases
//! get their parent directory created on demand so a fresh deployment can
//! point at a path that does not exist yet.

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

/// Create a SQLite connection pool from configuration.
///
/// Foreign key enforcement is switched on for every fresh pool; the join
/// table and the news foreign keys rely on it.
///
/// # Errors
///
/// Returns an error if the connection cannot be established or the database
/// directory cannot be created.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    connect(&config.url, config.max_connections).await
}

async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool> {
    // Ensure the database directory exists for file-based SQLite
    if !url.starts_with(":memory:") && !url.starts_with("sqlite::memory:") {
        let path = if let Some(stripped) = url.strip_prefix("sqlite:") {
            stripped
        } else {
            url
        };

        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {:?}", parent)
                })?;
            }
        }
    }

    // Build the connection URL with create mode for file-based databases
    let connection_url = if url.starts_with("sqlite:") {
        if url.contains('?') {
            url.to_string()
        } else {
            format!("{}?mode=rwc", url)
        }
    } else if url == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite:{}?mode=rwc", url)
    };

    // Foreign keys are set through connect options so every pooled
    // connection enforces them, not just the first one handed out.
    let options = SqliteConnectOptions::from_str(&connection_url)
        .with_context(|| format!("Invalid SQLite connection URL: {}", url))?
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to connect to SQLite database: {}", url))?;

    Ok(pool)
}

/// Create an in-memory database pool for testing.
///
/// The pool is capped at a single connection: every connection to
/// `sqlite::memory:` opens its own private database, so the pool must hand
/// out the one connection the migrations ran on.
pub async fn create_test_pool() -> Result<SqlitePool> {
    connect(":memory:", 1).await
}
